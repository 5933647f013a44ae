//! Note form rules: field validation, slug cleaning, and the duplicate-slug
//! warning.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::forms::FormErrors;
use crate::slug::{is_valid_slug, slugify, MAX_SLUG_LENGTH};

/// Maximum note title length in characters.
pub const MAX_TITLE_LENGTH: usize = 100;
/// `validator`'s `length` check takes `u64` bounds.
const MAX_TITLE_LENGTH_U64: u64 = MAX_TITLE_LENGTH as u64;

/// Suffix appended to a colliding slug in the `slug` field error.
pub const WARNING: &str = " - такой slug уже существует, придумайте уникальное значение!";

/// Field error for a slug that is already taken by any note.
pub fn duplicate_slug_message(slug: &str) -> String {
    format!("{slug}{WARNING}")
}

fn validate_slug_field(slug: &str) -> Result<(), ValidationError> {
    // Blank means "derive from the title", handled in `NoteForm::clean`.
    if slug.is_empty() || is_valid_slug(slug) {
        return Ok(());
    }
    let mut err = ValidationError::new("slug");
    err.message = Some(
        format!(
            "Slug must be at most {MAX_SLUG_LENGTH} characters of latin letters, digits, \
             underscores or hyphens"
        )
        .into(),
    );
    Err(err)
}

/// Raw note submission as posted by the add and edit pages.
///
/// Any extra fields (an `author` smuggled into the form, for instance) are
/// ignored: ownership always comes from the session. Missing fields read as
/// empty so they surface as field errors instead of a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NoteForm {
    #[validate(length(
        min = 1,
        max = MAX_TITLE_LENGTH_U64,
        message = "Title must be 1 to 100 characters"
    ))]
    pub title: String,

    #[validate(length(min = 1, message = "Text cannot be empty"))]
    pub text: String,

    #[validate(custom(function = "validate_slug_field"))]
    pub slug: Option<String>,
}

/// A validated note with its final slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanNote {
    pub title: String,
    pub text: String,
    pub slug: String,
}

impl NoteForm {
    /// Validate the form and settle the slug.
    ///
    /// Surrounding whitespace is stripped from every field first, so a
    /// whitespace-only title or text counts as missing. A blank slug is
    /// derived from the title. Uniqueness is not checked here since it needs
    /// the database.
    pub fn clean(mut self) -> Result<CleanNote, FormErrors> {
        self.title = self.title.trim().to_string();
        self.text = self.text.trim().to_string();
        self.slug = self
            .slug
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        self.validate()?;

        let slug = match self.slug {
            Some(s) => s,
            None => slugify(&self.title),
        };
        if slug.is_empty() {
            return Err(FormErrors::single(
                "slug",
                "Could not derive a slug from the title, please enter one",
            ));
        }

        Ok(CleanNote {
            title: self.title,
            text: self.text,
            slug,
        })
    }
}
