//! Note entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use yanote_core::notes::CleanNote;
use yanote_core::types::{DbId, Timestamp};

/// A row from the `notes` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Note {
    pub id: DbId,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a note.
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author_id: DbId,
}

impl CreateNote {
    pub fn from_clean(clean: CleanNote, author_id: DbId) -> Self {
        Self {
            title: clean.title,
            text: clean.text,
            slug: clean.slug,
            author_id,
        }
    }
}

/// DTO for replacing a note's editable fields.
///
/// The edit form always submits every field, so this is a full replacement
/// rather than a `COALESCE` patch.
#[derive(Debug, Clone)]
pub struct UpdateNote {
    pub title: String,
    pub text: String,
    pub slug: String,
}

impl From<CleanNote> for UpdateNote {
    fn from(clean: CleanNote) -> Self {
        Self {
            title: clean.title,
            text: clean.text,
            slug: clean.slug,
        }
    }
}
