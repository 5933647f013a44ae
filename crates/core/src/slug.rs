//! Slug derivation and validation.
//!
//! Slugs are the public identifiers of notes: they appear in every note URL
//! and are unique across all authors.

use std::sync::LazyLock;

use regex::Regex;

/// Maximum slug length in characters. Matches the `notes.slug` check constraint.
pub const MAX_SLUG_LENGTH: usize = 100;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug regex is valid"));

/// Latin rendering of a single lowercase Cyrillic letter.
///
/// Returns `None` for anything outside the Russian alphabet so the caller
/// can keep or drop it.
fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

/// Derive a URL-safe slug from free text (usually a note title).
///
/// Cyrillic is transliterated, everything except ASCII alphanumerics, `_`,
/// `-` and whitespace is dropped, and runs of whitespace or hyphens collapse
/// into a single `-`. The result is truncated to [`MAX_SLUG_LENGTH`] and may
/// be empty when the input has no usable characters.
///
/// # Examples
///
/// ```
/// use yanote_core::slug::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("Заголовок"), "zagolovok");
/// ```
pub fn slugify(text: &str) -> String {
    let mut latin = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if let Some(t) = transliterate(c) {
            latin.push_str(t);
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c.is_whitespace() {
            latin.push(c);
        }
    }

    let mut slug = String::with_capacity(latin.len());
    let mut pending_dash = false;
    for c in latin.trim().chars() {
        if c == '-' || c.is_whitespace() {
            pending_dash = true;
            continue;
        }
        if pending_dash {
            slug.push('-');
            pending_dash = false;
        }
        slug.push(c);
    }

    // Everything left is ASCII, so byte truncation is char-safe.
    slug.truncate(MAX_SLUG_LENGTH);
    slug
}

/// Whether `slug` is non-empty, within length, and made of `[-a-zA-Z0-9_]`.
pub fn is_valid_slug(slug: &str) -> bool {
    slug.len() <= MAX_SLUG_LENGTH && SLUG_RE.is_match(slug)
}
