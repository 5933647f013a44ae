//! Account rules: signup validation and password strength.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::forms::FormErrors;

/// Maximum username length in characters.
pub const MAX_USERNAME_LENGTH: usize = 150;
/// `validator`'s `length` check takes `u64` bounds.
const MAX_USERNAME_LENGTH_U64: u64 = MAX_USERNAME_LENGTH as u64;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("username regex is valid"));

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(username) {
        return Ok(());
    }
    let mut err = ValidationError::new("username");
    err.message =
        Some("Username may contain only letters, digits and @/./+/-/_ characters".into());
    Err(err)
}

/// Validate that a password meets minimum strength requirements.
///
/// Currently enforces a minimum character length. Returns `Ok(())` when the
/// password is acceptable, or `Err` with a human-readable explanation.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}

/// Signup submission.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SignupForm {
    #[validate(
        length(
            min = 1,
            max = MAX_USERNAME_LENGTH_U64,
            message = "Username must be 1 to 150 characters"
        ),
        custom(function = "validate_username")
    )]
    pub username: String,
    pub password1: String,
    pub password2: String,
}

/// A validated signup: the username and the accepted plaintext password.
#[derive(Debug, Clone)]
pub struct CleanSignup {
    pub username: String,
    pub password: String,
}

impl SignupForm {
    /// Validate the form. Username uniqueness is checked by the caller.
    pub fn clean(self) -> Result<CleanSignup, FormErrors> {
        let mut errors = match self.validate() {
            Ok(()) => FormErrors::new(),
            Err(e) => FormErrors::from(e),
        };

        if self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match");
        } else if let Err(msg) = validate_password_strength(&self.password1, MIN_PASSWORD_LENGTH) {
            errors.add("password2", msg);
        }

        errors.into_result()?;
        Ok(CleanSignup {
            username: self.username,
            password: self.password1,
        })
    }
}
