//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- Session keys and login redirect helpers.

pub mod password;
pub mod session;
