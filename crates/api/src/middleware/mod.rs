//! Authentication extractors.
//!
//! - [`auth::AuthUser`] -- Requires a logged-in user, redirecting to login otherwise.
//! - [`auth::MaybeAuthUser`] -- The logged-in user, if any.

pub mod auth;
