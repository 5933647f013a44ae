//! Route definitions for the `/auth` pages.

use axum::routing::get;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// GET  POST /login/    -> login_page, login
/// GET  POST /logout/   -> logout
/// GET  POST /signup/   -> signup_page, signup
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login/", get(auth::login_page).post(auth::login))
        .route("/logout/", get(auth::logout).post(auth::logout))
        .route("/signup/", get(auth::signup_page).post(auth::signup))
}
