pub mod auth;
pub mod health;
pub mod notes;

use axum::Router;

use crate::state::AppState;

/// Build the full route tree.
///
/// ```text
/// /health                      service + database health (public)
///
/// /                            home (public)
/// /notes/                      list own notes
/// /add/                        note form, create
/// /note/{slug}/                note detail
/// /edit/{slug}/                edit form, update
/// /delete/{slug}/              confirmation, delete
/// /done/                       success page
///
/// /auth/login/                 login form, login (public)
/// /auth/logout/                logout (public)
/// /auth/signup/                signup form, signup (public)
/// ```
///
/// Every note route requires a session; anonymous visitors are redirected
/// to `/auth/login/?next=<path>`.
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(notes::router())
        .nest("/auth", auth::router())
}
