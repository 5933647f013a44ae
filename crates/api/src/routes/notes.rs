//! Route definitions for the notes pages.

use axum::routing::get;
use axum::Router;

use crate::handlers::{notes, pages};
use crate::state::AppState;

/// Note and page routes, mounted at the root.
///
/// ```text
/// GET           /                 -> home
/// GET           /notes/           -> list_notes
/// GET  POST     /add/             -> new_note_form, create_note
/// GET           /note/{slug}/     -> get_note
/// GET  POST     /edit/{slug}/     -> edit_note_form, update_note
/// GET  POST DEL /delete/{slug}/   -> delete_note_confirm, delete_note
/// GET           /done/            -> success
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::home))
        .route("/notes/", get(notes::list_notes))
        .route("/add/", get(notes::new_note_form).post(notes::create_note))
        .route("/note/{slug}/", get(notes::get_note))
        .route(
            "/edit/{slug}/",
            get(notes::edit_note_form).post(notes::update_note),
        )
        .route(
            "/delete/{slug}/",
            get(notes::delete_note_confirm)
                .post(notes::delete_note)
                .delete(notes::delete_note),
        )
        .route("/done/", get(pages::success))
}
