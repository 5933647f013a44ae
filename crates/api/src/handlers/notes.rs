//! Handlers for the notes pages.
//!
//! Every handler here requires a login. Notes are always looked up together
//! with the requesting author, so a note belonging to someone else answers
//! exactly like a note that does not exist (404).

use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect};
use axum::{Form, Json};

use yanote_core::error::CoreError;
use yanote_core::forms::FormErrors;
use yanote_core::notes::{duplicate_slug_message, NoteForm};
use yanote_core::types::DbId;
use yanote_db::models::note::{CreateNote, Note, UpdateNote};
use yanote_db::repositories::NoteRepo;
use yanote_db::{is_unique_violation, DbPool, NOTE_SLUG_CONSTRAINT};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Where successful add/edit/delete submissions redirect.
pub const SUCCESS_URL: &str = "/done/";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_own_note(pool: &DbPool, slug: &str, author_id: DbId) -> AppResult<Note> {
    NoteRepo::find_for_author(pool, slug, author_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Note", slug)))
}

/// Reject `slug` if any other note already uses it.
async fn ensure_slug_free(pool: &DbPool, slug: &str, exclude_id: Option<DbId>) -> AppResult<()> {
    if NoteRepo::slug_taken(pool, slug, exclude_id).await? {
        return Err(duplicate_slug(slug));
    }
    Ok(())
}

fn duplicate_slug(slug: &str) -> AppError {
    AppError::Form(FormErrors::single("slug", duplicate_slug_message(slug)))
}

/// Map a write failure caused by a concurrent claim on the same slug to the
/// same field error the up-front check produces.
pub fn map_slug_race(err: sqlx::Error, slug: &str) -> AppError {
    if is_unique_violation(&err, NOTE_SLUG_CONSTRAINT) {
        duplicate_slug(slug)
    } else {
        AppError::Database(err)
    }
}

fn form_from_note(note: &Note) -> NoteForm {
    NoteForm {
        title: note.title.clone(),
        text: note.text.clone(),
        slug: Some(note.slug.clone()),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /notes/
///
/// List the requesting user's notes.
pub async fn list_notes(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let notes = NoteRepo::list_by_author(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: notes }))
}

/// GET /add/
///
/// The blank note form.
pub async fn new_note_form(_auth: AuthUser) -> Json<DataResponse<NoteForm>> {
    Json(DataResponse {
        data: NoteForm::default(),
    })
}

/// POST /add/
///
/// Create a note owned by the requesting user, then redirect to the success page.
pub async fn create_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Form(form): Form<NoteForm>,
) -> AppResult<Redirect> {
    let clean = form.clean()?;
    ensure_slug_free(&state.pool, &clean.slug, None).await?;

    let slug = clean.slug.clone();
    let note = NoteRepo::create(&state.pool, &CreateNote::from_clean(clean, auth.user_id))
        .await
        .map_err(|e| map_slug_race(e, &slug))?;

    tracing::info!(
        user_id = auth.user_id,
        note_id = note.id,
        slug = %note.slug,
        "Note created"
    );

    Ok(Redirect::to(SUCCESS_URL))
}

/// GET /note/{slug}/
pub async fn get_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let note = find_own_note(&state.pool, &slug, auth.user_id).await?;
    Ok(Json(DataResponse { data: note }))
}

/// GET /edit/{slug}/
///
/// The edit form pre-filled with the note's current values.
pub async fn edit_note_form(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let note = find_own_note(&state.pool, &slug, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: form_from_note(&note),
    }))
}

/// POST /edit/{slug}/
///
/// Replace the note's fields. A slug may be kept, changed to a free one, or
/// left blank to re-derive it from the new title.
///
/// The body is decoded only after the ownership lookup, so a non-owner gets
/// 404 whatever they post.
pub async fn update_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    form: Result<Form<NoteForm>, FormRejection>,
) -> AppResult<Redirect> {
    let note = find_own_note(&state.pool, &slug, auth.user_id).await?;

    let Form(form) = form.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let clean = form.clean()?;
    ensure_slug_free(&state.pool, &clean.slug, Some(note.id)).await?;

    let new_slug = clean.slug.clone();
    let updated = NoteRepo::update_for_author(
        &state.pool,
        note.id,
        auth.user_id,
        &UpdateNote::from(clean),
    )
    .await
    .map_err(|e| map_slug_race(e, &new_slug))?
    .ok_or_else(|| AppError::Core(CoreError::not_found("Note", &slug)))?;

    tracing::info!(
        user_id = auth.user_id,
        note_id = updated.id,
        slug = %updated.slug,
        "Note updated"
    );

    Ok(Redirect::to(SUCCESS_URL))
}

/// GET /delete/{slug}/
///
/// Confirmation page showing the note about to be removed.
pub async fn delete_note_confirm(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let note = find_own_note(&state.pool, &slug, auth.user_id).await?;
    Ok(Json(DataResponse { data: note }))
}

/// POST /delete/{slug}/ and DELETE /delete/{slug}/
pub async fn delete_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Redirect> {
    if !NoteRepo::delete_for_author(&state.pool, &slug, auth.user_id).await? {
        return Err(AppError::Core(CoreError::not_found("Note", &slug)));
    }

    tracing::info!(user_id = auth.user_id, slug = %slug, "Note deleted");

    Ok(Redirect::to(SUCCESS_URL))
}
