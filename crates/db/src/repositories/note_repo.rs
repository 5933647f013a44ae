//! Repository for the `notes` table.
//!
//! Every lookup that serves a request is scoped by `author_id`, so a note
//! owned by someone else is indistinguishable from a missing one.

use sqlx::PgPool;
use yanote_core::types::DbId;

use crate::models::note::{CreateNote, Note, UpdateNote};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, text, slug, author_id, created_at, updated_at";

/// Provides CRUD operations for notes.
pub struct NoteRepo;

impl NoteRepo {
    /// Insert a new note, returning the created row.
    ///
    /// Fails with a unique violation on `uq_notes_slug` if the slug is taken.
    pub async fn create(pool: &PgPool, input: &CreateNote) -> Result<Note, sqlx::Error> {
        let query = format!(
            "INSERT INTO notes (title, text, slug, author_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(&input.title)
            .bind(&input.text)
            .bind(&input.slug)
            .bind(input.author_id)
            .fetch_one(pool)
            .await
    }

    /// Find a note by slug, but only if `author_id` owns it.
    pub async fn find_for_author(
        pool: &PgPool,
        slug: &str,
        author_id: DbId,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes WHERE slug = $1 AND author_id = $2");
        sqlx::query_as::<_, Note>(&query)
            .bind(slug)
            .bind(author_id)
            .fetch_optional(pool)
            .await
    }

    /// List an author's notes, newest first.
    pub async fn list_by_author(pool: &PgPool, author_id: DbId) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes
             WHERE author_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(author_id)
            .fetch_all(pool)
            .await
    }

    /// Whether any note other than `exclude_id` already uses `slug`.
    ///
    /// Checks across all authors: slugs are globally unique.
    pub async fn slug_taken(
        pool: &PgPool,
        slug: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let (taken,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                SELECT 1 FROM notes
                WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
        Ok(taken)
    }

    /// Replace the editable fields of a note owned by `author_id`.
    ///
    /// Returns `None` if no such note exists for that author.
    pub async fn update_for_author(
        pool: &PgPool,
        id: DbId,
        author_id: DbId,
        input: &UpdateNote,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET
                title = $3,
                text = $4,
                slug = $5
             WHERE id = $1 AND author_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(author_id)
            .bind(&input.title)
            .bind(&input.text)
            .bind(&input.slug)
            .fetch_optional(pool)
            .await
    }

    /// Delete a note by slug if `author_id` owns it. Returns `true` if a row
    /// was removed.
    pub async fn delete_for_author(
        pool: &PgPool,
        slug: &str,
        author_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE slug = $1 AND author_id = $2")
            .bind(slug)
            .bind(author_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of notes across all authors.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notes")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
