//! HTTP-level integration tests for note creation, listing, editing and
//! deletion.
//!
//! Ownership is hidden: a reader touching an author's note must get 404 and
//! leave the note unchanged.

mod common;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::IntoResponse;
use common::{
    assert_redirects, body_json, create_note, create_user, delete, get, login, note_count,
    post_form, send,
};
use sqlx::PgPool;
use yanote_api::handlers::notes::map_slug_race;
use yanote_core::notes::{CleanNote, WARNING};
use yanote_db::models::note::CreateNote;
use yanote_db::repositories::NoteRepo;

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// The list contains the requester's notes and nobody else's.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_shows_only_own_notes(pool: PgPool) {
    let author1 = create_user(&pool, "Автор1").await;
    let author2 = create_user(&pool, "Автор2").await;
    let note1 = create_note(&pool, &author1, "Заголовок Автор1", "Текст Автор1", "note-1").await;
    let note2 = create_note(&pool, &author2, "Заголовок Автор2", "Текст Автор2", "note-2").await;
    let app = common::build_test_app(pool).await;

    for (user, own, foreign) in [(&author1, &note1, &note2), (&author2, &note2, &note1)] {
        let cookie = login(&app, &user.username).await;
        let response = get(&app, "/notes/", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let slugs: Vec<&str> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["slug"].as_str().unwrap())
            .collect();
        assert!(slugs.contains(&own.slug.as_str()));
        assert!(!slugs.contains(&foreign.slug.as_str()));
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

const FORM: &[(&str, &str)] = &[("title", "Заголовок"), ("text", "Текст"), ("slug", "slug")];

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_anonymous_user_cant_create_note(pool: PgPool) {
    let app = common::build_test_app(pool.clone()).await;

    let response = post_form(&app, "/add/", FORM, None).await;

    assert_redirects(&response, "/auth/login/?next=/add/");
    assert_eq!(note_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_auth_user_can_create_note(pool: PgPool) {
    let user = create_user(&pool, "TestUser").await;
    let app = common::build_test_app(pool.clone()).await;
    let cookie = login(&app, "TestUser").await;

    let response = post_form(&app, "/add/", FORM, Some(&cookie)).await;

    assert_redirects(&response, "/done/");
    assert_eq!(note_count(&pool).await, 1);
    let note = NoteRepo::find_for_author(&pool, "slug", user.id)
        .await
        .unwrap()
        .expect("note should belong to the creator");
    assert_eq!(note.title, "Заголовок");
    assert_eq!(note.text, "Текст");
    assert_eq!(note.author_id, user.id);
}

/// A smuggled `author` field cannot assign the note to someone else.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_author_field_is_ignored(pool: PgPool) {
    let user = create_user(&pool, "creator").await;
    let victim = create_user(&pool, "victim").await;
    let app = common::build_test_app(pool.clone()).await;
    let cookie = login(&app, "creator").await;

    let victim_id = victim.id.to_string();
    let mut form = FORM.to_vec();
    form.push(("author", &victim_id));
    post_form(&app, "/add/", &form, Some(&cookie)).await;

    let note = NoteRepo::find_for_author(&pool, "slug", user.id).await.unwrap();
    assert!(note.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_slug_is_derived_from_title(pool: PgPool) {
    let user = create_user(&pool, "TestUser").await;
    let app = common::build_test_app(pool.clone()).await;
    let cookie = login(&app, "TestUser").await;

    let form = [("title", "Заголовок"), ("text", "Текст"), ("slug", "")];
    let response = post_form(&app, "/add/", &form, Some(&cookie)).await;

    assert_redirects(&response, "/done/");
    let note = NoteRepo::find_for_author(&pool, "zagolovok", user.id).await.unwrap();
    assert!(note.is_some(), "slug should be transliterated from the title");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_cant_use_duplicate_slug(pool: PgPool) {
    create_user(&pool, "TestUser").await;
    let app = common::build_test_app(pool.clone()).await;
    let cookie = login(&app, "TestUser").await;

    post_form(&app, "/add/", FORM, Some(&cookie)).await;
    let response = post_form(&app, "/add/", FORM, Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["fields"]["slug"][0], format!("slug{WARNING}"));
    assert_eq!(note_count(&pool).await, 1);
}

/// A write that loses a slug race to the unique constraint reports the same
/// field error as the up-front check.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_slug_constraint_violation_maps_to_field_error(pool: PgPool) {
    let author = create_user(&pool, "Автор").await;
    create_note(&pool, &author, "First", "one", "slug").await;

    let clean = CleanNote {
        title: "Second".into(),
        text: "two".into(),
        slug: "slug".into(),
    };
    let err = NoteRepo::create(&pool, &CreateNote::from_clean(clean, author.id))
        .await
        .unwrap_err();

    let response = map_slug_race(err, "slug").into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["fields"]["slug"][0], format!("slug{WARNING}"));
    assert_eq!(note_count(&pool).await, 1);
}

/// Whitespace-only title and text count as missing.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_title_and_text_are_rejected(pool: PgPool) {
    create_user(&pool, "TestUser").await;
    let app = common::build_test_app(pool.clone()).await;
    let cookie = login(&app, "TestUser").await;

    let form = [("title", "   "), ("text", "   "), ("slug", "ws")];
    let response = post_form(&app, "/add/", &form, Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["fields"]["title"].is_array());
    assert!(json["fields"]["text"].is_array());
    assert_eq!(note_count(&pool).await, 0);
}

/// Surrounding whitespace is stripped before the slug is checked.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_padded_slug_is_trimmed(pool: PgPool) {
    let user = create_user(&pool, "TestUser").await;
    let app = common::build_test_app(pool.clone()).await;
    let cookie = login(&app, "TestUser").await;

    let form = [("title", "Title"), ("text", "text"), ("slug", " slug ")];
    let response = post_form(&app, "/add/", &form, Some(&cookie)).await;

    assert_redirects(&response, "/done/");
    let note = NoteRepo::find_for_author(&pool, "slug", user.id).await.unwrap();
    assert!(note.is_some());
}

/// Slugs are unique across authors, not just per author.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_slug_taken_by_another_author_is_rejected(pool: PgPool) {
    let other = create_user(&pool, "other").await;
    create_note(&pool, &other, "Theirs", "Text", "slug").await;
    create_user(&pool, "TestUser").await;
    let app = common::build_test_app(pool.clone()).await;
    let cookie = login(&app, "TestUser").await;

    let response = post_form(&app, "/add/", FORM, Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["fields"]["slug"][0], format!("slug{WARNING}"));
    assert_eq!(note_count(&pool).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_form_reports_field_errors(pool: PgPool) {
    create_user(&pool, "TestUser").await;
    let app = common::build_test_app(pool.clone()).await;
    let cookie = login(&app, "TestUser").await;

    let response = post_form(&app, "/add/", &[("slug", "bad slug")], Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["fields"]["title"].is_array());
    assert!(json["fields"]["text"].is_array());
    assert!(json["fields"]["slug"].is_array());
    assert_eq!(note_count(&pool).await, 0);
}

// ---------------------------------------------------------------------------
// Edit / delete
// ---------------------------------------------------------------------------

const NOTE_TEXT: &str = "Текст комментария";
const NOTE_TITLE: &str = "Заголовок";
const NEW_NOTE_TEXT: &str = "Обновлённый комментарий";
const NEW_NOTE_TITLE: &str = "Обновлённый заголовок";

const EDIT_FORM: &[(&str, &str)] = &[
    ("title", NEW_NOTE_TITLE),
    ("text", NEW_NOTE_TEXT),
    ("slug", "note"),
];

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_author_can_delete_note(pool: PgPool) {
    let author = create_user(&pool, "Автор").await;
    create_note(&pool, &author, NOTE_TITLE, NOTE_TEXT, "note").await;
    let app = common::build_test_app(pool.clone()).await;
    let cookie = login(&app, "Автор").await;

    let response = delete(&app, "/delete/note/", Some(&cookie)).await;

    assert_redirects(&response, "/done/");
    assert_eq!(note_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_author_can_delete_note_with_form_post(pool: PgPool) {
    let author = create_user(&pool, "Автор").await;
    create_note(&pool, &author, NOTE_TITLE, NOTE_TEXT, "note").await;
    let app = common::build_test_app(pool.clone()).await;
    let cookie = login(&app, "Автор").await;

    let response = post_form(&app, "/delete/note/", &[], Some(&cookie)).await;

    assert_redirects(&response, "/done/");
    assert_eq!(note_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_cant_delete_note_of_another_user(pool: PgPool) {
    let author = create_user(&pool, "Автор").await;
    create_user(&pool, "Не автор").await;
    create_note(&pool, &author, NOTE_TITLE, NOTE_TEXT, "note").await;
    let app = common::build_test_app(pool.clone()).await;
    let cookie = login(&app, "Не автор").await;

    let response = delete(&app, "/delete/note/", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(note_count(&pool).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_author_can_edit_note(pool: PgPool) {
    let author = create_user(&pool, "Автор").await;
    create_note(&pool, &author, NOTE_TITLE, NOTE_TEXT, "note").await;
    let app = common::build_test_app(pool.clone()).await;
    let cookie = login(&app, "Автор").await;

    let response = post_form(&app, "/edit/note/", EDIT_FORM, Some(&cookie)).await;

    assert_redirects(&response, "/done/");
    let note = NoteRepo::find_for_author(&pool, "note", author.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(note.text, NEW_NOTE_TEXT);
    assert_eq!(note.title, NEW_NOTE_TITLE);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_cant_edit_note_of_another_user(pool: PgPool) {
    let author = create_user(&pool, "Автор").await;
    create_user(&pool, "Не автор").await;
    create_note(&pool, &author, NOTE_TITLE, NOTE_TEXT, "note").await;
    let app = common::build_test_app(pool.clone()).await;
    let cookie = login(&app, "Не автор").await;

    let response = post_form(&app, "/edit/note/", EDIT_FORM, Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let note = NoteRepo::find_for_author(&pool, "note", author.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(note.text, NOTE_TEXT);
    assert_eq!(note.title, NOTE_TITLE);
}

/// The ownership check runs before the body is decoded, so even a body of
/// the wrong type answers 404 to a reader.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reader_gets_404_for_any_edit_body(pool: PgPool) {
    let author = create_user(&pool, "Автор").await;
    create_user(&pool, "Не автор").await;
    create_note(&pool, &author, NOTE_TITLE, NOTE_TEXT, "note").await;
    let app = common::build_test_app(pool.clone()).await;

    let json_edit = |cookie: &str| {
        Request::builder()
            .method(Method::POST)
            .uri("/edit/note/")
            .header(CONTENT_TYPE, "application/json")
            .header(COOKIE, cookie)
            .body(Body::from(r#"{"title":"x","text":"y"}"#))
            .unwrap()
    };

    let reader = login(&app, "Не автор").await;
    let response = send(&app, json_edit(&reader)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let owner = login(&app, "Автор").await;
    let response = send(&app, json_edit(&owner)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");

    let note = NoteRepo::find_for_author(&pool, "note", author.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(note.text, NOTE_TEXT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_into_taken_slug_is_rejected(pool: PgPool) {
    let author = create_user(&pool, "Автор").await;
    create_note(&pool, &author, "First", "one", "first").await;
    create_note(&pool, &author, "Second", "two", "second").await;
    let app = common::build_test_app(pool.clone()).await;
    let cookie = login(&app, "Автор").await;

    let form = [("title", "Second"), ("text", "two"), ("slug", "first")];
    let response = post_form(&app, "/edit/second/", &form, Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["fields"]["slug"][0], format!("first{WARNING}"));
    let second = NoteRepo::find_for_author(&pool, "second", author.id).await.unwrap();
    assert!(second.is_some(), "rejected edit must not change the slug");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_can_rename_slug(pool: PgPool) {
    let author = create_user(&pool, "Автор").await;
    create_note(&pool, &author, NOTE_TITLE, NOTE_TEXT, "note").await;
    let app = common::build_test_app(pool.clone()).await;
    let cookie = login(&app, "Автор").await;

    let form = [("title", "Renamed"), ("text", "body"), ("slug", "")];
    let response = post_form(&app, "/edit/note/", &form, Some(&cookie)).await;

    assert_redirects(&response, "/done/");
    assert!(NoteRepo::find_for_author(&pool, "renamed", author.id)
        .await
        .unwrap()
        .is_some());
    assert!(NoteRepo::find_for_author(&pool, "note", author.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edit_form_is_prefilled(pool: PgPool) {
    let author = create_user(&pool, "Автор").await;
    create_note(&pool, &author, NOTE_TITLE, NOTE_TEXT, "note").await;
    let app = common::build_test_app(pool).await;
    let cookie = login(&app, "Автор").await;

    let response = get(&app, "/edit/note/", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], NOTE_TITLE);
    assert_eq!(json["data"]["text"], NOTE_TEXT);
    assert_eq!(json["data"]["slug"], "note");
}
