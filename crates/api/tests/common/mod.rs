#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_sessions_sqlx_store::PostgresStore;

use yanote_api::app::build_app;
use yanote_api::auth::password::hash_password;
use yanote_api::config::ServerConfig;
use yanote_api::state::AppState;
use yanote_db::models::note::{CreateNote, Note};
use yanote_db::models::user::{CreateUser, User};
use yanote_db::repositories::{NoteRepo, UserRepo};

/// Password given to every user created by [`create_user`].
pub const PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        session_expiry_days: 1,
        session_cookie_secure: false,
    }
}

/// Build the full application router on top of `pool`.
///
/// Uses the same `build_app` as `main.rs`, so tests exercise the real
/// middleware stack including the Postgres-backed session layer.
pub async fn build_test_app(pool: PgPool) -> Router {
    let session_store = PostgresStore::new(pool.clone());
    session_store
        .migrate()
        .await
        .expect("session store migration should succeed");

    let state = AppState {
        pool,
        config: Arc::new(test_config()),
    };
    build_app(state, session_store)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a user with [`PASSWORD`] directly in the database.
pub async fn create_user(pool: &PgPool, username: &str) -> User {
    let password_hash = hash_password(PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash,
        },
    )
    .await
    .expect("user creation should succeed")
}

pub async fn create_note(pool: &PgPool, author: &User, title: &str, text: &str, slug: &str) -> Note {
    NoteRepo::create(
        pool,
        &CreateNote {
            title: title.to_string(),
            text: text.to_string(),
            slug: slug.to_string(),
            author_id: author.id,
        },
    )
    .await
    .expect("note creation should succeed")
}

pub async fn note_count(pool: &PgPool) -> i64 {
    NoteRepo::count(pool).await.unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

pub async fn post_form(
    app: &Router,
    uri: &str,
    fields: &[(&str, &str)],
    cookie: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    send(app, builder.body(Body::from(encode_form(fields))).unwrap()).await
}

pub async fn delete(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
    let mut builder = Request::builder().method(Method::DELETE).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

/// Log in through the real login form and return the `Cookie` header value
/// to replay on later requests.
pub async fn login(app: &Router, username: &str) -> String {
    let response = post_form(
        app,
        "/auth/login/",
        &[("username", username), ("password", PASSWORD)],
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER, "login should redirect");
    session_cookie(&response).expect("login should set a session cookie")
}

/// The `name=value` part of the session `Set-Cookie` header, if any.
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("id="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(LOCATION)
        .expect("response should carry a Location header")
        .to_str()
        .unwrap()
}

/// Assert a `303 See Other` pointing at `target`.
pub fn assert_redirects(response: &Response, target: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response), target);
}
