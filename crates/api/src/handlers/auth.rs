//! Handlers for the `/auth` pages (login, logout, signup).

use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use yanote_core::accounts::SignupForm;
use yanote_core::error::CoreError;
use yanote_core::forms::FormErrors;
use yanote_db::models::user::CreateUser;
use yanote_db::repositories::UserRepo;
use yanote_db::{is_unique_violation, USERNAME_CONSTRAINT};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{safe_next, DEFAULT_LOGIN_REDIRECT, LOGIN_URL, SESSION_USER_ID_KEY};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

const DUPLICATE_USERNAME: &str = "A user with that username already exists.";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query string of `GET /auth/login/`.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

/// Form body of `POST /auth/login/`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginPage {
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogoutPage {
    pub logged_out: bool,
}

#[derive(Debug, Serialize)]
pub struct SignupPage {
    pub fields: &'static [&'static str],
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /auth/login/
///
/// Echoes the `next` target so the login form can carry it along.
pub async fn login_page(Query(query): Query<LoginQuery>) -> Json<DataResponse<LoginPage>> {
    Json(DataResponse {
        data: LoginPage {
            next: safe_next(query.next.as_deref()).map(str::to_string),
        },
    })
}

/// POST /auth/login/
///
/// Authenticate with username + password and bind the user to the session.
/// Redirects to `next` when it is a local path, otherwise to the home page.
pub async fn login(
    session: Session,
    State(state): State<AppState>,
    Form(input): Form<LoginForm>,
) -> AppResult<Redirect> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username or password".into(),
            ))
        })?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        tracing::info!(user_id = user.id, "Rejected login with wrong password");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    // New id on privilege change so a pre-login cookie cannot be fixated.
    session.cycle_id().await?;
    session.insert(SESSION_USER_ID_KEY, user.id).await?;
    UserRepo::record_successful_login(&state.pool, user.id).await?;

    tracing::info!(user_id = user.id, "User logged in");

    let target = safe_next(input.next.as_deref()).unwrap_or(DEFAULT_LOGIN_REDIRECT);
    Ok(Redirect::to(target))
}

/// GET|POST /auth/logout/
///
/// Drop the session. Safe to call when not logged in.
pub async fn logout(session: Session) -> AppResult<Json<DataResponse<LogoutPage>>> {
    session.flush().await?;
    Ok(Json(DataResponse {
        data: LogoutPage { logged_out: true },
    }))
}

/// GET /auth/signup/
pub async fn signup_page() -> Json<DataResponse<SignupPage>> {
    Json(DataResponse {
        data: SignupPage {
            fields: &["username", "password1", "password2"],
        },
    })
}

/// POST /auth/signup/
///
/// Register a new account and redirect to the login page.
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> AppResult<Redirect> {
    let clean = form.clean()?;

    if UserRepo::find_by_username(&state.pool, &clean.username)
        .await?
        .is_some()
    {
        return Err(FormErrors::single("username", DUPLICATE_USERNAME).into());
    }

    let password_hash = hash_password(&clean.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: clean.username,
            password_hash,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e, USERNAME_CONSTRAINT) {
            AppError::Form(FormErrors::single("username", DUPLICATE_USERNAME))
        } else {
            AppError::Database(e)
        }
    })?;

    tracing::info!(user_id = user.id, username = %user.username, "User signed up");

    Ok(Redirect::to(LOGIN_URL))
}
