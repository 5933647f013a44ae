//! Session-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;
use yanote_core::types::DbId;
use yanote_db::repositories::UserRepo;

use crate::auth::session::SESSION_USER_ID_KEY;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from the session cookie.
///
/// Use this as an extractor parameter in any handler that requires a login.
/// Anonymous requests are rejected with a redirect to the login page whose
/// `next` parameter points back at the requested path:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id.
    pub user_id: DbId,
    pub username: String,
}

/// The logged-in user if there is one. Never rejects anonymous requests.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::InternalError(msg.to_string()))?;

        let Some(user_id) = session.get::<DbId>(SESSION_USER_ID_KEY).await? else {
            return Ok(MaybeAuthUser(None));
        };

        match UserRepo::find_by_id(&state.pool, user_id).await? {
            Some(user) if user.is_active => Ok(MaybeAuthUser(Some(AuthUser {
                user_id: user.id,
                username: user.username,
            }))),
            _ => {
                // The account vanished or was deactivated after login.
                tracing::info!(user_id, "Dropping session of unavailable user");
                session.flush().await?;
                Ok(MaybeAuthUser(None))
            }
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let next = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        MaybeAuthUser::from_request_parts(parts, state)
            .await?
            .0
            .ok_or(AppError::LoginRequired { next })
    }
}
