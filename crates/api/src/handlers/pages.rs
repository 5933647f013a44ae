//! Handlers for the static pages: home and the post-action success page.

use axum::Json;
use serde::Serialize;
use yanote_core::types::DbId;

use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::DataResponse;

/// Identity block shown to logged-in visitors.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub message: &'static str,
    pub user: Option<UserInfo>,
}

#[derive(Debug, Serialize)]
pub struct SuccessPage {
    pub message: &'static str,
}

/// GET /
///
/// Public landing page.
pub async fn home(MaybeAuthUser(user): MaybeAuthUser) -> Json<DataResponse<HomePage>> {
    Json(DataResponse {
        data: HomePage {
            message: "YaNote: personal notes",
            user: user.map(|u| UserInfo {
                id: u.user_id,
                username: u.username,
            }),
        },
    })
}

/// GET /done/
///
/// Landing page after a successful add, edit or delete.
pub async fn success(_auth: AuthUser) -> Json<DataResponse<SuccessPage>> {
    Json(DataResponse {
        data: SuccessPage {
            message: "Done!",
        },
    })
}
