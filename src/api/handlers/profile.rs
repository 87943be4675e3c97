use axum::{
    extract::{Extension, State},
    Json,
};
use serde::Serialize;

use crate::{
    api::{extract::AppJson, middleware::auth::CurrentUser, state::AppState},
    domain::UpdateProfileRequest,
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    success: bool,
    message: String,
    /// Present when the password changed; older credentials no longer work.
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

pub async fn update(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppJson(request): AppJson<UpdateProfileRequest>,
) -> Result<Json<UpdateResponse>> {
    let token = state.service_context.user_service
        .update_profile(&current.user.gid, request)
        .await?;

    Ok(Json(UpdateResponse {
        success: true,
        message: "Profile Updated".to_string(),
        token,
    }))
}
