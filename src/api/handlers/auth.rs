use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    api::{extract::AppJson, state::AppState},
    domain::UserProfile,
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub gid: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    #[serde(flatten)]
    pub profile: UserProfile,
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let (token, profile) = state.service_context.user_service
        .authenticate(&req.gid, &req.password)
        .await?;

    Ok(Json(LoginResponse {
        success: true,
        token,
        profile,
    }))
}
