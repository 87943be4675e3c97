use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::{
    api::{
        extract::{AppJson, AppPath},
        handlers::MessageResponse,
        state::AppState,
    },
    domain::{Announcement, CreateAnnouncementRequest},
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct ListResponse {
    success: bool,
    announcements: Vec<Announcement>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<ListResponse>> {
    let announcements = state.service_context.announcement_service.list().await?;

    Ok(Json(ListResponse {
        success: true,
        announcements,
    }))
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    success: bool,
    message: String,
    announcement: Announcement,
}

pub async fn create(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<CreateResponse>)> {
    let announcement = state.service_context.announcement_service.create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateResponse {
            success: true,
            message: "Posted".to_string(),
            announcement,
        }),
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<MessageResponse>> {
    state.service_context.announcement_service.delete(id).await?;

    Ok(Json(MessageResponse::ok("Deleted")))
}
