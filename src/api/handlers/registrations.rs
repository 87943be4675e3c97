use axum::{
    extract::{Extension, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::{
        extract::AppJson,
        handlers::MessageResponse,
        middleware::auth::CurrentUser,
        state::AppState,
    },
    domain::RegistrationWithEvent,
    error::{AppError, Result},
};

/// Clients send the event id either as a number or as a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EventIdInput {
    Number(i64),
    Text(String),
}

impl EventIdInput {
    fn parse(&self) -> Result<i64> {
        match self {
            EventIdInput::Number(id) => Ok(*id),
            EventIdInput::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| AppError::BadRequest(format!("Invalid event id: {}", text))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    event_id: EventIdInput,
}

pub async fn register(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<Json<MessageResponse>> {
    let event_id = request.event_id.parse()?;

    state.service_context.registration_service
        .register(&current.user.gid, event_id)
        .await?;

    Ok(Json(MessageResponse::ok("Registered Successfully!")))
}

#[derive(Debug, Serialize)]
pub struct MyRegistrationsResponse {
    success: bool,
    registrations: Vec<RegistrationWithEvent>,
}

pub async fn list_mine(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<MyRegistrationsResponse>> {
    let registrations = state.service_context.registration_service
        .list_for_user(&current.user.gid)
        .await?;

    Ok(Json(MyRegistrationsResponse {
        success: true,
        registrations,
    }))
}
