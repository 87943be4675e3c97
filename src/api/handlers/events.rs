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
    domain::{CreateEventRequest, Event, EventSummary, Registrant},
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct ListResponse {
    success: bool,
    events: Vec<EventSummary>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<ListResponse>> {
    let events = state.service_context.event_service.list().await?;

    Ok(Json(ListResponse { success: true, events }))
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
    success: bool,
    message: String,
    event: Event,
}

pub async fn create(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<CreateResponse>)> {
    let event = state.service_context.event_service.create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateResponse {
            success: true,
            message: "Event created".to_string(),
            event,
        }),
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<MessageResponse>> {
    state.service_context.event_service.delete(id).await?;

    Ok(Json(MessageResponse::ok("Event deleted")))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationsResponse {
    success: bool,
    event_name: String,
    registrations: Vec<Registrant>,
}

pub async fn registrations(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<RegistrationsResponse>> {
    let (event, registrations) = state.service_context.event_service.registrants(id).await?;

    Ok(Json(RegistrationsResponse {
        success: true,
        event_name: event.map(|e| e.name).unwrap_or_else(|| "Unknown".to_string()),
        registrations,
    }))
}
