use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Public sequential id, starting at 101.
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub start_date: Option<String>,
    pub status: EventStatus,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventStatus {
    #[default]
    Open,
    Closed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Open => "Open",
            EventStatus::Closed => "Closed",
        }
    }
}

/// An event together with the number of distinct users registered for it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    #[serde(flatten)]
    pub event: Event,
    pub registration_count: i64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, message = "Event name is required"))]
    pub name: String,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub start_date: Option<String>,
    #[serde(default)]
    pub status: EventStatus,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Registrant {
    pub registration_id: String,
    pub gid: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}
