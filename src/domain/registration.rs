use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Event;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: String,
    pub event_id: i64,
    pub reg_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrationWithEvent {
    #[serde(flatten)]
    pub registration: Registration,
    pub event: Event,
}
