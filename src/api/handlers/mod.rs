pub mod root;
pub mod auth;
pub mod users;
pub mod events;
pub mod registrations;
pub mod announcements;
pub mod profile;

use serde::Serialize;

/// Body for endpoints that only report success.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}
