use axum::{http::StatusCode, Json, response::IntoResponse};
use serde_json::json;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "Aurapass API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Campus event registration",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "login": "/api/login",
            "events": "/api/events",
            "announcements": "/api/announcements",
            "profile": "/api/profile"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
