pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    Router,
    routing::{get, post, put, delete},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::service::ServiceContext;
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>) -> Router {
    let app_state = AppState::new(service_context);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        .nest("/api", api_routes(app_state.clone()))

        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .merge(user_routes(state.clone()))
        .merge(admin_routes(state))
}

/// Routes open to any authenticated user.
fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/events", get(handlers::events::list))
        .route("/register", post(handlers::registrations::register))
        .route("/myregistrations", get(handlers::registrations::list_mine))
        .route("/announcements", get(handlers::announcements::list))
        .route("/profile", put(handlers::profile::update))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::users::list))
        .route("/users", post(handlers::users::create))
        .route("/users/:gid", delete(handlers::users::delete))
        .route("/credentials", get(handlers::users::credentials))
        .route("/events", post(handlers::events::create))
        .route("/events/:id", delete(handlers::events::delete))
        .route("/events/:id/registrations", get(handlers::events::registrations))
        .route("/announcements", post(handlers::announcements::create))
        .route("/announcements/:id", delete(handlers::announcements::delete))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_admin,
        ))
}
