use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{auth, calendar, events, health_check, priorities};
use crate::state::AppState;

/// Routing options that come from configuration rather than state.
#[derive(Debug, Clone)]
pub struct RouteOptions {
    pub cors_allowed_origins: String,
    pub production: bool,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            cors_allowed_origins: crate::config::cors::DEFAULT_ALLOWED_ORIGINS.to_string(),
            production: false,
        }
    }
}

pub fn create_routes(state: AppState, options: &RouteOptions) -> Router {
    let auth_routes = Router::new()
        .route("/sign-up", post(auth::sign_up))
        .route("/sign-in", post(auth::sign_in))
        .route("/sign-out", post(auth::sign_out))
        .route("/me", get(auth::current_user));

    let event_routes = Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route(
            "/:id",
            axum::routing::put(events::update_event)
                .patch(events::patch_event)
                .delete(events::delete_event),
        )
        .route("/:id/form", get(events::edit_form));

    let calendar_routes = Router::new()
        .route("/", get(calendar::calendar_feed))
        .route("/draft", get(calendar::new_event_draft));

    Router::new()
        .route("/health", get(health_check))
        .route("/priorities", get(priorities))
        .nest("/auth", auth_routes)
        .nest("/events", event_routes)
        .nest("/calendar", calendar_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(options.production))
        .layer(create_cors_layer(&options.cors_allowed_origins))
}
