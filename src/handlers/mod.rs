use axum::extract::State;
use axum::response::Response;
use serde::Serialize;

use crate::models::palette;
use crate::state::AppState;
use crate::utils::response::success;

pub mod auth;
pub mod calendar;
pub mod events;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "my-calendar-api",
    };

    success(payload, "Health check successful")
}

/// Colors, icons and labels for every priority.
pub async fn priorities(State(state): State<AppState>) -> Response {
    success(palette::table(state.locale), "Priorities retrieved")
}
