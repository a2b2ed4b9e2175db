//! Welcome and health endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct WelcomeResponse {
    pub responses: &'static str,
}

/// Welcome message
#[utoipa::path(
    get,
    path = "/",
    tag = "Relay",
    responses((status = 200, description = "Welcome message", body = WelcomeResponse))
)]
pub async fn home() -> Json<WelcomeResponse> {
    Json(WelcomeResponse { responses: "Welcome" })
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[schema(value_type = Object)]
    pub config: serde_json::Value,
}

/// Liveness and redacted configuration
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Server is up", body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        config: state.config.redacted_summary(),
    })
}
