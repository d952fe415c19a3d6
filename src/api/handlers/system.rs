//! System endpoints: health check and policy defaults.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Server-wide policy defaults.
#[derive(Debug, Serialize, ToSchema)]
struct PolicyDefaultsResponse {
    min_confidence: f64,
    max_spoof_score: f64,
    late_threshold_minutes: i64,
    presence_threshold_percent: i64,
}

/// `GET /config/defaults` — The policy defaults applied to halls
/// registered without overrides.
#[utoipa::path(
    get,
    path = "/config/defaults",
    tag = "System",
    summary = "Policy defaults",
    description = "Returns the server-wide validation and attendance thresholds used when a hall is registered without overrides.",
    responses(
        (status = 200, description = "Policy defaults", body = PolicyDefaultsResponse),
    )
)]
pub async fn policy_defaults_handler(State(state): State<AppState>) -> impl IntoResponse {
    let defaults = &state.policy_defaults;
    (
        StatusCode::OK,
        Json(PolicyDefaultsResponse {
            min_confidence: defaults.min_confidence,
            max_spoof_score: defaults.max_spoof_score,
            late_threshold_minutes: defaults.late_threshold_minutes,
            presence_threshold_percent: defaults.presence_threshold_percent,
        }),
    )
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/defaults", get(policy_defaults_handler))
}
