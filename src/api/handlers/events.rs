//! Event ingestion and exception-queue handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{ExceptionDto, ExceptionListResponse, IngestResponse};
use crate::app_state::AppState;
use crate::error::{AttendanceError, ErrorResponse};

/// `POST /events` — Ingest one raw camera event.
///
/// The body is vendor-shaped JSON; the gateway detects the vendor and
/// normalizes it. Policy rejections come back as `200 OK` with a
/// rejected/exception status: they are final outcomes, not request
/// errors.
///
/// # Errors
///
/// Returns [`AttendanceError::StudentNotFound`] or
/// [`AttendanceError::HallNotFound`] for unknown identifiers.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    summary = "Ingest a camera event",
    description = "Accepts a raw face-recognition event in any supported vendor format, normalizes it, and runs it through the attendance pipeline. The response carries the terminal disposition and, for processed events, the resulting attendance status.",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Event finalized", body = IngestResponse),
        (status = 404, description = "Unknown student or hall", body = ErrorResponse),
    )
)]
pub async fn ingest_event(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<impl IntoResponse, AttendanceError> {
    let outcome = state.service.process(&payload).await?;
    Ok(Json(IngestResponse::from(outcome)))
}

/// `GET /events/exceptions` — The human triage queue.
#[utoipa::path(
    get,
    path = "/api/v1/events/exceptions",
    tag = "Events",
    summary = "List rejected and unattributed events",
    description = "Returns every rejected and exception event, newest first, for operator triage.",
    responses(
        (status = 200, description = "Exception queue", body = ExceptionListResponse),
    )
)]
pub async fn list_exceptions(State(state): State<AppState>) -> impl IntoResponse {
    let events = state.service.ledger().exceptions().await;
    let data: Vec<ExceptionDto> = events.iter().map(ExceptionDto::from).collect();
    let total = data.len();
    (StatusCode::OK, Json(ExceptionListResponse { data, total }))
}

/// Event ingestion routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(ingest_event))
        .route("/events/exceptions", get(list_exceptions))
}
