//! Directory registration handlers for students and halls.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{RegisterHallRequest, RegisterStudentRequest, RegisteredResponse};
use crate::app_state::AppState;
use crate::directory::{Hall, Student};
use crate::domain::{HallId, HallPolicy, StudentId};
use crate::error::{AttendanceError, ErrorResponse};

/// `POST /students` — Register a student in the roster.
///
/// # Errors
///
/// Returns [`AttendanceError::InvalidRequest`] for an empty external ID.
#[utoipa::path(
    post,
    path = "/api/v1/students",
    tag = "Directory",
    summary = "Register a student",
    description = "Registers or replaces the roster entry for a camera-reported student identifier.",
    request_body = RegisterStudentRequest,
    responses(
        (status = 201, description = "Student registered", body = RegisteredResponse),
        (status = 400, description = "Empty external ID", body = ErrorResponse),
    )
)]
pub async fn register_student(
    State(state): State<AppState>,
    Json(req): Json<RegisterStudentRequest>,
) -> Result<impl IntoResponse, AttendanceError> {
    if req.external_id.trim().is_empty() {
        return Err(AttendanceError::InvalidRequest(
            "external_id must not be empty".to_string(),
        ));
    }

    let id = StudentId::new();
    state.service.roster().upsert(Student {
        id,
        external_id: req.external_id,
        name: req.name,
        program: req.program,
        year: req.year,
        section: req.section,
    });

    Ok((
        StatusCode::CREATED,
        Json(RegisteredResponse {
            id: *id.as_uuid(),
            created_at: Utc::now(),
        }),
    ))
}

/// `POST /halls` — Register a hall with its attendance policy.
///
/// Threshold fields omitted from the request inherit the server-wide
/// defaults.
///
/// # Errors
///
/// Returns [`AttendanceError::InvalidRequest`] for an empty external ID.
#[utoipa::path(
    post,
    path = "/api/v1/halls",
    tag = "Directory",
    summary = "Register a hall",
    description = "Registers or replaces a hall, including its per-hall validation and attendance thresholds.",
    request_body = RegisterHallRequest,
    responses(
        (status = 201, description = "Hall registered", body = RegisteredResponse),
        (status = 400, description = "Empty external ID", body = ErrorResponse),
    )
)]
pub async fn register_hall(
    State(state): State<AppState>,
    Json(req): Json<RegisterHallRequest>,
) -> Result<impl IntoResponse, AttendanceError> {
    if req.external_id.trim().is_empty() {
        return Err(AttendanceError::InvalidRequest(
            "external_id must not be empty".to_string(),
        ));
    }

    let defaults = &state.policy_defaults;
    let policy = HallPolicy {
        min_confidence: req.min_confidence.unwrap_or(defaults.min_confidence),
        max_spoof_score: req.max_spoof_score.unwrap_or(defaults.max_spoof_score),
        late_threshold_minutes: req
            .late_threshold_minutes
            .unwrap_or(defaults.late_threshold_minutes),
        presence_threshold_percent: req
            .presence_threshold_percent
            .unwrap_or(defaults.presence_threshold_percent),
    };

    let id = HallId::new();
    state.service.facility().upsert(Hall {
        id,
        external_id: req.external_id,
        name: req.name,
        capacity: req.capacity,
        policy,
    });

    Ok((
        StatusCode::CREATED,
        Json(RegisteredResponse {
            id: *id.as_uuid(),
            created_at: Utc::now(),
        }),
    ))
}

/// Directory registration routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/students", post(register_student))
        .route("/halls", post(register_hall))
}
