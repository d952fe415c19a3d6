//! Correction workflow handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};

use crate::api::dto::{
    ReviewCorrectionRequest, ReviewCorrectionResponse, SubmitCorrectionRequest,
    SubmitCorrectionResponse,
};
use crate::app_state::AppState;
use crate::domain::record::RecordKey;
use crate::domain::{SessionId, StudentId};
use crate::error::{AttendanceError, ErrorResponse};

fn record_key(student_id: uuid::Uuid, session_id: uuid::Uuid, date: NaiveDate) -> RecordKey {
    RecordKey {
        student_id: StudentId::from_uuid(student_id),
        session_id: SessionId::from_uuid(session_id),
        date,
    }
}

/// `POST /records/:student_id/:session_id/:date/corrections` — Submit
/// a dispute against a record.
///
/// # Errors
///
/// Returns [`AttendanceError::RecordNotFound`] when no record exists
/// for the key, and [`AttendanceError::InvalidRequest`] for an empty
/// reason.
#[utoipa::path(
    post,
    path = "/api/v1/records/{student_id}/{session_id}/{date}/corrections",
    tag = "Corrections",
    summary = "Submit a correction request",
    description = "Appends a pending dispute to the attendance record identified by (student, session, date). Students may only create requests; adjudication is a separate staff operation.",
    params(
        ("student_id" = uuid::Uuid, Path, description = "Student UUID"),
        ("session_id" = uuid::Uuid, Path, description = "Session UUID"),
        ("date" = String, Path, description = "Calendar day, YYYY-MM-DD"),
    ),
    request_body = SubmitCorrectionRequest,
    responses(
        (status = 201, description = "Correction submitted", body = SubmitCorrectionResponse),
        (status = 400, description = "Empty reason", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
    )
)]
pub async fn submit_correction(
    State(state): State<AppState>,
    Path((student_id, session_id, date)): Path<(uuid::Uuid, uuid::Uuid, NaiveDate)>,
    Json(req): Json<SubmitCorrectionRequest>,
) -> Result<impl IntoResponse, AttendanceError> {
    if req.reason.trim().is_empty() {
        return Err(AttendanceError::InvalidRequest(
            "reason must not be empty".to_string(),
        ));
    }

    let key = record_key(student_id, session_id, date);
    let index = state.corrections.submit(key, req.reason).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitCorrectionResponse {
            index,
            status: "pending".to_string(),
            requested_at: Utc::now(),
        }),
    ))
}

/// `POST /records/:student_id/:session_id/:date/corrections/:index/review`
/// — Adjudicate a pending correction request.
///
/// # Errors
///
/// Returns [`AttendanceError::RecordNotFound`],
/// [`AttendanceError::CorrectionNotFound`], or
/// [`AttendanceError::CorrectionAlreadyReviewed`].
#[utoipa::path(
    post,
    path = "/api/v1/records/{student_id}/{session_id}/{date}/corrections/{index}/review",
    tag = "Corrections",
    summary = "Review a correction request",
    description = "Performs the single pending-to-terminal transition on a correction request. A second review of the same request is a conflict.",
    params(
        ("student_id" = uuid::Uuid, Path, description = "Student UUID"),
        ("session_id" = uuid::Uuid, Path, description = "Session UUID"),
        ("date" = String, Path, description = "Calendar day, YYYY-MM-DD"),
        ("index" = usize, Path, description = "Request index in the record's dispute history"),
    ),
    request_body = ReviewCorrectionRequest,
    responses(
        (status = 200, description = "Correction reviewed", body = ReviewCorrectionResponse),
        (status = 404, description = "Record or request not found", body = ErrorResponse),
        (status = 409, description = "Already reviewed", body = ErrorResponse),
    )
)]
pub async fn review_correction(
    State(state): State<AppState>,
    Path((student_id, session_id, date, index)): Path<(uuid::Uuid, uuid::Uuid, NaiveDate, usize)>,
    Json(req): Json<ReviewCorrectionRequest>,
) -> Result<impl IntoResponse, AttendanceError> {
    let key = record_key(student_id, session_id, date);
    let reviewed = state
        .corrections
        .review(key, index, req.approve, req.admin_notes)
        .await?;

    Ok(Json(ReviewCorrectionResponse::from_request(
        index, &reviewed,
    )))
}

/// Correction workflow routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/records/{student_id}/{session_id}/{date}/corrections",
            post(submit_correction),
        )
        .route(
            "/records/{student_id}/{session_id}/{date}/corrections/{index}/review",
            post(review_correction),
        )
}
