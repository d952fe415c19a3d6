//! Session query handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{
    AttendanceRecordDto, RecordListResponse, RegisterSessionRequest, RegisteredResponse,
    SessionDto, SessionListResponse,
};
use crate::app_state::AppState;
use crate::domain::{ClassSession, HallId, SessionId, SessionStatus, StudentId};
use crate::error::{AttendanceError, ErrorResponse};

/// `GET /sessions` — List all known sessions.
#[utoipa::path(
    get,
    path = "/api/v1/sessions",
    tag = "Sessions",
    summary = "List sessions",
    description = "Returns all known class sessions ordered by start time, with their live counters.",
    responses(
        (status = 200, description = "Session list", body = SessionListResponse),
    )
)]
pub async fn list_sessions(State(state): State<AppState>) -> impl IntoResponse {
    let sessions = state.service.schedule().list();
    let data: Vec<SessionDto> = sessions.iter().map(SessionDto::from).collect();
    let total = data.len();
    Json(SessionListResponse { data, total })
}

/// `GET /sessions/:id` — Get one session with live counters.
///
/// # Errors
///
/// Returns [`AttendanceError::SessionNotFound`] for an unknown ID.
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{id}",
    tag = "Sessions",
    summary = "Get session details",
    description = "Returns one session including the counters as last recomputed by the aggregator.",
    params(
        ("id" = uuid::Uuid, Path, description = "Session UUID"),
    ),
    responses(
        (status = 200, description = "Session details", body = SessionDto),
        (status = 404, description = "Session not found", body = ErrorResponse),
    )
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, AttendanceError> {
    let session_id = SessionId::from_uuid(id);
    let Some(session) = state.service.schedule().get(session_id) else {
        return Err(AttendanceError::SessionNotFound(id));
    };
    Ok(Json(SessionDto::from(&session)))
}

/// `GET /sessions/:id/records` — All attendance records of a session.
///
/// Roster members with no camera activity appear as synthesized absent
/// views, so the list always covers the full expected roster.
///
/// # Errors
///
/// Returns [`AttendanceError::SessionNotFound`] for an unknown ID.
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{id}/records",
    tag = "Sessions",
    summary = "List a session's attendance records",
    description = "Returns one record view per expected student: stored records for students the cameras saw, synthesized absent views for the rest.",
    params(
        ("id" = uuid::Uuid, Path, description = "Session UUID"),
    ),
    responses(
        (status = 200, description = "Record list", body = RecordListResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
    )
)]
pub async fn list_session_records(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, AttendanceError> {
    let session_id = SessionId::from_uuid(id);
    let Some(session) = state.service.schedule().get(session_id) else {
        return Err(AttendanceError::SessionNotFound(id));
    };

    let record_locks = state.service.store().for_session(session_id).await;
    let mut data = Vec::with_capacity(record_locks.len());
    let mut seen = std::collections::HashSet::with_capacity(record_locks.len());
    for record_lock in record_locks {
        let record = record_lock.read().await;
        seen.insert(record.key.student_id);
        data.push(AttendanceRecordDto::from(&*record));
    }

    let date = session.start_time.date_naive();
    for student in &session.expected_roster {
        if !seen.contains(student) {
            data.push(AttendanceRecordDto::no_show(*student, &session, date));
        }
    }

    let total = data.len();
    Ok(Json(RecordListResponse { data, total }))
}

/// `POST /sessions` — Register a class session.
///
/// # Errors
///
/// Returns [`AttendanceError::InvalidRequest`] for an inverted time
/// window or unknown status string.
#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    tag = "Sessions",
    summary = "Register a session",
    description = "Registers a class occurrence for the resolver to match events against. Session generation from timetable templates is the schedule service's job; this endpoint only stores the resulting windows.",
    request_body = RegisterSessionRequest,
    responses(
        (status = 201, description = "Session registered", body = RegisteredResponse),
        (status = 400, description = "Invalid window or status", body = ErrorResponse),
    )
)]
pub async fn register_session(
    State(state): State<AppState>,
    Json(req): Json<RegisterSessionRequest>,
) -> Result<impl IntoResponse, AttendanceError> {
    if req.end_time <= req.start_time {
        return Err(AttendanceError::InvalidRequest(
            "end_time must be after start_time".to_string(),
        ));
    }
    let status = match req.status.as_deref() {
        None => SessionStatus::Scheduled,
        Some(raw) => SessionStatus::parse(raw)
            .ok_or_else(|| AttendanceError::InvalidRequest(format!("unknown status: {raw}")))?,
    };

    let id = SessionId::new();
    state.service.schedule().upsert(ClassSession {
        id,
        hall_id: HallId::from_uuid(req.hall_id),
        subject: req.subject,
        start_time: req.start_time,
        end_time: req.end_time,
        status,
        expected_roster: req
            .expected_roster
            .into_iter()
            .map(StudentId::from_uuid)
            .collect(),
        total_present: 0,
        total_late: 0,
        total_absent: 0,
    });

    Ok((
        StatusCode::CREATED,
        Json(RegisteredResponse {
            id: *id.as_uuid(),
            created_at: Utc::now(),
        }),
    ))
}

/// Session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", get(list_sessions).post(register_session))
        .route("/sessions/{id}", get(get_session))
        .route("/sessions/{id}/records", get(list_session_records))
}
