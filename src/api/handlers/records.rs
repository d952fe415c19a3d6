//! Per-student record query handlers.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::dto::{AttendanceRecordDto, RecordListResponse};
use crate::app_state::AppState;
use crate::domain::StudentId;

/// Query parameters for the student record listing.
#[derive(Debug, Deserialize, IntoParams)]
pub struct StudentRecordsQuery {
    /// Restrict to one calendar day (`YYYY-MM-DD`).
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// `GET /students/:id/records` — A student's attendance history.
#[utoipa::path(
    get,
    path = "/api/v1/students/{id}/records",
    tag = "Records",
    summary = "List a student's attendance records",
    description = "Returns all stored attendance records for the student, optionally restricted to one calendar day. Sessions the cameras never saw the student in have no stored record and do not appear here.",
    params(
        ("id" = uuid::Uuid, Path, description = "Student UUID"),
        StudentRecordsQuery,
    ),
    responses(
        (status = 200, description = "Record list", body = RecordListResponse),
    )
)]
pub async fn list_student_records(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Query(query): Query<StudentRecordsQuery>,
) -> impl IntoResponse {
    let student_id = StudentId::from_uuid(id);
    let record_locks = state.service.store().for_student(student_id, query.date).await;

    let mut data = Vec::with_capacity(record_locks.len());
    for record_lock in record_locks {
        let record = record_lock.read().await;
        data.push(AttendanceRecordDto::from(&*record));
    }
    data.sort_by_key(|r| r.class_start_time);

    let total = data.len();
    Json(RecordListResponse { data, total })
}

/// Record query routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/students/{id}/records", get(list_student_records))
}
