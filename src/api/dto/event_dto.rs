//! Ingestion and exception-queue DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::AttendanceEvent;
use crate::service::ProcessOutcome;

/// Response body for `POST /events`.
#[derive(Debug, Serialize, ToSchema)]
pub struct IngestResponse {
    /// Ledger entry created for the event.
    pub event_id: Uuid,
    /// Terminal disposition (`processed` / `rejected` / `exception`).
    pub status: String,
    /// Reason, for rejected/exception dispositions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    /// Attributed session, when one matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    /// Attendance status after the event was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance_status: Option<String>,
    /// Minutes late on the record, for processed events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub late_minutes: Option<i64>,
}

impl From<ProcessOutcome> for IngestResponse {
    fn from(outcome: ProcessOutcome) -> Self {
        Self {
            event_id: *outcome.event_id.as_uuid(),
            status: outcome.status.as_str().to_string(),
            rejection_reason: outcome.rejection_reason.map(|r| r.as_str().to_string()),
            session_id: outcome.session_id.map(|s| *s.as_uuid()),
            attendance_status: outcome.attendance_status.map(|s| s.as_str().to_string()),
            late_minutes: outcome.late_minutes,
        }
    }
}

/// One rejected or unattributed event in the triage queue.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExceptionDto {
    /// Ledger identifier.
    pub event_id: Uuid,
    /// Resolved student.
    pub student_id: Uuid,
    /// Resolved hall.
    pub hall_id: Uuid,
    /// Attributed session, when one matched before the failure.
    pub session_id: Option<Uuid>,
    /// Camera-reported event timestamp.
    pub timestamp: DateTime<Utc>,
    /// Swipe direction.
    pub direction: String,
    /// Face-match confidence.
    pub confidence: f64,
    /// Anti-spoof score.
    pub spoof_score: f64,
    /// Disposition (`rejected` / `exception`).
    pub status: String,
    /// Typed reason string.
    pub rejection_reason: Option<String>,
    /// Ingestion timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&AttendanceEvent> for ExceptionDto {
    fn from(event: &AttendanceEvent) -> Self {
        Self {
            event_id: *event.id.as_uuid(),
            student_id: *event.student_id.as_uuid(),
            hall_id: *event.hall_id.as_uuid(),
            session_id: event.session_id.map(|s| *s.as_uuid()),
            timestamp: event.timestamp,
            direction: event.direction.as_str().to_string(),
            confidence: event.confidence,
            spoof_score: event.spoof_score,
            status: event.processing_status.as_str().to_string(),
            rejection_reason: event.rejection_reason.map(|r| r.as_str().to_string()),
            created_at: event.created_at,
        }
    }
}

/// Response body for `GET /events/exceptions`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExceptionListResponse {
    /// Exceptions, newest first.
    pub data: Vec<ExceptionDto>,
    /// Total number of exceptions.
    pub total: usize,
}
