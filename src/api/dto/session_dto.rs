//! Class session DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ClassSession;

/// Session summary with live counters.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionDto {
    /// Session identifier.
    pub id: Uuid,
    /// Hall the session takes place in.
    pub hall_id: Uuid,
    /// Course/subject label.
    pub subject: String,
    /// Window start.
    pub start_time: DateTime<Utc>,
    /// Window end.
    pub end_time: DateTime<Utc>,
    /// Lifecycle state.
    pub status: String,
    /// Number of students expected to attend.
    pub expected_count: usize,
    /// Present count, as last recomputed.
    pub total_present: u32,
    /// Late count, as last recomputed.
    pub total_late: u32,
    /// Absent count, as last recomputed.
    pub total_absent: u32,
}

impl From<&ClassSession> for SessionDto {
    fn from(session: &ClassSession) -> Self {
        Self {
            id: *session.id.as_uuid(),
            hall_id: *session.hall_id.as_uuid(),
            subject: session.subject.clone(),
            start_time: session.start_time,
            end_time: session.end_time,
            status: session.status.as_str().to_string(),
            expected_count: session.expected_roster.len(),
            total_present: session.total_present,
            total_late: session.total_late,
            total_absent: session.total_absent,
        }
    }
}

/// Response body for `GET /sessions`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionListResponse {
    /// Sessions ordered by start time.
    pub data: Vec<SessionDto>,
    /// Total number of sessions.
    pub total: usize,
}
