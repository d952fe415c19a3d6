//! Attendance record DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{AttendanceRecord, ClassSession, StudentId};

/// One audited IN/OUT entry on a record.
#[derive(Debug, Serialize, ToSchema)]
pub struct EntryLogDto {
    /// Swipe direction (`"IN"` / `"OUT"`).
    pub direction: String,
    /// Event timestamp.
    pub timestamp: DateTime<Utc>,
    /// Camera that produced the event.
    pub camera_id: String,
    /// Face-match confidence.
    pub confidence: f64,
}

/// One correction request embedded in a record.
#[derive(Debug, Serialize, ToSchema)]
pub struct CorrectionRequestDto {
    /// Position in the record's dispute history.
    pub index: usize,
    /// Student-supplied reason.
    pub reason: String,
    /// Submission timestamp.
    pub requested_at: DateTime<Utc>,
    /// Adjudication state (`pending` / `approved` / `rejected`).
    pub status: String,
    /// Staff notes recorded at review time.
    pub admin_notes: Option<String>,
    /// Review timestamp.
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Full attendance record view.
#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceRecordDto {
    /// Student the record belongs to.
    pub student_id: Uuid,
    /// Session the record belongs to.
    pub session_id: Uuid,
    /// Calendar day (UTC) of the session occurrence.
    pub date: NaiveDate,
    /// Scheduled session start.
    pub class_start_time: DateTime<Utc>,
    /// Scheduled session end.
    pub class_end_time: DateTime<Utc>,
    /// First IN event timestamp.
    pub time_in: Option<DateTime<Utc>>,
    /// Latest OUT event timestamp.
    pub time_out: Option<DateTime<Utc>>,
    /// Presence duration in whole minutes.
    pub duration_minutes: i64,
    /// Derived attendance status.
    pub status: String,
    /// Minutes late on the first IN.
    pub late_minutes: i64,
    /// Absence reason, when the presence rule or a correction set one.
    pub reason_for_absence: Option<String>,
    /// Ordered audit trail of applied events.
    pub entry_logs: Vec<EntryLogDto>,
    /// Ordered dispute history.
    pub correction_requests: Vec<CorrectionRequestDto>,
}

impl From<&AttendanceRecord> for AttendanceRecordDto {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            student_id: *record.key.student_id.as_uuid(),
            session_id: *record.key.session_id.as_uuid(),
            date: record.key.date,
            class_start_time: record.class_start_time,
            class_end_time: record.class_end_time,
            time_in: record.time_in,
            time_out: record.time_out,
            duration_minutes: record.duration_minutes,
            status: record.derived_status().as_str().to_string(),
            late_minutes: record.late_minutes,
            reason_for_absence: record.reason_for_absence.clone(),
            entry_logs: record
                .entry_logs
                .iter()
                .map(|log| EntryLogDto {
                    direction: log.direction.as_str().to_string(),
                    timestamp: log.timestamp,
                    camera_id: log.camera_id.clone(),
                    confidence: log.confidence,
                })
                .collect(),
            correction_requests: record
                .correction_requests
                .iter()
                .enumerate()
                .map(|(index, req)| CorrectionRequestDto {
                    index,
                    reason: req.reason.clone(),
                    requested_at: req.requested_at,
                    status: req.status.as_str().to_string(),
                    admin_notes: req.admin_notes.clone(),
                    reviewed_at: req.reviewed_at,
                })
                .collect(),
        }
    }
}

impl AttendanceRecordDto {
    /// Builds the view for a roster member with no camera activity: an
    /// absent record over the session window, with no events and no
    /// disputes. These views are synthesized at read time and never
    /// stored.
    #[must_use]
    pub fn no_show(student_id: StudentId, session: &ClassSession, date: NaiveDate) -> Self {
        Self {
            student_id: *student_id.as_uuid(),
            session_id: *session.id.as_uuid(),
            date,
            class_start_time: session.start_time,
            class_end_time: session.end_time,
            time_in: None,
            time_out: None,
            duration_minutes: 0,
            status: "absent".to_string(),
            late_minutes: 0,
            reason_for_absence: None,
            entry_logs: Vec::new(),
            correction_requests: Vec::new(),
        }
    }
}

/// Response body for record list endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecordListResponse {
    /// Record views.
    pub data: Vec<AttendanceRecordDto>,
    /// Total number of records returned.
    pub total: usize,
}
