//! The attendance record: the system of record for "was this student in
//! this class".
//!
//! An [`AttendanceRecord`] is keyed by `(student, session, date)` — at most
//! one record exists per key, enforced by the [`super::RecordStore`]. A
//! record is created on the first IN event, amended by later events and by
//! the correction workflow, and never deleted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::event::Direction;
use super::ids::{SessionId, StudentId};

/// Composite key identifying one attendance record.
///
/// The central invariant of the whole core: at most one record per
/// student per session per calendar day. All writes to one key are
/// serialized by the record store; different keys proceed in parallel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    /// Student the record belongs to.
    pub student_id: StudentId,
    /// Session the record belongs to.
    pub session_id: SessionId,
    /// Calendar day (UTC) of the session occurrence.
    pub date: NaiveDate,
}

/// Derived attendance status for a (student, session, date).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Arrived within the late threshold and stayed.
    Present,
    /// Arrived after the late threshold.
    Late,
    /// Never arrived, or presence fell below the required percentage.
    Absent,
    /// Left more than the grace period before the session ended.
    EarlyLeave,
}

impl AttendanceStatus {
    /// Returns the status as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Late => "late",
            Self::Absent => "absent",
            Self::EarlyLeave => "early_leave",
        }
    }
}

/// One audit entry appended for every IN/OUT event that reached the
/// record, including duplicates that did not change `time_in`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryLog {
    /// Swipe direction.
    pub direction: Direction,
    /// Event timestamp.
    pub timestamp: DateTime<Utc>,
    /// Camera that produced the event.
    pub camera_id: String,
    /// Face-match confidence of the event.
    pub confidence: f64,
}

/// Adjudication state of a correction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionStatus {
    /// Submitted by the student, awaiting staff review.
    Pending,
    /// Staff accepted the dispute.
    Approved,
    /// Staff rejected the dispute.
    Rejected,
}

impl CorrectionStatus {
    /// Returns the status as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// A student-raised dispute embedded in the record it disputes.
///
/// Students may only create requests (always `Pending`); staff perform
/// the single `Pending → Approved | Rejected` transition, after which
/// the request is immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionRequest {
    /// Student-supplied reason for the dispute.
    pub reason: String,
    /// Submission timestamp.
    pub requested_at: DateTime<Utc>,
    /// Adjudication state.
    pub status: CorrectionStatus,
    /// Staff notes recorded at review time.
    pub admin_notes: Option<String>,
    /// Review timestamp, set by the staff transition.
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Persisted attendance record for one (student, session, date).
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRecord {
    /// Record key (immutable after creation).
    pub key: RecordKey,
    /// Scheduled session start.
    pub class_start_time: DateTime<Utc>,
    /// Scheduled session end. Always after `class_start_time`.
    pub class_end_time: DateTime<Utc>,
    /// First IN event timestamp. Never rewritten once set.
    pub time_in: Option<DateTime<Utc>>,
    /// Latest OUT event timestamp. `>= time_in` when both present.
    pub time_out: Option<DateTime<Utc>>,
    /// Presence duration in whole minutes, recomputed on every OUT.
    pub duration_minutes: i64,
    /// Attendance status as of the last applied event.
    pub status: AttendanceStatus,
    /// Minutes late on the first IN (0 when on time).
    pub late_minutes: i64,
    /// Set when status is downgraded to absent by the presence rule,
    /// or by a manual correction.
    pub reason_for_absence: Option<String>,
    /// Ordered audit trail of every event applied to this record.
    pub entry_logs: Vec<EntryLog>,
    /// Ordered dispute history.
    pub correction_requests: Vec<CorrectionRequest>,
}

impl AttendanceRecord {
    /// Creates an empty record for the given key and session window.
    ///
    /// The record starts with no `time_in`, so its derived status is
    /// absent until the first IN event is applied.
    #[must_use]
    pub fn new(
        key: RecordKey,
        class_start_time: DateTime<Utc>,
        class_end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            key,
            class_start_time,
            class_end_time,
            time_in: None,
            time_out: None,
            duration_minutes: 0,
            status: AttendanceStatus::Absent,
            late_minutes: 0,
            reason_for_absence: None,
            entry_logs: Vec::new(),
            correction_requests: Vec::new(),
        }
    }

    /// Returns the status with the absent derivation applied: a record
    /// with no `time_in` is always absent, regardless of the stored
    /// status field. This is a read-time rule, not an event transition.
    #[must_use]
    pub fn derived_status(&self) -> AttendanceStatus {
        if self.time_in.is_none() {
            AttendanceStatus::Absent
        } else {
            self.status
        }
    }

    /// Appends an audit log entry for an applied event.
    pub fn push_entry_log(&mut self, direction: Direction, at: DateTime<Utc>, camera_id: &str, confidence: f64) {
        self.entry_logs.push(EntryLog {
            direction,
            timestamp: at,
            camera_id: camera_id.to_string(),
            confidence,
        });
    }
}
