//! Durable record of one normalized event plus its disposition.
//!
//! Every event that passes referential resolution is entered into the
//! ledger as `Pending` and finalized exactly once as `Processed`,
//! `Rejected`, or `Exception`. Rejections are data, never silently
//! dropped — dashboard operators query them as a first-class triage
//! queue.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::event::{Direction, NormalizedEvent};
use super::ids::{EventId, HallId, SessionId, StudentId};
use super::record::RecordKey;

/// Terminal-or-pending disposition of an ingested event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    /// Created at ingestion; not yet finalized.
    Pending,
    /// Applied to an attendance record.
    Processed,
    /// Failed a policy rule (confidence, spoof, missing IN).
    Rejected,
    /// Could not be attributed to any session; queued for human triage.
    Exception,
}

impl ProcessingStatus {
    /// Returns the status as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processed => "processed",
            Self::Rejected => "rejected",
            Self::Exception => "exception",
        }
    }
}

/// Typed reason attached to rejected and exception events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Face-match confidence below the hall's minimum.
    LowConfidence,
    /// Spoof score above the hall's maximum — possible impersonation
    /// attempt; raises a security alert in addition to the rejection.
    SpoofDetected,
    /// No scheduled or ongoing session covered the event's hall and time.
    NoMatchingSession,
    /// OUT event with no prior IN for the (student, session, date).
    NoMatchingInEvent,
}

impl RejectionReason {
    /// Returns the reason as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LowConfidence => "low_confidence",
            Self::SpoofDetected => "spoof_detected",
            Self::NoMatchingSession => "no_matching_session",
            Self::NoMatchingInEvent => "no_matching_in_event",
        }
    }
}

/// One ledger entry: a normalized event plus resolution outcome.
///
/// Created `Pending` at ingestion, mutated exactly once at the end of
/// processing, never deleted.
#[derive(Debug, Clone, Serialize)]
pub struct AttendanceEvent {
    /// Ledger identifier, assigned at ingestion.
    pub id: EventId,
    /// Resolved student.
    pub student_id: StudentId,
    /// Resolved hall.
    pub hall_id: HallId,
    /// Session the event was attributed to, when one matched.
    pub session_id: Option<SessionId>,
    /// Event timestamp as reported by the camera.
    pub timestamp: DateTime<Utc>,
    /// Swipe direction.
    pub direction: Direction,
    /// Face-match confidence.
    pub confidence: f64,
    /// Anti-spoof score.
    pub spoof_score: f64,
    /// Disposition; `Pending` until finalized.
    pub processing_status: ProcessingStatus,
    /// Reason for rejection/exception dispositions.
    pub rejection_reason: Option<RejectionReason>,
    /// Attendance record the event ultimately affected.
    pub record_key: Option<RecordKey>,
    /// Ingestion timestamp (server clock).
    pub created_at: DateTime<Utc>,
    /// Finalization timestamp; set by the single terminal transition.
    pub processed_at: Option<DateTime<Utc>>,
}

impl AttendanceEvent {
    /// Creates a pending ledger entry from a normalized event and the
    /// resolved student/hall references.
    #[must_use]
    pub fn pending(student_id: StudentId, hall_id: HallId, event: &NormalizedEvent) -> Self {
        Self {
            id: EventId::new(),
            student_id,
            hall_id,
            session_id: None,
            timestamp: event.timestamp,
            direction: event.direction,
            confidence: event.confidence,
            spoof_score: event.spoof_score,
            processing_status: ProcessingStatus::Pending,
            rejection_reason: None,
            record_key: None,
            created_at: Utc::now(),
            processed_at: None,
        }
    }

    /// True once the event has reached a terminal disposition.
    #[must_use]
    pub fn is_processed(&self) -> bool {
        self.processing_status != ProcessingStatus::Pending
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event::{DEFAULT_SPOOF_SCORE, Vendor};

    fn make_normalized() -> NormalizedEvent {
        NormalizedEvent {
            vendor: Vendor::Standard,
            student_external_id: "EXT-1".to_string(),
            camera_id: "cam-1".to_string(),
            hall_external_id: "hall-1".to_string(),
            timestamp: Utc::now(),
            direction: Direction::In,
            confidence: 0.95,
            spoof_score: DEFAULT_SPOOF_SCORE,
            image_url: None,
            temperature: None,
        }
    }

    #[test]
    fn pending_event_is_not_processed() {
        let event = AttendanceEvent::pending(StudentId::new(), HallId::new(), &make_normalized());
        assert!(!event.is_processed());
        assert_eq!(event.processing_status, ProcessingStatus::Pending);
        assert!(event.processed_at.is_none());
        assert!(event.session_id.is_none());
    }

    #[test]
    fn rejection_reason_wire_strings() {
        assert_eq!(RejectionReason::SpoofDetected.as_str(), "spoof_detected");
        assert_eq!(
            RejectionReason::NoMatchingInEvent.as_str(),
            "no_matching_in_event"
        );
    }
}
