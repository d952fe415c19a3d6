//! Live messages broadcast to dashboard subscribers.
//!
//! Every pipeline decision emits a [`LiveEvent`] through the
//! [`super::EventBus`]; WebSocket connections fan the stream out to
//! their subscribers. Messages serialize as flat JSON objects tagged by
//! `event_type`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::attendance_event::RejectionReason;
use super::event::Direction;
use super::ids::{EventId, SessionId, StudentId};
use super::record::AttendanceStatus;

/// Category of a security/ops alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Student marked late.
    Late,
    /// Student marked absent (no-show or presence downgrade).
    Absent,
    /// Spoofed face detected — possible impersonation attempt.
    SpoofDetected,
}

/// Live message emitted to subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type")]
pub enum LiveEvent {
    /// Raw swipe, emitted before session resolution so operators see
    /// every camera hit even when no class can be attributed.
    #[serde(rename = "attendance-event")]
    Swipe {
        /// Camera-reported student identifier.
        student_external_id: String,
        /// Camera-reported hall identifier.
        hall_external_id: String,
        /// Swipe direction.
        direction: Direction,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Post-state-machine outcome for one processed event.
    #[serde(rename = "attendance-marked")]
    Marked {
        /// Ledger event that produced the outcome.
        event_id: EventId,
        /// Affected student.
        student_id: StudentId,
        /// Attributed session.
        session_id: SessionId,
        /// Attendance status after the event was applied.
        status: AttendanceStatus,
        /// Minutes late (0 when on time).
        late_minutes: i64,
        /// Emission timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Recomputed session totals.
    #[serde(rename = "session-update")]
    SessionUpdate {
        /// Session the totals belong to.
        session_id: SessionId,
        /// Present count.
        total_present: u32,
        /// Late count.
        total_late: u32,
        /// Absent count.
        total_absent: u32,
        /// Emission timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Event that needs human triage (spoof / low confidence / no
    /// session / out-without-in).
    #[serde(rename = "exception")]
    Exception {
        /// Ledger event that was rejected or left unattributed.
        event_id: EventId,
        /// Affected student.
        student_id: StudentId,
        /// Typed reason.
        reason: RejectionReason,
        /// Emission timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Security/ops alert for late, absent, and spoof outcomes.
    #[serde(rename = "alert")]
    Alert {
        /// Alert category.
        kind: AlertKind,
        /// Affected student.
        student_id: StudentId,
        /// Session, when one was attributed.
        session_id: Option<SessionId>,
        /// Emission timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl LiveEvent {
    /// Returns the session this message concerns, when it has one.
    ///
    /// Subscription filtering: messages with a session are delivered to
    /// subscribers of that session; messages without one go only to
    /// wildcard subscribers.
    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        match self {
            Self::Marked { session_id, .. } | Self::SessionUpdate { session_id, .. } => {
                Some(*session_id)
            }
            Self::Alert { session_id, .. } => *session_id,
            Self::Swipe { .. } | Self::Exception { .. } => None,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::Swipe { .. } => "attendance-event",
            Self::Marked { .. } => "attendance-marked",
            Self::SessionUpdate { .. } => "session-update",
            Self::Exception { .. } => "exception",
            Self::Alert { .. } => "alert",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn session_update_serializes_with_tag() {
        let event = LiveEvent::SessionUpdate {
            session_id: SessionId::new(),
            total_present: 12,
            total_late: 3,
            total_absent: 5,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("\"event_type\":\"session-update\""));
        assert!(json.contains("\"total_present\":12"));
    }

    #[test]
    fn swipe_has_no_session() {
        let event = LiveEvent::Swipe {
            student_external_id: "EXT-1".to_string(),
            hall_external_id: "hall-1".to_string(),
            direction: Direction::In,
            timestamp: Utc::now(),
        };
        assert!(event.session_id().is_none());
        assert_eq!(event.event_type_str(), "attendance-event");
    }

    #[test]
    fn marked_exposes_session() {
        let id = SessionId::new();
        let event = LiveEvent::Marked {
            event_id: EventId::new(),
            student_id: StudentId::new(),
            session_id: id,
            status: AttendanceStatus::Present,
            late_minutes: 0,
            timestamp: Utc::now(),
        };
        assert_eq!(event.session_id(), Some(id));
    }
}
