//! Append-only ledger of ingested attendance events.
//!
//! Every event that enters the pipeline lands here as `Pending` and is
//! finalized exactly once. Finalization is idempotent: a second attempt
//! on an already-terminal event is a no-op, which makes duplicate
//! delivery and replay safe. Entries are never deleted — the ledger is
//! the audit trail and the triage queue.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use super::attendance_event::{AttendanceEvent, ProcessingStatus, RejectionReason};
use super::ids::{EventId, SessionId};
use super::record::RecordKey;

/// In-memory event ledger keyed by [`EventId`].
#[derive(Debug, Default)]
pub struct EventLedger {
    events: RwLock<HashMap<EventId, AttendanceEvent>>,
}

impl EventLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a pending event created at ingestion.
    pub async fn insert(&self, event: AttendanceEvent) {
        let mut map = self.events.write().await;
        map.insert(event.id, event);
    }

    /// Transitions an event from `Pending` to the given terminal status.
    ///
    /// Returns `true` if the transition was applied, `false` if the
    /// event was missing or already terminal (idempotent no-op).
    pub async fn finalize(
        &self,
        id: EventId,
        status: ProcessingStatus,
        reason: Option<RejectionReason>,
        session_id: Option<SessionId>,
        record_key: Option<RecordKey>,
    ) -> bool {
        if status == ProcessingStatus::Pending {
            return false;
        }
        let mut map = self.events.write().await;
        let Some(event) = map.get_mut(&id) else {
            return false;
        };
        if event.is_processed() {
            return false;
        }
        event.processing_status = status;
        event.rejection_reason = reason;
        event.session_id = session_id;
        event.record_key = record_key;
        event.processed_at = Some(Utc::now());
        true
    }

    /// Returns a copy of the event with the given ID.
    pub async fn get(&self, id: EventId) -> Option<AttendanceEvent> {
        let map = self.events.read().await;
        map.get(&id).cloned()
    }

    /// Returns all rejected and exception events, newest first — the
    /// human triage queue.
    pub async fn exceptions(&self) -> Vec<AttendanceEvent> {
        let map = self.events.read().await;
        let mut out: Vec<AttendanceEvent> = map
            .values()
            .filter(|e| {
                matches!(
                    e.processing_status,
                    ProcessingStatus::Rejected | ProcessingStatus::Exception
                )
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }

    /// Returns the number of ledger entries.
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    /// Returns `true` if the ledger is empty.
    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event::{Direction, NormalizedEvent, Vendor};
    use crate::domain::ids::{HallId, StudentId};

    fn make_pending() -> AttendanceEvent {
        let normalized = NormalizedEvent {
            vendor: Vendor::Standard,
            student_external_id: "EXT-1".to_string(),
            camera_id: "cam-1".to_string(),
            hall_external_id: "hall-1".to_string(),
            timestamp: Utc::now(),
            direction: Direction::In,
            confidence: 0.95,
            spoof_score: 0.02,
            image_url: None,
            temperature: None,
        };
        AttendanceEvent::pending(StudentId::new(), HallId::new(), &normalized)
    }

    #[tokio::test]
    async fn finalize_applies_once() {
        let ledger = EventLedger::new();
        let event = make_pending();
        let id = event.id;
        ledger.insert(event).await;

        let first = ledger
            .finalize(id, ProcessingStatus::Processed, None, None, None)
            .await;
        assert!(first);

        // Replay is a no-op: the terminal status is never revisited.
        let second = ledger
            .finalize(
                id,
                ProcessingStatus::Rejected,
                Some(RejectionReason::LowConfidence),
                None,
                None,
            )
            .await;
        assert!(!second);

        let stored = ledger.get(id).await;
        let Some(stored) = stored else {
            panic!("event missing");
        };
        assert_eq!(stored.processing_status, ProcessingStatus::Processed);
        assert!(stored.rejection_reason.is_none());
        assert!(stored.processed_at.is_some());
    }

    #[tokio::test]
    async fn finalize_to_pending_is_refused() {
        let ledger = EventLedger::new();
        let event = make_pending();
        let id = event.id;
        ledger.insert(event).await;

        assert!(!ledger
                .finalize(id, ProcessingStatus::Pending, None, None, None)
                .await);
    }

    #[tokio::test]
    async fn exceptions_lists_rejected_and_exception() {
        let ledger = EventLedger::new();

        let processed = make_pending();
        let rejected = make_pending();
        let exception = make_pending();
        let (p_id, r_id, e_id) = (processed.id, rejected.id, exception.id);
        ledger.insert(processed).await;
        ledger.insert(rejected).await;
        ledger.insert(exception).await;

        let _ = ledger
            .finalize(p_id, ProcessingStatus::Processed, None, None, None)
            .await;
        let _ = ledger
            .finalize(
                r_id,
                ProcessingStatus::Rejected,
                Some(RejectionReason::SpoofDetected),
                None,
                None,
            )
            .await;
        let _ = ledger
            .finalize(
                e_id,
                ProcessingStatus::Exception,
                Some(RejectionReason::NoMatchingSession),
                None,
                None,
            )
            .await;

        let queue = ledger.exceptions().await;
        assert_eq!(queue.len(), 2);
        assert!(queue.iter().all(|e| e.id != p_id));
    }

    #[tokio::test]
    async fn finalize_unknown_event_is_noop() {
        let ledger = EventLedger::new();
        assert!(
            !ledger
                .finalize(EventId::new(), ProcessingStatus::Processed, None, None, None)
                .await
        );
    }
}
