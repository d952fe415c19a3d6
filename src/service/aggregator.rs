//! Session aggregator: recomputes per-session counters and broadcasts
//! snapshots.
//!
//! `recompute` is a full recomputation, never an increment, so it is
//! idempotent and stays correct under concurrent or replayed events. It
//! is safe to run concurrently with event processing on the same
//! session: the scan reads a best-effort snapshot, and the next
//! recompute converges.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;

use crate::directory::ScheduleDirectory;
use crate::domain::{AttendanceStatus, EventBus, LiveEvent, RecordStore, SessionId, StudentId};

/// Recomputed totals for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTotals {
    /// Students present (including early leavers — they attended).
    pub present: u32,
    /// Students late.
    pub late: u32,
    /// Students absent: downgraded records plus expected-roster members
    /// with no record at all.
    pub absent: u32,
}

/// Owns the derived counters on class sessions.
#[derive(Debug, Clone)]
pub struct SessionAggregator {
    store: Arc<RecordStore>,
    schedule: Arc<dyn ScheduleDirectory>,
    event_bus: EventBus,
}

impl SessionAggregator {
    /// Creates a new aggregator.
    #[must_use]
    pub fn new(
        store: Arc<RecordStore>,
        schedule: Arc<dyn ScheduleDirectory>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            store,
            schedule,
            event_bus,
        }
    }

    /// Scans the session's records, rewrites its counters, and emits a
    /// `session-update` snapshot.
    pub async fn recompute(&self, session_id: SessionId) -> SessionTotals {
        let records = self.store.for_session(session_id).await;

        let mut present: u32 = 0;
        let mut late: u32 = 0;
        let mut absent: u32 = 0;
        let mut seen: HashSet<StudentId> = HashSet::with_capacity(records.len());

        for record_lock in records {
            let record = record_lock.read().await;
            seen.insert(record.key.student_id);
            match record.derived_status() {
                AttendanceStatus::Present | AttendanceStatus::EarlyLeave => {
                    present = present.saturating_add(1);
                }
                AttendanceStatus::Late => late = late.saturating_add(1),
                AttendanceStatus::Absent => absent = absent.saturating_add(1),
            }
        }

        // Roster members with no camera activity at all are absent too.
        for student in self.schedule.expected_roster(session_id) {
            if !seen.contains(&student) {
                absent = absent.saturating_add(1);
            }
        }

        let totals = SessionTotals {
            present,
            late,
            absent,
        };

        if !self.schedule.set_counters(session_id, present, late, absent) {
            tracing::warn!(%session_id, "recompute for unknown session");
        }

        let _ = self.event_bus.publish(LiveEvent::SessionUpdate {
            session_id,
            total_present: present,
            total_late: late,
            total_absent: absent,
            timestamp: Utc::now(),
        });

        totals
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::directory::InMemorySchedule;
    use crate::domain::record::RecordKey;
    use crate::domain::{AttendanceRecord, ClassSession, HallId, SessionStatus};
    use chrono::{Duration, NaiveDate, TimeZone};

    fn setup(expected: &[StudentId]) -> (SessionAggregator, Arc<RecordStore>, SessionId) {
        let store = Arc::new(RecordStore::new());
        let schedule = Arc::new(InMemorySchedule::new());
        let session_id = SessionId::new();
        let start = Utc
            .with_ymd_and_hms(2025, 9, 1, 9, 0, 0)
            .single()
            .unwrap_or_default();
        schedule.upsert(ClassSession {
            id: session_id,
            hall_id: HallId::new(),
            subject: "Calculus".to_string(),
            start_time: start,
            end_time: start + Duration::minutes(60),
            status: SessionStatus::Ongoing,
            expected_roster: expected.iter().copied().collect(),
            total_present: 0,
            total_late: 0,
            total_absent: 0,
        });
        let aggregator = SessionAggregator::new(
            Arc::clone(&store),
            Arc::clone(&schedule) as Arc<dyn ScheduleDirectory>,
            EventBus::new(100),
        );
        (aggregator, store, session_id)
    }

    async fn insert_record(
        store: &RecordStore,
        session_id: SessionId,
        student_id: StudentId,
        status: AttendanceStatus,
    ) {
        let start = Utc
            .with_ymd_and_hms(2025, 9, 1, 9, 0, 0)
            .single()
            .unwrap_or_default();
        let key = RecordKey {
            student_id,
            session_id,
            date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap_or_default(),
        };
        let mut record = AttendanceRecord::new(key, start, start + Duration::minutes(60));
        record.time_in = Some(start);
        record.status = status;
        let arc = store.get_or_create(key, || record).await;
        // get_or_create used the init closure; nothing else to do.
        drop(arc);
    }

    #[tokio::test]
    async fn counts_by_derived_status() {
        let (on_time, early, late, short, no_show) = (
            StudentId::new(),
            StudentId::new(),
            StudentId::new(),
            StudentId::new(),
            StudentId::new(),
        );
        let (aggregator, store, session_id) = setup(&[on_time, early, late, short, no_show]);

        insert_record(&store, session_id, on_time, AttendanceStatus::Present).await;
        insert_record(&store, session_id, early, AttendanceStatus::EarlyLeave).await;
        insert_record(&store, session_id, late, AttendanceStatus::Late).await;
        insert_record(&store, session_id, short, AttendanceStatus::Absent).await;
        // no_show has no record at all.

        let totals = aggregator.recompute(session_id).await;
        assert_eq!(totals.present, 2);
        assert_eq!(totals.late, 1);
        assert_eq!(totals.absent, 2);
    }

    #[tokio::test]
    async fn recompute_is_idempotent() {
        let (attended, missing_a, missing_b) =
            (StudentId::new(), StudentId::new(), StudentId::new());
        let (aggregator, store, session_id) = setup(&[attended, missing_a, missing_b]);
        insert_record(&store, session_id, attended, AttendanceStatus::Present).await;

        let first = aggregator.recompute(session_id).await;
        let second = aggregator.recompute(session_id).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn recompute_counts_roster_no_shows_as_absent() {
        let (late, no_show) = (StudentId::new(), StudentId::new());
        let (aggregator, store, session_id) = setup(&[late, no_show]);
        insert_record(&store, session_id, late, AttendanceStatus::Late).await;

        let totals = aggregator.recompute(session_id).await;
        assert_eq!(totals.late, 1);
        assert_eq!(totals.absent, 1);
    }

    #[tokio::test]
    async fn recompute_emits_session_update() {
        let (aggregator, _store, session_id) = setup(&[]);
        let mut rx = aggregator.event_bus.subscribe();

        let _ = aggregator.recompute(session_id).await;

        let event = rx.recv().await;
        let Ok(event) = event else {
            panic!("expected a session-update");
        };
        assert_eq!(event.event_type_str(), "session-update");
        assert_eq!(event.session_id(), Some(session_id));
    }
}
