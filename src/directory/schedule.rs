//! Schedule collaborator: the day's class sessions.
//!
//! Session *generation* from the weekly timetable template is external;
//! this directory only holds the generated windows and the counters the
//! aggregator rewrites on them.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::domain::{ClassSession, HallId, SessionId, StudentId};

/// Supplies and stores class sessions for the core to match events
/// against.
pub trait ScheduleDirectory: Send + Sync + std::fmt::Debug {
    /// Returns all resolvable (scheduled/ongoing) sessions in `hall`
    /// whose `[start, end)` window contains `at`.
    fn sessions_at(&self, hall: HallId, at: DateTime<Utc>) -> Vec<ClassSession>;

    /// Returns the session with the given ID.
    fn get(&self, id: SessionId) -> Option<ClassSession>;

    /// Returns all known sessions.
    fn list(&self) -> Vec<ClassSession>;

    /// Registers or replaces a session.
    fn upsert(&self, session: ClassSession);

    /// Rewrites the derived counters on a session. Returns `false` if
    /// the session is unknown.
    fn set_counters(&self, id: SessionId, present: u32, late: u32, absent: u32) -> bool;

    /// Returns the expected roster of a session, empty when unknown.
    fn expected_roster(&self, id: SessionId) -> HashSet<StudentId>;
}

/// In-memory schedule keyed by session ID.
#[derive(Debug, Default)]
pub struct InMemorySchedule {
    sessions: RwLock<HashMap<SessionId, ClassSession>>,
}

impl InMemorySchedule {
    /// Creates an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScheduleDirectory for InMemorySchedule {
    fn sessions_at(&self, hall: HallId, at: DateTime<Utc>) -> Vec<ClassSession> {
        let map = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        let mut matches: Vec<ClassSession> = map
            .values()
            .filter(|s| s.hall_id == hall && s.status.is_resolvable() && s.contains(at))
            .cloned()
            .collect();
        matches.sort_by_key(|s| s.start_time);
        matches
    }

    fn get(&self, id: SessionId) -> Option<ClassSession> {
        let map = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        map.get(&id).cloned()
    }

    fn list(&self) -> Vec<ClassSession> {
        let map = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        let mut sessions: Vec<ClassSession> = map.values().cloned().collect();
        sessions.sort_by_key(|s| s.start_time);
        sessions
    }

    fn upsert(&self, session: ClassSession) {
        let mut map = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        map.insert(session.id, session);
    }

    fn set_counters(&self, id: SessionId, present: u32, late: u32, absent: u32) -> bool {
        let mut map = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let Some(session) = map.get_mut(&id) else {
            return false;
        };
        session.total_present = present;
        session.total_late = late;
        session.total_absent = absent;
        true
    }

    fn expected_roster(&self, id: SessionId) -> HashSet<StudentId> {
        let map = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        map.get(&id)
            .map(|s| s.expected_roster.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::SessionStatus;
    use chrono::TimeZone;

    fn make_session(hall: HallId, start_h: u32, end_h: u32, status: SessionStatus) -> ClassSession {
        ClassSession {
            id: SessionId::new(),
            hall_id: hall,
            subject: "Databases".to_string(),
            start_time: Utc
                .with_ymd_and_hms(2025, 9, 1, start_h, 0, 0)
                .single()
                .unwrap_or_default(),
            end_time: Utc
                .with_ymd_and_hms(2025, 9, 1, end_h, 0, 0)
                .single()
                .unwrap_or_default(),
            status,
            expected_roster: HashSet::new(),
            total_present: 0,
            total_late: 0,
            total_absent: 0,
        }
    }

    #[test]
    fn sessions_at_matches_hall_and_window() {
        let schedule = InMemorySchedule::new();
        let hall = HallId::new();
        let other_hall = HallId::new();

        schedule.upsert(make_session(hall, 9, 10, SessionStatus::Scheduled));
        schedule.upsert(make_session(hall, 10, 11, SessionStatus::Scheduled));
        schedule.upsert(make_session(other_hall, 9, 10, SessionStatus::Scheduled));

        let at = Utc
            .with_ymd_and_hms(2025, 9, 1, 9, 30, 0)
            .single()
            .unwrap_or_default();
        let matches = schedule.sessions_at(hall, at);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn cancelled_sessions_never_match() {
        let schedule = InMemorySchedule::new();
        let hall = HallId::new();
        schedule.upsert(make_session(hall, 9, 10, SessionStatus::Cancelled));

        let at = Utc
            .with_ymd_and_hms(2025, 9, 1, 9, 30, 0)
            .single()
            .unwrap_or_default();
        assert!(schedule.sessions_at(hall, at).is_empty());
    }

    #[test]
    fn set_counters_rewrites() {
        let schedule = InMemorySchedule::new();
        let session = make_session(HallId::new(), 9, 10, SessionStatus::Ongoing);
        let id = session.id;
        schedule.upsert(session);

        assert!(schedule.set_counters(id, 10, 2, 3));
        let stored = schedule.get(id);
        let Some(stored) = stored else {
            panic!("session missing");
        };
        assert_eq!(
            (stored.total_present, stored.total_late, stored.total_absent),
            (10, 2, 3)
        );
        assert!(!schedule.set_counters(SessionId::new(), 1, 1, 1));
    }
}
