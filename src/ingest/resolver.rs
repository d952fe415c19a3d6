//! Session resolver: attributes an event to a scheduled class session.

use chrono::{DateTime, Utc};

use crate::directory::ScheduleDirectory;
use crate::domain::{ClassSession, HallId};

/// Finds the session whose hall matches and whose `[start, end)` window
/// contains the event timestamp, restricted to scheduled/ongoing
/// sessions.
///
/// Structurally overlapping sessions are a data-quality fault in the
/// external schedule service, not something this core re-validates: the
/// overlap is logged as a warning and the earliest-starting candidate is
/// returned so the pipeline stays total.
#[must_use]
pub fn resolve(
    schedule: &dyn ScheduleDirectory,
    hall: HallId,
    at: DateTime<Utc>,
) -> Option<ClassSession> {
    let mut matches = schedule.sessions_at(hall, at);
    if matches.len() > 1 {
        tracing::warn!(
            %hall,
            timestamp = %at,
            candidates = matches.len(),
            "overlapping sessions for hall; scheduling precondition violated"
        );
    }
    if matches.is_empty() {
        None
    } else {
        Some(matches.swap_remove(0))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::directory::InMemorySchedule;
    use crate::domain::{SessionId, SessionStatus};
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn make_session(hall: HallId, start_h: u32, end_h: u32) -> ClassSession {
        ClassSession {
            id: SessionId::new(),
            hall_id: hall,
            subject: "Operating Systems".to_string(),
            start_time: Utc
                .with_ymd_and_hms(2025, 9, 1, start_h, 0, 0)
                .single()
                .unwrap_or_default(),
            end_time: Utc
                .with_ymd_and_hms(2025, 9, 1, end_h, 0, 0)
                .single()
                .unwrap_or_default(),
            status: SessionStatus::Scheduled,
            expected_roster: HashSet::new(),
            total_present: 0,
            total_late: 0,
            total_absent: 0,
        }
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 1, h, m, 0)
            .single()
            .unwrap_or_default()
    }

    #[test]
    fn resolves_containing_window() {
        let schedule = InMemorySchedule::new();
        let hall = HallId::new();
        let session = make_session(hall, 9, 10);
        let id = session.id;
        schedule.upsert(session);
        schedule.upsert(make_session(hall, 11, 12));

        let resolved = resolve(&schedule, hall, at(9, 30));
        let Some(resolved) = resolved else {
            panic!("expected a session");
        };
        assert_eq!(resolved.id, id);
    }

    #[test]
    fn no_session_outside_all_windows() {
        let schedule = InMemorySchedule::new();
        let hall = HallId::new();
        schedule.upsert(make_session(hall, 9, 10));

        assert!(resolve(&schedule, hall, at(10, 30)).is_none());
    }

    #[test]
    fn wrong_hall_does_not_match() {
        let schedule = InMemorySchedule::new();
        let hall = HallId::new();
        schedule.upsert(make_session(hall, 9, 10));

        assert!(resolve(&schedule, HallId::new(), at(9, 30)).is_none());
    }

    #[test]
    fn overlap_returns_earliest_start() {
        let schedule = InMemorySchedule::new();
        let hall = HallId::new();
        let early = make_session(hall, 8, 10);
        let early_id = early.id;
        schedule.upsert(early);
        schedule.upsert(make_session(hall, 9, 11));

        let resolved = resolve(&schedule, hall, at(9, 30));
        let Some(resolved) = resolved else {
            panic!("expected a session");
        };
        assert_eq!(resolved.id, early_id);
    }
}
