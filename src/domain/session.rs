//! Class session entity as read from the schedule service.
//!
//! Session identity and window are owned by the external schedule
//! service; the derived counters (`total_present` / `total_late` /
//! `total_absent`) are owned by this core's aggregator, which rewrites
//! them wholesale — never increments them — to stay correct under
//! concurrent and duplicate events.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ids::{HallId, SessionId, StudentId};

/// Lifecycle state of a class session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Scheduled but not yet started.
    Scheduled,
    /// Currently in progress.
    Ongoing,
    /// Finished.
    Completed,
    /// Cancelled; never matched by the resolver.
    Cancelled,
}

impl SessionStatus {
    /// True for states the session resolver may attribute events to.
    #[must_use]
    pub const fn is_resolvable(&self) -> bool {
        matches!(self, Self::Scheduled | Self::Ongoing)
    }

    /// Returns the status as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status string; `None` for unknown values.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "scheduled" => Some(Self::Scheduled),
            "ongoing" => Some(Self::Ongoing),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// One scheduled class occurrence with a hall and time window.
#[derive(Debug, Clone, Serialize)]
pub struct ClassSession {
    /// Session identifier (immutable once created).
    pub id: SessionId,
    /// Hall the session takes place in.
    pub hall_id: HallId,
    /// Course/subject label for dashboards.
    pub subject: String,
    /// Window start (inclusive).
    pub start_time: DateTime<Utc>,
    /// Window end (exclusive). Always after `start_time`.
    pub end_time: DateTime<Utc>,
    /// Lifecycle state.
    pub status: SessionStatus,
    /// Students expected to attend.
    pub expected_roster: HashSet<StudentId>,
    /// Present count, rewritten by the aggregator.
    pub total_present: u32,
    /// Late count, rewritten by the aggregator.
    pub total_late: u32,
    /// Absent count, rewritten by the aggregator.
    pub total_absent: u32,
}

impl ClassSession {
    /// True if `at` falls inside the half-open window `[start, end)`.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start_time && at < self.end_time
    }

    /// Scheduled session length in whole minutes, rounded to nearest.
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        let secs = (self.end_time - self.start_time).num_seconds().max(0);
        (secs + 30).div_euclid(60)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_session(start_h: u32, end_h: u32) -> ClassSession {
        ClassSession {
            id: SessionId::new(),
            hall_id: HallId::new(),
            subject: "Algorithms".to_string(),
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

    #[test]
    fn window_is_half_open() {
        let session = make_session(9, 10);
        assert!(session.contains(session.start_time));
        assert!(!session.contains(session.end_time));
        let inside = Utc
            .with_ymd_and_hms(2025, 9, 1, 9, 59, 59)
            .single()
            .unwrap_or_default();
        assert!(session.contains(inside));
    }

    #[test]
    fn duration_in_minutes() {
        let session = make_session(9, 10);
        assert_eq!(session.duration_minutes(), 60);
    }

    #[test]
    fn cancelled_sessions_are_not_resolvable() {
        assert!(SessionStatus::Scheduled.is_resolvable());
        assert!(SessionStatus::Ongoing.is_resolvable());
        assert!(!SessionStatus::Completed.is_resolvable());
        assert!(!SessionStatus::Cancelled.is_resolvable());
    }
}
