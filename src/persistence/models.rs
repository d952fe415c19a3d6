//! Database models for the attendance event audit log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored attendance event row from the `attendance_events` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAttendanceEvent {
    /// Event identifier (ledger ID).
    pub id: Uuid,
    /// Resolved student.
    pub student_id: Uuid,
    /// Resolved hall.
    pub hall_id: Uuid,
    /// Attributed session, when one matched.
    pub session_id: Option<Uuid>,
    /// Camera-reported event timestamp.
    pub event_time: DateTime<Utc>,
    /// Swipe direction (`"IN"` / `"OUT"`).
    pub direction: String,
    /// Face-match confidence.
    pub confidence: f64,
    /// Anti-spoof score.
    pub spoof_score: f64,
    /// Terminal disposition string.
    pub status: String,
    /// Rejection/exception reason string, when any.
    pub rejection_reason: Option<String>,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}
