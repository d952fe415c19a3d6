//! PostgreSQL implementation of the audit persistence layer.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::models::StoredAttendanceEvent;
use crate::domain::AttendanceEvent;
use crate::error::AttendanceError;

/// PostgreSQL-backed audit log using `sqlx::PgPool`.
///
/// Append-only: finalized attendance events are written once and never
/// updated. The in-memory ledger stays authoritative for the pipeline;
/// this sink exists for durable audit and offline reporting.
#[derive(Debug, Clone)]
pub struct AttendancePersistence {
    pool: PgPool,
}

impl AttendancePersistence {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends a finalized event to the audit log.
    ///
    /// # Errors
    ///
    /// Returns a [`AttendanceError::PersistenceError`] on database failure.
    pub async fn save_event(&self, event: &AttendanceEvent) -> Result<(), AttendanceError> {
        sqlx::query(
            "INSERT INTO attendance_events \
             (id, student_id, hall_id, session_id, event_time, direction, \
              confidence, spoof_score, status, rejection_reason, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(event.id.as_uuid())
        .bind(event.student_id.as_uuid())
        .bind(event.hall_id.as_uuid())
        .bind(event.session_id.map(|s| *s.as_uuid()))
        .bind(event.timestamp)
        .bind(event.direction.as_str())
        .bind(event.confidence)
        .bind(event.spoof_score)
        .bind(event.processing_status.as_str())
        .bind(event.rejection_reason.map(|r| r.as_str()))
        .bind(event.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AttendanceError::PersistenceError(e.to_string()))?;

        Ok(())
    }

    /// Loads events after the given timestamp, optionally filtered by
    /// session ID.
    ///
    /// # Errors
    ///
    /// Returns a [`AttendanceError::PersistenceError`] on database failure.
    pub async fn load_events_after(
        &self,
        after: DateTime<Utc>,
        session_id: Option<Uuid>,
    ) -> Result<Vec<StoredAttendanceEvent>, AttendanceError> {
        type Row = (
            Uuid,
            Uuid,
            Uuid,
            Option<Uuid>,
            DateTime<Utc>,
            String,
            f64,
            f64,
            String,
            Option<String>,
            DateTime<Utc>,
        );

        let rows = if let Some(sid) = session_id {
            sqlx::query_as::<_, Row>(
                "SELECT id, student_id, hall_id, session_id, event_time, direction, \
                 confidence, spoof_score, status, rejection_reason, created_at \
                 FROM attendance_events \
                 WHERE created_at > $1 AND session_id = $2 ORDER BY created_at ASC",
            )
            .bind(after)
            .bind(sid)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, Row>(
                "SELECT id, student_id, hall_id, session_id, event_time, direction, \
                 confidence, spoof_score, status, rejection_reason, created_at \
                 FROM attendance_events \
                 WHERE created_at > $1 ORDER BY created_at ASC",
            )
            .bind(after)
            .fetch_all(&self.pool)
            .await
        }
        .map_err(|e| AttendanceError::PersistenceError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(
                |(
                    id,
                    student_id,
                    hall_id,
                    session_id,
                    event_time,
                    direction,
                    confidence,
                    spoof_score,
                    status,
                    rejection_reason,
                    created_at,
                )| StoredAttendanceEvent {
                    id,
                    student_id,
                    hall_id,
                    session_id,
                    event_time,
                    direction,
                    confidence,
                    spoof_score,
                    status,
                    rejection_reason,
                    created_at,
                },
            )
            .collect())
    }

    /// Deletes audited events older than the given number of days.
    ///
    /// # Errors
    ///
    /// Returns a [`AttendanceError::PersistenceError`] on database failure.
    pub async fn delete_old_events(&self, before_days: u64) -> Result<u64, AttendanceError> {
        let cutoff =
            Utc::now() - chrono::Duration::days(i64::try_from(before_days).unwrap_or(i64::MAX));

        let result = sqlx::query("DELETE FROM attendance_events WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| AttendanceError::PersistenceError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
