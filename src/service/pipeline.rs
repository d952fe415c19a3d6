//! Event processing pipeline: the single entry point that takes a raw
//! camera payload through normalization, validation, session
//! resolution, the attendance state machine, and finalization.
//!
//! The pipeline is total: every payload that passes referential
//! resolution ends as exactly one terminal ledger disposition
//! (`Processed`, `Rejected`, or `Exception`), with the matching live
//! messages emitted along the way. Unknown student or hall identifiers
//! are the caller's error and never enter the ledger.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::directory::{FacilityDirectory, RosterDirectory, ScheduleDirectory};
use crate::domain::record::RecordKey;
use crate::domain::{
    AlertKind, AttendanceEvent, AttendanceRecord, AttendanceStatus, Direction, EventBus,
    EventId, EventLedger, LiveEvent, ProcessingStatus, RecordStore, RejectionReason, SessionId,
    StudentId,
};
use crate::error::AttendanceError;
use crate::ingest::{Verdict, normalize, resolve, validate};
use crate::persistence::AttendancePersistence;
use crate::service::aggregator::SessionAggregator;
use crate::service::engine::{apply_in, apply_out};

/// Outcome of processing one raw payload, returned to the ingesting
/// caller and suitable for the HTTP response body.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutcome {
    /// Ledger entry created for the event.
    pub event_id: EventId,
    /// Terminal disposition.
    pub status: ProcessingStatus,
    /// Reason, for rejected/exception dispositions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<RejectionReason>,
    /// Attributed session, when one matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    /// Attendance status after the event was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance_status: Option<AttendanceStatus>,
    /// Minutes late on the record, for processed events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub late_minutes: Option<i64>,
}

/// Orchestrates the full ingest-to-record pipeline.
///
/// One instance is shared by all request handlers; all state lives
/// behind the store, ledger, and directory handles, so `process` can run
/// on any number of concurrent tasks.
#[derive(Debug, Clone)]
pub struct AttendanceService {
    roster: Arc<dyn RosterDirectory>,
    facility: Arc<dyn FacilityDirectory>,
    schedule: Arc<dyn ScheduleDirectory>,
    store: Arc<RecordStore>,
    ledger: Arc<EventLedger>,
    event_bus: EventBus,
    aggregator: SessionAggregator,
    persistence: Option<AttendancePersistence>,
}

impl AttendanceService {
    /// Creates the pipeline over the given collaborators.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        roster: Arc<dyn RosterDirectory>,
        facility: Arc<dyn FacilityDirectory>,
        schedule: Arc<dyn ScheduleDirectory>,
        store: Arc<RecordStore>,
        ledger: Arc<EventLedger>,
        event_bus: EventBus,
        persistence: Option<AttendancePersistence>,
    ) -> Self {
        let aggregator = SessionAggregator::new(
            Arc::clone(&store),
            Arc::clone(&schedule),
            event_bus.clone(),
        );
        Self {
            roster,
            facility,
            schedule,
            store,
            ledger,
            event_bus,
            aggregator,
            persistence,
        }
    }

    /// Shared record store handle, for read-side query handlers.
    #[must_use]
    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// Shared ledger handle, for the exceptions query.
    #[must_use]
    pub fn ledger(&self) -> &Arc<EventLedger> {
        &self.ledger
    }

    /// Schedule directory handle, for session query handlers.
    #[must_use]
    pub fn schedule(&self) -> &Arc<dyn ScheduleDirectory> {
        &self.schedule
    }

    /// Roster directory handle, for registration handlers.
    #[must_use]
    pub fn roster(&self) -> &Arc<dyn RosterDirectory> {
        &self.roster
    }

    /// Facility directory handle, for registration handlers.
    #[must_use]
    pub fn facility(&self) -> &Arc<dyn FacilityDirectory> {
        &self.facility
    }

    /// Session aggregator, for on-demand recomputation.
    #[must_use]
    pub fn aggregator(&self) -> &SessionAggregator {
        &self.aggregator
    }

    /// Processes one raw camera payload end to end.
    ///
    /// # Errors
    ///
    /// Returns [`AttendanceError::StudentNotFound`] or
    /// [`AttendanceError::HallNotFound`] when the payload references an
    /// unknown identifier. Policy rejections are not errors: they come
    /// back as a `ProcessOutcome` with a rejected/exception status.
    pub async fn process(&self, payload: &Value) -> Result<ProcessOutcome, AttendanceError> {
        let normalized = normalize(payload);
        debug!(
            vendor = ?normalized.vendor,
            student = %normalized.student_external_id,
            hall = %normalized.hall_external_id,
            direction = normalized.direction.as_str(),
            "payload normalized"
        );

        // Operators see every camera hit, even ones that later fail.
        let _ = self.event_bus.publish(LiveEvent::Swipe {
            student_external_id: normalized.student_external_id.clone(),
            hall_external_id: normalized.hall_external_id.clone(),
            direction: normalized.direction,
            timestamp: normalized.timestamp,
        });

        let Some(student) = self.roster.resolve(&normalized.student_external_id) else {
            return Err(AttendanceError::StudentNotFound(
                normalized.student_external_id,
            ));
        };
        let Some(hall) = self.facility.resolve(&normalized.hall_external_id) else {
            return Err(AttendanceError::HallNotFound(normalized.hall_external_id));
        };

        let entry = AttendanceEvent::pending(student.id, hall.id, &normalized);
        let event_id = entry.id;
        self.ledger.insert(entry).await;

        if let Verdict::Reject(reason) = validate(&normalized, &hall.policy) {
            return Ok(self
                .reject(event_id, student.id, ProcessingStatus::Rejected, reason, None)
                .await);
        }

        let Some(session) = resolve(self.schedule.as_ref(), hall.id, normalized.timestamp) else {
            return Ok(self
                .reject(
                    event_id,
                    student.id,
                    ProcessingStatus::Exception,
                    RejectionReason::NoMatchingSession,
                    None,
                )
                .await);
        };

        let key = RecordKey {
            student_id: student.id,
            session_id: session.id,
            date: normalized.timestamp.date_naive(),
        };

        let (attendance_status, late_minutes) = match normalized.direction {
            Direction::In => {
                let record_lock = self
                    .store
                    .get_or_create(key, || {
                        AttendanceRecord::new(key, session.start_time, session.end_time)
                    })
                    .await;
                let mut record = record_lock.write().await;
                apply_in(&mut record, &normalized, &hall.policy);
                (record.status, record.late_minutes)
            }
            Direction::Out => {
                let Some(record_lock) = self.store.get(&key).await else {
                    return Ok(self
                        .reject(
                            event_id,
                            student.id,
                            ProcessingStatus::Rejected,
                            RejectionReason::NoMatchingInEvent,
                            Some(session.id),
                        )
                        .await);
                };
                let mut record = record_lock.write().await;
                if let Err(reason) = apply_out(&mut record, &normalized, &hall.policy) {
                    drop(record);
                    return Ok(self
                        .reject(
                            event_id,
                            student.id,
                            ProcessingStatus::Rejected,
                            reason,
                            Some(session.id),
                        )
                        .await);
                }
                (record.status, record.late_minutes)
            }
        };

        let _ = self
            .ledger
            .finalize(
                event_id,
                ProcessingStatus::Processed,
                None,
                Some(session.id),
                Some(key),
            )
            .await;
        self.audit(event_id).await;

        let totals = self.aggregator.recompute(session.id).await;

        let _ = self.event_bus.publish(LiveEvent::Marked {
            event_id,
            student_id: student.id,
            session_id: session.id,
            status: attendance_status,
            late_minutes,
            timestamp: Utc::now(),
        });
        match attendance_status {
            AttendanceStatus::Late => {
                let _ = self.event_bus.publish(LiveEvent::Alert {
                    kind: AlertKind::Late,
                    student_id: student.id,
                    session_id: Some(session.id),
                    timestamp: Utc::now(),
                });
            }
            AttendanceStatus::Absent => {
                let _ = self.event_bus.publish(LiveEvent::Alert {
                    kind: AlertKind::Absent,
                    student_id: student.id,
                    session_id: Some(session.id),
                    timestamp: Utc::now(),
                });
            }
            AttendanceStatus::Present | AttendanceStatus::EarlyLeave => {}
        }

        info!(
            %event_id,
            session_id = %session.id,
            status = attendance_status.as_str(),
            present = totals.present,
            late = totals.late,
            absent = totals.absent,
            "event processed"
        );

        Ok(ProcessOutcome {
            event_id,
            status: ProcessingStatus::Processed,
            rejection_reason: None,
            session_id: Some(session.id),
            attendance_status: Some(attendance_status),
            late_minutes: Some(late_minutes),
        })
    }

    /// Finalizes a rejected/exception event and emits the triage
    /// messages.
    async fn reject(
        &self,
        event_id: EventId,
        student_id: StudentId,
        status: ProcessingStatus,
        reason: RejectionReason,
        session_id: Option<SessionId>,
    ) -> ProcessOutcome {
        let _ = self
            .ledger
            .finalize(event_id, status, Some(reason), session_id, None)
            .await;

        let _ = self.event_bus.publish(LiveEvent::Exception {
            event_id,
            student_id,
            reason,
            timestamp: Utc::now(),
        });
        if reason == RejectionReason::SpoofDetected {
            let _ = self.event_bus.publish(LiveEvent::Alert {
                kind: AlertKind::SpoofDetected,
                student_id,
                session_id,
                timestamp: Utc::now(),
            });
        }

        self.audit(event_id).await;

        info!(
            %event_id,
            status = status.as_str(),
            reason = reason.as_str(),
            "event not applied"
        );

        ProcessOutcome {
            event_id,
            status,
            rejection_reason: Some(reason),
            session_id,
            attendance_status: None,
            late_minutes: None,
        }
    }

    /// Best-effort write of the finalized ledger entry to the audit
    /// sink. A database failure is logged and never fails the pipeline.
    async fn audit(&self, event_id: EventId) {
        let Some(persistence) = &self.persistence else {
            return;
        };
        let Some(event) = self.ledger.get(event_id).await else {
            return;
        };
        if let Err(e) = persistence.save_event(&event).await {
            error!(%event_id, error = %e, "audit write failed");
        }
    }
}
