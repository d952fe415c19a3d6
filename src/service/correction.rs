//! Correction workflow: student-raised disputes over attendance records.
//!
//! Requests live inside the record they dispute. Students may only
//! create requests; staff perform the single `Pending -> Approved |
//! Rejected` transition, after which the request is immutable. Approval
//! records the adjudication; it does not rewrite the record's derived
//! status, which stays the event-sourced truth.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::record::RecordKey;
use crate::domain::{CorrectionRequest, CorrectionStatus, RecordStore};
use crate::error::AttendanceError;

/// Manages correction requests embedded in attendance records.
#[derive(Debug, Clone)]
pub struct CorrectionService {
    store: Arc<RecordStore>,
}

impl CorrectionService {
    /// Creates the service over the shared record store.
    #[must_use]
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Submits a new pending correction request against a record.
    ///
    /// Returns the index of the new request within the record's dispute
    /// history.
    ///
    /// # Errors
    ///
    /// Returns [`AttendanceError::RecordNotFound`] when no record exists
    /// for the key. A record is only created by camera events; there is
    /// nothing to dispute before the first one.
    pub async fn submit(&self, key: RecordKey, reason: String) -> Result<usize, AttendanceError> {
        let Some(record_lock) = self.store.get(&key).await else {
            return Err(AttendanceError::RecordNotFound);
        };
        let mut record = record_lock.write().await;
        record.correction_requests.push(CorrectionRequest {
            reason,
            requested_at: Utc::now(),
            status: CorrectionStatus::Pending,
            admin_notes: None,
            reviewed_at: None,
        });
        let index = record.correction_requests.len() - 1;

        info!(
            student_id = %key.student_id,
            session_id = %key.session_id,
            index,
            "correction request submitted"
        );
        Ok(index)
    }

    /// Adjudicates a pending correction request.
    ///
    /// # Errors
    ///
    /// Returns [`AttendanceError::RecordNotFound`] for an unknown key,
    /// [`AttendanceError::CorrectionNotFound`] for an out-of-range
    /// index, and [`AttendanceError::CorrectionAlreadyReviewed`] when
    /// the request has already left `Pending`.
    pub async fn review(
        &self,
        key: RecordKey,
        index: usize,
        approve: bool,
        admin_notes: Option<String>,
    ) -> Result<CorrectionRequest, AttendanceError> {
        let Some(record_lock) = self.store.get(&key).await else {
            return Err(AttendanceError::RecordNotFound);
        };
        let mut record = record_lock.write().await;
        let Some(request) = record.correction_requests.get_mut(index) else {
            return Err(AttendanceError::CorrectionNotFound(index));
        };
        if request.status != CorrectionStatus::Pending {
            return Err(AttendanceError::CorrectionAlreadyReviewed);
        }

        request.status = if approve {
            CorrectionStatus::Approved
        } else {
            CorrectionStatus::Rejected
        };
        request.admin_notes = admin_notes;
        request.reviewed_at = Some(Utc::now());

        info!(
            student_id = %key.student_id,
            session_id = %key.session_id,
            index,
            approved = approve,
            "correction request reviewed"
        );
        Ok(request.clone())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{AttendanceRecord, SessionId, StudentId};
    use chrono::{Duration, NaiveDate, TimeZone};

    async fn setup_with_record() -> (CorrectionService, RecordKey) {
        let store = Arc::new(RecordStore::new());
        let key = RecordKey {
            student_id: StudentId::new(),
            session_id: SessionId::new(),
            date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap_or_default(),
        };
        let start = Utc
            .with_ymd_and_hms(2025, 9, 1, 9, 0, 0)
            .single()
            .unwrap_or_default();
        let _ = store
            .get_or_create(key, || {
                AttendanceRecord::new(key, start, start + Duration::minutes(60))
            })
            .await;
        (CorrectionService::new(store), key)
    }

    #[tokio::test]
    async fn submit_appends_pending_request() {
        let (service, key) = setup_with_record().await;

        let first = service.submit(key, "I was present".to_string()).await;
        let second = service.submit(key, "camera missed me".to_string()).await;
        assert_eq!(first.ok(), Some(0));
        assert_eq!(second.ok(), Some(1));
    }

    #[tokio::test]
    async fn submit_against_missing_record_fails() {
        let (service, key) = setup_with_record().await;
        let other = RecordKey {
            student_id: StudentId::new(),
            ..key
        };

        let result = service.submit(other, "nope".to_string()).await;
        assert!(matches!(result, Err(AttendanceError::RecordNotFound)));
    }

    #[tokio::test]
    async fn approve_sets_notes_and_timestamp() {
        let (service, key) = setup_with_record().await;
        let _ = service.submit(key, "I was present".to_string()).await;

        let reviewed = service
            .review(key, 0, true, Some("verified on footage".to_string()))
            .await;
        let Ok(reviewed) = reviewed else {
            panic!("review should succeed");
        };
        assert_eq!(reviewed.status, CorrectionStatus::Approved);
        assert_eq!(reviewed.admin_notes.as_deref(), Some("verified on footage"));
        assert!(reviewed.reviewed_at.is_some());
    }

    #[tokio::test]
    async fn second_review_is_a_conflict() {
        let (service, key) = setup_with_record().await;
        let _ = service.submit(key, "I was present".to_string()).await;

        let _ = service.review(key, 0, false, None).await;
        let again = service.review(key, 0, true, None).await;
        assert!(matches!(
            again,
            Err(AttendanceError::CorrectionAlreadyReviewed)
        ));
    }

    #[tokio::test]
    async fn out_of_range_index_is_not_found() {
        let (service, key) = setup_with_record().await;

        let result = service.review(key, 3, true, None).await;
        assert!(matches!(
            result,
            Err(AttendanceError::CorrectionNotFound(3))
        ));
    }
}
