//! Concurrent attendance record storage with per-key fine-grained locking.
//!
//! [`RecordStore`] stores all attendance records in a `HashMap` where
//! each entry is individually protected by a [`tokio::sync::RwLock`].
//! The per-key write lock is the sole serialization point of the whole
//! core: all IN/OUT events for one (student, session, date) are applied
//! in a well-defined order, while different keys proceed fully in
//! parallel. The outer map enforces the uniqueness invariant — at most
//! one record per key.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::ids::{SessionId, StudentId};
use super::record::{AttendanceRecord, RecordKey};

/// Central store for all attendance records.
///
/// # Concurrency
///
/// - Multiple tasks may read the same record concurrently.
/// - Writes to different keys are concurrent.
/// - Writes to the same key are serialized.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: RwLock<HashMap<RecordKey, Arc<RwLock<AttendanceRecord>>>>,
}

impl RecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for `key`, creating it via `init` if absent.
    ///
    /// The check-and-insert happens under the outer write lock, so two
    /// concurrent first-IN events for the same key cannot both create a
    /// record.
    pub async fn get_or_create<F>(&self, key: RecordKey, init: F) -> Arc<RwLock<AttendanceRecord>>
    where
        F: FnOnce() -> AttendanceRecord,
    {
        let mut map = self.records.write().await;
        Arc::clone(
            map.entry(key)
                .or_insert_with(|| Arc::new(RwLock::new(init()))),
        )
    }

    /// Returns the record for `key`, if one exists.
    pub async fn get(&self, key: &RecordKey) -> Option<Arc<RwLock<AttendanceRecord>>> {
        let map = self.records.read().await;
        map.get(key).cloned()
    }

    /// Returns all records belonging to the given session.
    ///
    /// Snapshot semantics: the returned handles may be mutated by
    /// concurrent event processing — callers that only read (the
    /// aggregator) accept eventual consistency.
    pub async fn for_session(&self, session_id: SessionId) -> Vec<Arc<RwLock<AttendanceRecord>>> {
        let map = self.records.read().await;
        map.iter()
            .filter(|(key, _)| key.session_id == session_id)
            .map(|(_, arc)| Arc::clone(arc))
            .collect()
    }

    /// Returns all records belonging to the given student, optionally
    /// restricted to one calendar day.
    pub async fn for_student(
        &self,
        student_id: StudentId,
        date: Option<chrono::NaiveDate>,
    ) -> Vec<Arc<RwLock<AttendanceRecord>>> {
        let map = self.records.read().await;
        map.iter()
            .filter(|(key, _)| {
                key.student_id == student_id && date.is_none_or(|d| key.date == d)
            })
            .map(|(_, arc)| Arc::clone(arc))
            .collect()
    }

    /// Returns the number of records in the store.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns `true` if the store contains no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn make_key(session_id: SessionId) -> RecordKey {
        RecordKey {
            student_id: StudentId::new(),
            session_id,
            date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap_or_default(),
        }
    }

    fn make_record(key: RecordKey) -> AttendanceRecord {
        let start = Utc
            .with_ymd_and_hms(2025, 9, 1, 9, 0, 0)
            .single()
            .unwrap_or_default();
        let end = Utc
            .with_ymd_and_hms(2025, 9, 1, 10, 0, 0)
            .single()
            .unwrap_or_default();
        AttendanceRecord::new(key, start, end)
    }

    #[tokio::test]
    async fn get_or_create_creates_once() {
        let store = RecordStore::new();
        let key = make_key(SessionId::new());

        let first = store.get_or_create(key, || make_record(key)).await;
        let second = store.get_or_create(key, || make_record(key)).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = RecordStore::new();
        assert!(store.get(&make_key(SessionId::new())).await.is_none());
    }

    #[tokio::test]
    async fn for_session_filters_by_session() {
        let store = RecordStore::new();
        let session_a = SessionId::new();
        let session_b = SessionId::new();

        let key_a1 = make_key(session_a);
        let key_a2 = make_key(session_a);
        let key_b = make_key(session_b);
        let _ = store.get_or_create(key_a1, || make_record(key_a1)).await;
        let _ = store.get_or_create(key_a2, || make_record(key_a2)).await;
        let _ = store.get_or_create(key_b, || make_record(key_b)).await;

        assert_eq!(store.for_session(session_a).await.len(), 2);
        assert_eq!(store.for_session(session_b).await.len(), 1);
    }

    #[tokio::test]
    async fn for_student_filters_by_date() {
        let store = RecordStore::new();
        let student = StudentId::new();
        let day1 = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap_or_default();
        let day2 = NaiveDate::from_ymd_opt(2025, 9, 2).unwrap_or_default();

        for date in [day1, day2] {
            let key = RecordKey {
                student_id: student,
                session_id: SessionId::new(),
                date,
            };
            let _ = store.get_or_create(key, || make_record(key)).await;
        }

        assert_eq!(store.for_student(student, None).await.len(), 2);
        assert_eq!(store.for_student(student, Some(day1)).await.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_first_in_creates_single_record() {
        let store = Arc::new(RecordStore::new());
        let key = make_key(SessionId::new());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.get_or_create(key, || make_record(key)).await;
            }));
        }
        for handle in handles {
            let _ = handle.await;
        }

        assert_eq!(store.len().await, 1);
    }
}
