//! Roster/directory collaborator: camera identifier to student record.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::Serialize;

use crate::domain::StudentId;

/// A student record as resolved by the roster service.
#[derive(Debug, Clone, Serialize)]
pub struct Student {
    /// Internal student identifier.
    pub id: StudentId,
    /// Identifier the cameras report (badge/face-enrollment ID).
    pub external_id: String,
    /// Display name.
    pub name: String,
    /// Degree program code.
    pub program: String,
    /// Year of study.
    pub year: u8,
    /// Section label.
    pub section: String,
}

/// Resolves a camera-reported identifier to a student record.
///
/// Interface boundary to the external roster service; the gateway ships
/// an in-memory implementation populated over the directory API.
pub trait RosterDirectory: Send + Sync + std::fmt::Debug {
    /// Looks up a student by the identifier cameras report.
    fn resolve(&self, external_id: &str) -> Option<Student>;

    /// Registers or replaces a student record.
    fn upsert(&self, student: Student);
}

/// In-memory roster keyed by external identifier.
#[derive(Debug, Default)]
pub struct InMemoryRoster {
    students: RwLock<HashMap<String, Student>>,
}

impl InMemoryRoster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RosterDirectory for InMemoryRoster {
    fn resolve(&self, external_id: &str) -> Option<Student> {
        let map = self.students.read().unwrap_or_else(|e| e.into_inner());
        map.get(external_id).cloned()
    }

    fn upsert(&self, student: Student) {
        let mut map = self.students.write().unwrap_or_else(|e| e.into_inner());
        map.insert(student.external_id.clone(), student);
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn resolve_unknown_returns_none() {
        let roster = InMemoryRoster::new();
        assert!(roster.resolve("EXT-404").is_none());
    }

    #[test]
    fn upsert_then_resolve() {
        let roster = InMemoryRoster::new();
        let id = StudentId::new();
        roster.upsert(Student {
            id,
            external_id: "EXT-1".to_string(),
            name: "Asha Rao".to_string(),
            program: "CS".to_string(),
            year: 2,
            section: "A".to_string(),
        });

        let resolved = roster.resolve("EXT-1");
        let Some(resolved) = resolved else {
            panic!("expected student");
        };
        assert_eq!(resolved.id, id);
        assert_eq!(resolved.name, "Asha Rao");
    }
}
