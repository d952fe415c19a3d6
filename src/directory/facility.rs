//! Facility collaborator: camera/device identifier to physical hall.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::Serialize;

use crate::domain::{HallId, HallPolicy};

/// A physical hall with its configured attendance policy.
#[derive(Debug, Clone, Serialize)]
pub struct Hall {
    /// Internal hall identifier.
    pub id: HallId,
    /// Identifier the cameras report for this hall.
    pub external_id: String,
    /// Display name.
    pub name: String,
    /// Seating capacity.
    pub capacity: u32,
    /// Validation/attendance thresholds for events in this hall.
    pub policy: HallPolicy,
}

/// Resolves a camera/device identifier to a hall.
///
/// Interface boundary to the external facility directory; the gateway
/// ships an in-memory implementation populated over the directory API.
pub trait FacilityDirectory: Send + Sync + std::fmt::Debug {
    /// Looks up a hall by the identifier cameras report.
    fn resolve(&self, external_id: &str) -> Option<Hall>;

    /// Registers or replaces a hall.
    fn upsert(&self, hall: Hall);
}

/// In-memory facility directory keyed by external identifier.
#[derive(Debug, Default)]
pub struct InMemoryFacility {
    halls: RwLock<HashMap<String, Hall>>,
}

impl InMemoryFacility {
    /// Creates an empty facility directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FacilityDirectory for InMemoryFacility {
    fn resolve(&self, external_id: &str) -> Option<Hall> {
        let map = self.halls.read().unwrap_or_else(|e| e.into_inner());
        map.get(external_id).cloned()
    }

    fn upsert(&self, hall: Hall) {
        let mut map = self.halls.write().unwrap_or_else(|e| e.into_inner());
        map.insert(hall.external_id.clone(), hall);
    }
}
