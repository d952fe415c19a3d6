//! Domain layer: core types, record store, ledger, and event system.
//!
//! This module contains the server-side domain model: typed identifiers,
//! the canonical event shape, the persisted attendance event and record,
//! the class session entity, per-hall policy, the live event bus, the
//! per-key record store, and the append-only event ledger.

pub mod attendance_event;
pub mod event;
pub mod event_bus;
pub mod ids;
pub mod ledger;
pub mod live_event;
pub mod policy;
pub mod record;
pub mod record_store;
pub mod session;

pub use attendance_event::{AttendanceEvent, ProcessingStatus, RejectionReason};
pub use event::{Direction, NormalizedEvent, Vendor};
pub use event_bus::EventBus;
pub use ids::{EventId, HallId, SessionId, StudentId};
pub use ledger::EventLedger;
pub use live_event::{AlertKind, LiveEvent};
pub use policy::HallPolicy;
pub use record::{AttendanceRecord, AttendanceStatus, CorrectionRequest, CorrectionStatus, RecordKey};
pub use record_store::RecordStore;
pub use session::{ClassSession, SessionStatus};
