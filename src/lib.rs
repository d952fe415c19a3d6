//! # attendance-gateway
//!
//! REST API and WebSocket gateway for face-recognition attendance
//! tracking.
//!
//! Cameras from several vendors post raw recognition events; the
//! gateway normalizes them, validates them against per-hall policy,
//! attributes them to scheduled class sessions, and drives a
//! per-(student, session, date) state machine that derives the final
//! attendance status. Dashboards follow along over WebSocket.
//!
//! ## Architecture
//!
//! ```text
//! Cameras / Dashboards (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── AttendanceService pipeline (service/)
//!     │     normalize → validate → resolve → state engine → aggregate
//!     ├── CorrectionService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── RecordStore + EventLedger (domain/)
//!     ├── Roster / Facility / Schedule directories (directory/)
//!     │
//!     └── PostgreSQL audit persistence
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod directory;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod persistence;
pub mod service;
pub mod ws;
