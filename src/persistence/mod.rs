//! Persistence layer: PostgreSQL append-only audit of attendance events.
//!
//! Optional at runtime (`PERSISTENCE_ENABLED`); the in-memory ledger is
//! authoritative for the pipeline, this layer provides durable audit.

pub mod models;
pub mod postgres;

pub use postgres::AttendancePersistence;
