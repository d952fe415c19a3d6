//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::{EventBus, HallPolicy};
use crate::service::{AttendanceService, CorrectionService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Event processing pipeline and read-side stores.
    pub service: Arc<AttendanceService>,
    /// Correction workflow over the shared record store.
    pub corrections: Arc<CorrectionService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
    /// Server-wide policy defaults applied to halls without overrides.
    pub policy_defaults: HallPolicy,
}
