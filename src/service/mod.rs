//! Service layer: the attendance state engine, the processing pipeline,
//! the session aggregator, and the correction workflow.

pub mod aggregator;
pub mod correction;
pub mod engine;
pub mod pipeline;

pub use aggregator::{SessionAggregator, SessionTotals};
pub use correction::CorrectionService;
pub use pipeline::{AttendanceService, ProcessOutcome};
