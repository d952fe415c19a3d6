//! Request/response DTOs for the REST API.
//!
//! DTOs keep the wire format independent of the domain types: typed IDs
//! flatten to UUIDs and enums flatten to their wire strings.

pub mod correction_dto;
pub mod directory_dto;
pub mod event_dto;
pub mod record_dto;
pub mod session_dto;

pub use correction_dto::{
    ReviewCorrectionRequest, ReviewCorrectionResponse, SubmitCorrectionRequest,
    SubmitCorrectionResponse,
};
pub use directory_dto::{
    RegisterHallRequest, RegisterSessionRequest, RegisterStudentRequest, RegisteredResponse,
};
pub use event_dto::{ExceptionDto, ExceptionListResponse, IngestResponse};
pub use record_dto::{AttendanceRecordDto, CorrectionRequestDto, EntryLogDto, RecordListResponse};
pub use session_dto::{SessionDto, SessionListResponse};
