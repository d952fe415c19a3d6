//! Gateway error types with HTTP status code mapping.
//!
//! [`AttendanceError`] is the central error type for the gateway. Each
//! variant maps to a specific HTTP status code and structured JSON error
//! response. Policy rejections (low confidence, spoof, no session, no
//! matching IN) are *not* errors — they are final business outcomes and
//! travel through the ledger as data.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "student not found: EXT-42",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges below).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category          | HTTP Status                |
/// |-----------|-------------------|----------------------------|
/// | 1000–1999 | Validation        | 400 Bad Request            |
/// | 2000–2099 | Not Found         | 404 Not Found              |
/// | 2100–2199 | Conflict          | 409 Conflict               |
/// | 3000–3999 | Server            | 500 Internal Server Error  |
#[derive(Debug, thiserror::Error)]
pub enum AttendanceError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Camera-reported student identifier is unknown to the roster.
    #[error("student not found: {0}")]
    StudentNotFound(String),

    /// Camera/device identifier could not be mapped to a hall.
    #[error("hall not found: {0}")]
    HallNotFound(String),

    /// Class session with the given ID was not found.
    #[error("session not found: {0}")]
    SessionNotFound(uuid::Uuid),

    /// No attendance record exists for the given (student, session, date).
    #[error("attendance record not found")]
    RecordNotFound,

    /// Correction request index is out of range for the record.
    #[error("correction request {0} not found")]
    CorrectionNotFound(usize),

    /// The correction request has already been adjudicated.
    #[error("correction request already reviewed")]
    CorrectionAlreadyReviewed,

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AttendanceError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::StudentNotFound(_) => 2001,
            Self::HallNotFound(_) => 2002,
            Self::SessionNotFound(_) => 2003,
            Self::RecordNotFound => 2004,
            Self::CorrectionNotFound(_) => 2005,
            Self::CorrectionAlreadyReviewed => 2101,
            Self::PersistenceError(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::StudentNotFound(_)
            | Self::HallNotFound(_)
            | Self::SessionNotFound(_)
            | Self::RecordNotFound
            | Self::CorrectionNotFound(_) => StatusCode::NOT_FOUND,
            Self::CorrectionAlreadyReviewed => StatusCode::CONFLICT,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AttendanceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
