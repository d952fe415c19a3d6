//! Correction workflow DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::CorrectionRequest;

/// Request body for submitting a correction.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitCorrectionRequest {
    /// Student-supplied reason for the dispute.
    pub reason: String,
}

/// Response body for a submitted correction (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitCorrectionResponse {
    /// Index of the new request in the record's dispute history.
    pub index: usize,
    /// Always `"pending"` on submission.
    pub status: String,
    /// Submission timestamp.
    pub requested_at: DateTime<Utc>,
}

/// Request body for adjudicating a pending correction.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewCorrectionRequest {
    /// `true` to approve, `false` to reject.
    pub approve: bool,
    /// Optional staff notes.
    #[serde(default)]
    pub admin_notes: Option<String>,
}

/// Response body after review.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewCorrectionResponse {
    /// Index of the reviewed request.
    pub index: usize,
    /// Student-supplied reason.
    pub reason: String,
    /// Final state (`approved` / `rejected`).
    pub status: String,
    /// Staff notes recorded at review time.
    pub admin_notes: Option<String>,
    /// Submission timestamp.
    pub requested_at: DateTime<Utc>,
    /// Review timestamp.
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl ReviewCorrectionResponse {
    /// Builds the response from the reviewed request.
    #[must_use]
    pub fn from_request(index: usize, request: &CorrectionRequest) -> Self {
        Self {
            index,
            reason: request.reason.clone(),
            status: request.status.as_str().to_string(),
            admin_notes: request.admin_notes.clone(),
            requested_at: request.requested_at,
            reviewed_at: request.reviewed_at,
        }
    }
}
