//! Registration DTOs for the directory endpoints.
//!
//! Students, halls, and sessions are owned by external services; these
//! endpoints populate the in-memory directories the pipeline resolves
//! against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Request body for `POST /students`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterStudentRequest {
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

/// Request body for `POST /halls`.
///
/// Threshold fields default to the server-wide policy when omitted.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterHallRequest {
    /// Identifier the cameras report for this hall.
    pub external_id: String,
    /// Display name.
    pub name: String,
    /// Seating capacity.
    pub capacity: u32,
    /// Minimum face-match confidence override.
    #[serde(default)]
    pub min_confidence: Option<f64>,
    /// Maximum spoof score override.
    #[serde(default)]
    pub max_spoof_score: Option<f64>,
    /// Late threshold override, in minutes.
    #[serde(default)]
    pub late_threshold_minutes: Option<i64>,
    /// Required presence percentage override.
    #[serde(default)]
    pub presence_threshold_percent: Option<i64>,
}

/// Request body for `POST /sessions`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterSessionRequest {
    /// Hall the session takes place in.
    pub hall_id: Uuid,
    /// Course/subject label.
    pub subject: String,
    /// Window start.
    pub start_time: DateTime<Utc>,
    /// Window end. Must be after `start_time`.
    pub end_time: DateTime<Utc>,
    /// Lifecycle state (`scheduled` / `ongoing` / `completed` /
    /// `cancelled`). Defaults to `scheduled`.
    #[serde(default)]
    pub status: Option<String>,
    /// Students expected to attend.
    #[serde(default)]
    pub expected_roster: Vec<Uuid>,
}

/// Response body confirming a registration (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredResponse {
    /// Internal identifier assigned by the gateway.
    pub id: Uuid,
    /// Server creation timestamp.
    pub created_at: DateTime<Utc>,
}
