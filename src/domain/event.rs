//! Canonical camera event shape and vendor tagging.
//!
//! Every raw camera payload — regardless of vendor — is translated into a
//! [`NormalizedEvent`] before it touches the pipeline. Normalization is
//! total: unknown or missing fields degrade to documented defaults rather
//! than failing, because a malformed but well-intentioned camera feed
//! must never silently stop being ingested.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default confidence assumed when a vendor payload omits it.
pub const DEFAULT_CONFIDENCE: f64 = 0.9;

/// Default spoof score assumed when a vendor payload omits it.
pub const DEFAULT_SPOOF_SCORE: f64 = 0.05;

/// Direction of a camera swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Student entered the hall.
    In,
    /// Student left the hall.
    Out,
}

impl Direction {
    /// Returns the wire representation (`"IN"` / `"OUT"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
        }
    }
}

/// Camera vendor families distinguished by payload shape.
///
/// Classification is by presence of vendor-specific keys, checked in a
/// fixed precedence order; first match wins. Kept as a tagged variant
/// rather than duck-typing so dispatch is exhaustiveness-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Vendor {
    /// Canonical shape: `student_id` / `hall_id` / `direction` literals.
    Standard,
    /// Device-serial-keyed shape (`deviceSn`, `entryType` integer codes).
    DeviceSerial,
    /// Channel-id-keyed shape (`channel_id`, `io` string codes).
    ChannelId,
    /// Generic custom mapping nested under a `data` wrapper.
    Custom,
}

/// A camera swipe after vendor-specific translation into the canonical
/// shape. Produced once per raw payload; always constructed, even for
/// events that are later rejected.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedEvent {
    /// Vendor family the payload was classified as.
    pub vendor: Vendor,
    /// Student identifier as reported by the camera (external).
    pub student_external_id: String,
    /// Camera/device identifier.
    pub camera_id: String,
    /// Hall identifier as reported by the camera (external).
    pub hall_external_id: String,
    /// Event timestamp (UTC).
    pub timestamp: DateTime<Utc>,
    /// Swipe direction.
    pub direction: Direction,
    /// Face-match confidence in `[0, 1]`.
    pub confidence: f64,
    /// Anti-spoof score in `[0, 1]`; higher means more likely spoofed.
    pub spoof_score: f64,
    /// URL of the captured frame, when the vendor provides one.
    pub image_url: Option<String>,
    /// Body temperature reading, when the vendor provides one.
    pub temperature: Option<f64>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn direction_wire_format() {
        assert_eq!(Direction::In.as_str(), "IN");
        assert_eq!(Direction::Out.as_str(), "OUT");
        let json = serde_json::to_string(&Direction::Out).unwrap_or_default();
        assert_eq!(json, "\"OUT\"");
    }

    #[test]
    fn direction_deserializes_from_uppercase() {
        let d: Direction = serde_json::from_str("\"IN\"").ok().unwrap_or_else(|| {
            panic!("deserialization failed");
        });
        assert_eq!(d, Direction::In);
    }
}
