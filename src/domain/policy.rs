//! Per-hall attendance policy.

use serde::{Deserialize, Serialize};

use crate::config::AttendanceConfig;

/// Minutes a student may leave before session end without being marked
/// as an early leave.
pub const EARLY_LEAVE_GRACE_MINUTES: i64 = 10;

/// Validation and attendance thresholds, configurable per hall.
///
/// Halls without an explicit override use the gateway-wide defaults
/// from [`AttendanceConfig`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HallPolicy {
    /// Minimum face-match confidence accepted.
    pub min_confidence: f64,
    /// Maximum spoof score accepted.
    pub max_spoof_score: f64,
    /// Minutes after session start before an IN counts as late.
    pub late_threshold_minutes: i64,
    /// Minimum presence percentage for attendance to count.
    pub presence_threshold_percent: i64,
}

impl Default for HallPolicy {
    fn default() -> Self {
        Self {
            min_confidence: 0.85,
            max_spoof_score: 0.10,
            late_threshold_minutes: 10,
            presence_threshold_percent: 70,
        }
    }
}

impl From<&AttendanceConfig> for HallPolicy {
    fn from(config: &AttendanceConfig) -> Self {
        Self {
            min_confidence: config.min_confidence,
            max_spoof_score: config.max_spoof_score,
            late_threshold_minutes: config.late_threshold_minutes,
            presence_threshold_percent: config.presence_threshold_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let policy = HallPolicy::default();
        assert!((policy.min_confidence - 0.85).abs() < f64::EPSILON);
        assert!((policy.max_spoof_score - 0.10).abs() < f64::EPSILON);
        assert_eq!(policy.late_threshold_minutes, 10);
        assert_eq!(policy.presence_threshold_percent, 70);
    }
}
