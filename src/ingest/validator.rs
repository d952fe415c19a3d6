//! Validation gate: confidence and spoof thresholds.
//!
//! Rules are evaluated in order and the first failing rule wins. A
//! rejected event is still persisted in the ledger with the matching
//! reason — rejections are data, never silently dropped.

use crate::domain::{HallPolicy, NormalizedEvent, RejectionReason};

/// Outcome of the validation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Event may proceed to session resolution.
    Accept,
    /// Event fails a policy rule and must be finalized as rejected.
    Reject(RejectionReason),
}

/// Applies the per-hall thresholds to a normalized event.
///
/// Order matters: confidence is checked before spoofing so that a noisy
/// low-confidence frame is reported as sensor noise, not as an
/// impersonation attempt.
#[must_use]
pub fn validate(event: &NormalizedEvent, policy: &HallPolicy) -> Verdict {
    if event.confidence < policy.min_confidence {
        return Verdict::Reject(RejectionReason::LowConfidence);
    }
    if event.spoof_score > policy.max_spoof_score {
        return Verdict::Reject(RejectionReason::SpoofDetected);
    }
    Verdict::Accept
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Direction, Vendor};
    use chrono::Utc;

    fn make_event(confidence: f64, spoof_score: f64) -> NormalizedEvent {
        NormalizedEvent {
            vendor: Vendor::Standard,
            student_external_id: "EXT-1".to_string(),
            camera_id: "cam-1".to_string(),
            hall_external_id: "hall-1".to_string(),
            timestamp: Utc::now(),
            direction: Direction::In,
            confidence,
            spoof_score,
            image_url: None,
            temperature: None,
        }
    }

    #[test]
    fn confident_genuine_event_accepted() {
        let verdict = validate(&make_event(0.95, 0.02), &HallPolicy::default());
        assert_eq!(verdict, Verdict::Accept);
    }

    #[test]
    fn low_confidence_rejected() {
        let verdict = validate(&make_event(0.80, 0.02), &HallPolicy::default());
        assert_eq!(verdict, Verdict::Reject(RejectionReason::LowConfidence));
    }

    #[test]
    fn confidence_exactly_at_threshold_accepted() {
        let verdict = validate(&make_event(0.85, 0.02), &HallPolicy::default());
        assert_eq!(verdict, Verdict::Accept);
    }

    #[test]
    fn spoof_above_threshold_rejected() {
        // 0.15 against the default 0.10 ceiling.
        let verdict = validate(&make_event(0.95, 0.15), &HallPolicy::default());
        assert_eq!(verdict, Verdict::Reject(RejectionReason::SpoofDetected));
    }

    #[test]
    fn spoof_exactly_at_threshold_accepted() {
        let verdict = validate(&make_event(0.95, 0.10), &HallPolicy::default());
        assert_eq!(verdict, Verdict::Accept);
    }

    #[test]
    fn confidence_rule_wins_over_spoof_rule() {
        let verdict = validate(&make_event(0.50, 0.90), &HallPolicy::default());
        assert_eq!(verdict, Verdict::Reject(RejectionReason::LowConfidence));
    }

    #[test]
    fn hall_override_applies() {
        let strict = HallPolicy {
            min_confidence: 0.97,
            ..HallPolicy::default()
        };
        let verdict = validate(&make_event(0.95, 0.02), &strict);
        assert_eq!(verdict, Verdict::Reject(RejectionReason::LowConfidence));
    }
}
