//! Attendance state engine: the per-(student, session, date) state
//! machine.
//!
//! Turns an ordered stream of IN/OUT events into a single attendance
//! record with status, lateness, and presence duration. Callers must
//! hold the record's write lock — the record store's per-key lock is the
//! sole serialization point for these transitions.
//!
//! Numeric semantics: all minute computations round to the nearest whole
//! minute; durations are clamped to `>= 0`. Comparisons are UTC instants.

use crate::domain::policy::EARLY_LEAVE_GRACE_MINUTES;
use crate::domain::{
    AttendanceRecord, AttendanceStatus, HallPolicy, NormalizedEvent, RejectionReason,
};

/// Rounds a signed second count to the nearest whole minute, clamped to
/// zero for non-positive inputs.
#[must_use]
pub fn round_minutes(secs: i64) -> i64 {
    if secs <= 0 {
        0
    } else {
        (secs + 30).div_euclid(60)
    }
}

/// Rounded presence percentage for `duration` minutes out of
/// `session_minutes`.
#[must_use]
pub fn presence_percent(duration: i64, session_minutes: i64) -> i64 {
    if session_minutes <= 0 {
        return 0;
    }
    // Integer round-half-up of 100 * duration / session_minutes.
    (200 * duration.max(0) + session_minutes).div_euclid(2 * session_minutes)
}

/// Applies an IN event to the record.
///
/// The first IN sets `time_in` and derives Present/Late from the late
/// threshold. A repeated IN is idempotent: it still appends to the audit
/// trail, but `time_in` is not rewritten — first IN wins, so lateness
/// cannot be erased by a later re-detection.
///
/// Returns `true` when this was the first IN.
pub fn apply_in(record: &mut AttendanceRecord, event: &NormalizedEvent, policy: &HallPolicy) -> bool {
    record.push_entry_log(
        event.direction,
        event.timestamp,
        &event.camera_id,
        event.confidence,
    );

    if record.time_in.is_some() {
        return false;
    }

    let late_secs = (event.timestamp - record.class_start_time).num_seconds();
    let late_minutes = round_minutes(late_secs);

    record.time_in = Some(event.timestamp);
    record.late_minutes = late_minutes;
    record.status = if late_minutes > policy.late_threshold_minutes {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    };
    true
}

/// Applies an OUT event to the record.
///
/// Sets `time_out` (last OUT wins), recomputes `duration`, and applies
/// two downgrade rules in order: early leave, then insufficient
/// presence. Insufficient presence overrides early leave — a short
/// visit, even on time, does not count as attendance.
///
/// # Errors
///
/// Returns [`RejectionReason::NoMatchingInEvent`] when the record has no
/// `time_in`: an OUT cannot retroactively fabricate an IN.
pub fn apply_out(
    record: &mut AttendanceRecord,
    event: &NormalizedEvent,
    policy: &HallPolicy,
) -> Result<(), RejectionReason> {
    let Some(time_in) = record.time_in else {
        return Err(RejectionReason::NoMatchingInEvent);
    };

    record.push_entry_log(
        event.direction,
        event.timestamp,
        &event.camera_id,
        event.confidence,
    );

    // Out-of-order cross-device delivery can put the OUT frame before
    // the IN; clamp to keep time_out >= time_in.
    let time_out = event.timestamp.max(time_in);
    record.time_out = Some(time_out);
    record.duration_minutes = round_minutes((time_out - time_in).num_seconds());

    // Re-derive from lateness before applying downgrades, so a later
    // OUT can lift an earlier early-leave determination.
    record.status = if record.late_minutes > policy.late_threshold_minutes {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    };
    record.reason_for_absence = None;

    let grace = chrono::Duration::minutes(EARLY_LEAVE_GRACE_MINUTES);
    if time_out < record.class_end_time - grace {
        record.status = AttendanceStatus::EarlyLeave;
    }

    let session_minutes =
        round_minutes((record.class_end_time - record.class_start_time).num_seconds());
    let percent = presence_percent(record.duration_minutes, session_minutes);
    if percent < policy.presence_threshold_percent {
        record.status = AttendanceStatus::Absent;
        record.reason_for_absence = Some(format!(
            "presence {percent}% below required {}%",
            policy.presence_threshold_percent
        ));
    }

    Ok(())
}
