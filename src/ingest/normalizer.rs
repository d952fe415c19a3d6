//! Vendor normalizer: maps heterogeneous camera payloads into the
//! canonical event shape.
//!
//! `normalize` is a pure, total function — it never fails. Unknown or
//! missing fields degrade to the documented defaults (confidence 0.9,
//! spoof score 0.05, timestamp "now") so a malformed but well-intentioned
//! camera feed keeps flowing; the validation gate and resolver decide
//! what to do with degraded events downstream.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::domain::event::{DEFAULT_CONFIDENCE, DEFAULT_SPOOF_SCORE};
use crate::domain::{Direction, NormalizedEvent, Vendor};

/// Classifies a raw payload by vendor-distinguishing keys.
///
/// Precedence, checked top to bottom with first match winning:
/// 1. `deviceSn`    — device-serial-keyed vendor
/// 2. `channel_id`  — channel-id-keyed vendor
/// 3. `data`        — generic custom mapping wrapper
/// 4. otherwise     — the canonical/standard shape
#[must_use]
pub fn classify(payload: &Value) -> Vendor {
    if payload.get("deviceSn").is_some() {
        Vendor::DeviceSerial
    } else if payload.get("channel_id").is_some() {
        Vendor::ChannelId
    } else if payload.get("data").is_some() {
        Vendor::Custom
    } else {
        Vendor::Standard
    }
}

/// Translates a raw camera payload into the canonical shape.
#[must_use]
pub fn normalize(payload: &Value) -> NormalizedEvent {
    match classify(payload) {
        Vendor::Standard => normalize_standard(payload),
        Vendor::DeviceSerial => normalize_device_serial(payload),
        Vendor::ChannelId => normalize_channel_id(payload),
        Vendor::Custom => normalize_custom(payload),
    }
}

/// Canonical shape: `{student_id, hall_id, timestamp, direction,
/// confidence, spoof_score?, image_url?, temperature?}`.
fn normalize_standard(payload: &Value) -> NormalizedEvent {
    let hall = str_field(payload, "hall_id");
    NormalizedEvent {
        vendor: Vendor::Standard,
        student_external_id: str_field(payload, "student_id"),
        camera_id: opt_str_field(payload, "camera_id").unwrap_or_else(|| hall.clone()),
        hall_external_id: hall,
        timestamp: iso_timestamp(payload.get("timestamp")),
        direction: parse_direction(payload.get("direction").and_then(Value::as_str)),
        confidence: f64_field(payload, "confidence", DEFAULT_CONFIDENCE),
        spoof_score: f64_field(payload, "spoof_score", DEFAULT_SPOOF_SCORE),
        image_url: opt_str_field(payload, "image_url"),
        temperature: payload.get("temperature").and_then(Value::as_f64),
    }
}

/// Device-serial vendor: `personId` / `deviceSn` / `captureTime` (epoch
/// millis) / `entryType` (0 = IN, 1 = OUT) / `similarity` (percent).
fn normalize_device_serial(payload: &Value) -> NormalizedEvent {
    let device = str_field(payload, "deviceSn");
    let similarity = f64_field(payload, "similarity", DEFAULT_CONFIDENCE * 100.0);
    NormalizedEvent {
        vendor: Vendor::DeviceSerial,
        student_external_id: str_field(payload, "personId"),
        camera_id: device.clone(),
        hall_external_id: device,
        timestamp: epoch_millis_timestamp(payload.get("captureTime")),
        direction: match payload.get("entryType").and_then(Value::as_i64) {
            Some(1) => Direction::Out,
            _ => Direction::In,
        },
        confidence: (similarity / 100.0).clamp(0.0, 1.0),
        spoof_score: f64_field(payload, "spoofScore", DEFAULT_SPOOF_SCORE),
        image_url: opt_str_field(payload, "faceUrl"),
        temperature: payload.get("temperature").and_then(Value::as_f64),
    }
}

/// Channel-id vendor: `person_code` / `channel_id` / `event_time` (ISO) /
/// `io` ("in"/"out") / `score` / `spoof` / `temp`.
fn normalize_channel_id(payload: &Value) -> NormalizedEvent {
    let channel = str_field(payload, "channel_id");
    NormalizedEvent {
        vendor: Vendor::ChannelId,
        student_external_id: str_field(payload, "person_code"),
        camera_id: channel.clone(),
        hall_external_id: channel,
        timestamp: iso_timestamp(payload.get("event_time")),
        direction: parse_direction(payload.get("io").and_then(Value::as_str)),
        confidence: f64_field(payload, "score", DEFAULT_CONFIDENCE),
        spoof_score: f64_field(payload, "spoof", DEFAULT_SPOOF_SCORE),
        image_url: opt_str_field(payload, "snapshot_url"),
        temperature: payload.get("temp").and_then(Value::as_f64),
    }
}

/// Generic custom mapping: reading nested under `data` with short keys
/// (`student`, `gate`, `ts`, `dir`, `conf`, `spoof`).
fn normalize_custom(payload: &Value) -> NormalizedEvent {
    let empty = Value::Null;
    let data = payload.get("data").unwrap_or(&empty);
    let gate = str_field(data, "gate");
    NormalizedEvent {
        vendor: Vendor::Custom,
        student_external_id: str_field(data, "student"),
        camera_id: gate.clone(),
        hall_external_id: gate,
        timestamp: iso_timestamp(data.get("ts")),
        direction: parse_direction(data.get("dir").and_then(Value::as_str)),
        confidence: f64_field(data, "conf", DEFAULT_CONFIDENCE),
        spoof_score: f64_field(data, "spoof", DEFAULT_SPOOF_SCORE),
        image_url: opt_str_field(data, "img"),
        temperature: data.get("temp").and_then(Value::as_f64),
    }
}

/// Translates a vendor direction code. `OUT`/`out`/`EXIT` map to OUT;
/// everything else (including missing) defaults to IN.
fn parse_direction(raw: Option<&str>) -> Direction {
    match raw {
        Some(s) if s.eq_ignore_ascii_case("out") || s.eq_ignore_ascii_case("exit") => {
            Direction::Out
        }
        _ => Direction::In,
    }
}

fn str_field(value: &Value, key: &str) -> String {
    opt_str_field(value, key).unwrap_or_default()
}

fn opt_str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

fn f64_field(value: &Value, key: &str, default: f64) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(default)
}

/// Parses an RFC 3339 timestamp field, falling back to the server clock.
fn iso_timestamp(raw: Option<&Value>) -> DateTime<Utc> {
    raw.and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc))
}

/// Parses an epoch-milliseconds timestamp field, falling back to the
/// server clock.
fn epoch_millis_timestamp(raw: Option<&Value>) -> DateTime<Utc> {
    raw.and_then(Value::as_i64)
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .unwrap_or_else(Utc::now)
}
