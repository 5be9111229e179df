//! Decoding of raw provider timestamps.
//!
//! Coinglass is inconsistent about units: some endpoints return epoch
//! seconds, others milliseconds. Callers either state the unit or let
//! [`TimeUnit::Auto`] pick it from the magnitude of the value.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::Error;

/// Unit of a raw numeric timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeUnit {
    Seconds,
    Milliseconds,
    /// Resolve from magnitude: seconds below 1e11, milliseconds below 1e14,
    /// microseconds below 1e17, nanoseconds above.
    #[default]
    Auto,
}

impl TimeUnit {
    fn to_millis(self, raw: f64) -> f64 {
        match self {
            TimeUnit::Seconds => raw * 1_000.0,
            TimeUnit::Milliseconds => raw,
            TimeUnit::Auto => {
                let magnitude = raw.abs();
                if magnitude < 1e11 {
                    raw * 1_000.0
                } else if magnitude < 1e14 {
                    raw
                } else if magnitude < 1e17 {
                    raw / 1_000.0
                } else {
                    raw / 1_000_000.0
                }
            }
        }
    }
}

/// Decodes a numeric (or numeric string) timestamp into a UTC instant.
///
/// Sub-millisecond precision is rounded away.
pub fn decode_timestamp(value: &Value, unit: TimeUnit) -> Result<DateTime<Utc>, Error> {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|raw| raw.is_finite())
    .ok_or_else(|| Error::malformed(format!("invalid timestamp {value}")))?;

    let millis = unit.to_millis(raw).round();
    if millis.abs() >= i64::MAX as f64 {
        return Err(Error::malformed(format!("timestamp {value} out of range")));
    }
    DateTime::from_timestamp_millis(millis as i64)
        .ok_or_else(|| Error::malformed(format!("timestamp {value} out of range")))
}
