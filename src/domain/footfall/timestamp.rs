//! Lenient timestamp decoding for training rows.
//!
//! Accepted forms, all normalised to UTC:
//! - RFC 3339 with an offset (`2026-05-01T12:00:00+02:00`)
//! - naive ISO 8601 date-time, read as UTC (`2026-05-01T12:00:00`, `2026-05-01 12:00:00`)
//! - bare date, read as UTC midnight (`2026-05-01`)
//! - Unix epoch seconds, or milliseconds when the magnitude exceeds
//!   [`EPOCH_MILLIS_THRESHOLD`]; integers, floats or numeric strings

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserializer;
use serde::de::{self, Visitor};
use std::fmt;

/// Epoch values above this are taken as milliseconds.
pub const EPOCH_MILLIS_THRESHOLD: f64 = 2e10;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    value.parse::<f64>().ok().and_then(from_epoch)
}

pub fn from_epoch(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() {
        return None;
    }
    let millis = if value.abs() > EPOCH_MILLIS_THRESHOLD {
        value
    } else {
        value * 1000.0
    };
    DateTime::from_timestamp_millis(millis.round() as i64)
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = DateTime<Utc>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an ISO 8601 date-time string or Unix epoch seconds")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        parse_timestamp(value)
            .ok_or_else(|| E::custom(format!("unrecognised timestamp {:?}", value)))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        self.visit_f64(value as f64)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        self.visit_f64(value as f64)
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        from_epoch(value).ok_or_else(|| E::custom(format!("epoch {} out of range", value)))
    }
}

/// `deserialize_with` target for [`super::HistoricalRecord::timestamp`].
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(TimestampVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_offset_is_normalised() {
        assert_eq!(parse_timestamp("2026-05-01T14:00:00+02:00"), Some(noon()));
        assert_eq!(parse_timestamp("2026-05-01T12:00:00Z"), Some(noon()));
    }

    #[test]
    fn test_naive_forms_read_as_utc() {
        assert_eq!(parse_timestamp("2026-05-01T12:00:00"), Some(noon()));
        assert_eq!(parse_timestamp("2026-05-01 12:00:00.000"), Some(noon()));
        assert_eq!(
            parse_timestamp("2026-05-01"),
            Some(Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_epoch_seconds_and_millis() {
        let secs = noon().timestamp();
        assert_eq!(from_epoch(secs as f64), Some(noon()));
        assert_eq!(from_epoch((secs * 1000) as f64), Some(noon()));
        assert_eq!(parse_timestamp(&secs.to_string()), Some(noon()));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(from_epoch(f64::NAN), None);
    }
}
