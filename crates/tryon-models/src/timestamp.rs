//! Timestamp parsing for service payloads.
//!
//! The service serializes its database timestamps as ISO-8601. Depending on
//! how a row was written the value may or may not carry a UTC offset, e.g.
//! `2024-05-01T10:15:30.123456` or `2024-05-01T10:15:30Z`. Offset-less values
//! are taken to be UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Timestamp parsing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("Timestamp cannot be empty")]
    Empty,
    #[error("Invalid timestamp: {0}")]
    InvalidFormat(String),
}

/// Parse a service timestamp into UTC.
///
/// # Examples
/// ```
/// use tryon_models::timestamp::parse_service_timestamp;
/// let ts = parse_service_timestamp("2024-05-01T10:15:30").unwrap();
/// assert_eq!(ts.to_rfc3339(), "2024-05-01T10:15:30+00:00");
/// ```
pub fn parse_service_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(TimestampError::Empty);
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TimestampError::InvalidFormat(raw.to_string()))
}

/// Serde adapter for `DateTime<Utc>` fields that accepts offset-less input.
pub mod lenient {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_service_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}
