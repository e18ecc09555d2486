//! Timestamp (de)serialization for API records
//!
//! - Serialize: `DateTime<Utc>` -> RFC3339 string
//! - Deserialize: RFC3339 string, Unix timestamp (seconds or milliseconds), empty string or null

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Milliseconds threshold: larger values are treated as millisecond timestamps.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        Number(i64),
    }

    match Option::<RawTimestamp>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawTimestamp::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawTimestamp::Text(s)) => DateTime::parse_from_rfc3339(s.trim())
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| Error::custom(format!("Invalid RFC3339 timestamp '{s}': {e}"))),
        Some(RawTimestamp::Number(ts)) => from_unix(ts)
            .map(Some)
            .ok_or_else(|| Error::custom(format!("Invalid Unix timestamp: {ts}"))),
    }
}

fn from_unix(ts: i64) -> Option<DateTime<Utc>> {
    if ts > MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    }
}
