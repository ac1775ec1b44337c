use chrono::{DateTime, NaiveDateTime};
use serde::{de, Deserialize, Deserializer};

/// Wall clock time as entered by the user. If the client sends an offset
/// along with it, the offset is dropped: the wall clock time is always
/// interpreted in the timezone given next to it.
pub fn parse_local_datetime(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

pub fn deserialize_local_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_local_datetime(&value)
        .ok_or_else(|| de::Error::custom(format!("Malformed datetime: {}", value)))
}

pub fn deserialize_optional_local_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) => parse_local_datetime(&value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("Malformed datetime: {}", value))),
        None => Ok(None),
    }
}
