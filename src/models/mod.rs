//! Raw payloads returned by the catalogue API.
//!
//! Upstream is loose about both types and field names, so everything here is
//! lenient: aliases are kept as distinct optional fields and resolved by the
//! domain types, never at the point of use.

pub mod book;
pub mod episode;
pub mod stream;

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

/// A body that may or may not be wrapped in `{ "success": .., "data": .. }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// Decodes an optional integer sent either as a number or as a string.
///
/// Anything else (negative, fractional, garbage) is treated as absent.
pub fn loose_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|value| {
        match value {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }))
}

/// Same as [`loose_u32`], for large counters (views, heat, ...).
pub fn loose_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|value| {
        match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }))
}

/// Decodes an identifier sent either as a number or as a string.
pub fn loose_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::String(s)) => {
            let s = s.trim();
            Ok((!s.is_empty()).then(|| s.to_owned()))
        },
        Some(other) => Err(de::Error::custom(format!(
            "expected a string or a number, got {other}"
        ))),
    }
}

/// Decodes a free-form counter kept as display text (e.g. "1.2M" or 1200).
pub fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "loose_u32")]
        count: Option<u32>,
        #[serde(default, deserialize_with = "loose_id")]
        id: Option<String>,
    }

    #[test]
    fn envelope_accepts_both_shapes() {
        let wrapped: Envelope<Vec<u32>> =
            serde_json::from_str(r#"{"success":true,"data":[1,2]}"#)
                .expect("wrapped body");
        let bare: Envelope<Vec<u32>> =
            serde_json::from_str("[1,2]").expect("bare body");

        assert_eq!(wrapped.into_inner(), vec![1, 2]);
        assert_eq!(bare.into_inner(), vec![1, 2]);
    }

    #[test]
    fn loose_numbers() {
        let record: Record = serde_json::from_str(r#"{"count":"12","id":42}"#)
            .expect("valid record");
        assert_eq!(record.count, Some(12));
        assert_eq!(record.id.as_deref(), Some("42"));

        let record: Record =
            serde_json::from_str(r#"{"count":-3,"id":" "}"#).expect("valid record");
        assert_eq!(record.count, None);
        assert_eq!(record.id, None);

        let record: Record = serde_json::from_str("{}").expect("valid record");
        assert_eq!(record.count, None);
        assert_eq!(record.id, None);
    }
}
