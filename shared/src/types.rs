//! Common utility types
//!
//! The backend is loose about scalar types: ids arrive as integers or
//! strings, durations as numbers or numeric text. The helpers here accept
//! both so the models can stay strongly typed.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Duration assumed for a catalog item when the backend omits it
pub const DEFAULT_DURATION_MINUTES: u32 = 10;

/// Identifier of a backend entity (PC, report row, user)
///
/// Deserializes from either a JSON string or a JSON integer and always
/// compares by its textual form, so `1` and `"1"` name the same resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<i64> for ResourceId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for ResourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// Scalar forms the backend uses interchangeably
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseScalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match LooseScalar::deserialize(deserializer)? {
            LooseScalar::Int(v) => Ok(Self(v.to_string())),
            LooseScalar::Float(v) => Ok(Self(v.to_string())),
            LooseScalar::Text(v) => Ok(Self(v)),
        }
    }
}

/// Default for `time_slot` when the field is missing
pub fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

/// Deserialize a duration in minutes from a number, numeric text or null
///
/// Anything unusable (null, negative, non-numeric text such as
/// "10 minutes") falls back to [`DEFAULT_DURATION_MINUTES`].
pub fn deserialize_duration<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LooseScalar>::deserialize(deserializer)?;
    let minutes = match raw {
        Some(LooseScalar::Int(v)) => u32::try_from(v).ok(),
        Some(LooseScalar::Float(v)) if v.is_finite() && v >= 0.0 => Some(v.trunc() as u32),
        Some(LooseScalar::Text(v)) => v.trim().parse::<u32>().ok(),
        _ => None,
    };
    Ok(minutes.unwrap_or(DEFAULT_DURATION_MINUTES))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Slot {
        #[serde(default = "default_duration", deserialize_with = "deserialize_duration")]
        time_slot: u32,
    }

    #[test]
    fn test_resource_id_accepts_int_and_string() {
        let a: ResourceId = serde_json::from_str("7").unwrap();
        let b: ResourceId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "7");
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"7\"");
    }

    #[test]
    fn test_duration_fallbacks() {
        let cases = [
            (r#"{}"#, 10),
            (r#"{"time_slot": null}"#, 10),
            (r#"{"time_slot": 25}"#, 25),
            (r#"{"time_slot": "15"}"#, 15),
            (r#"{"time_slot": "10 minutes"}"#, 10),
            (r#"{"time_slot": -3}"#, 10),
        ];
        for (json, expected) in cases {
            let slot: Slot = serde_json::from_str(json).unwrap();
            assert_eq!(slot.time_slot, expected, "input {}", json);
        }
    }
}
