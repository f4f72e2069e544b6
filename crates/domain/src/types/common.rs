//! Shapes shared by every table record

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Table API envelope for list responses
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub result: Vec<T>,
}

/// Table API envelope for single-record responses
#[derive(Debug, Clone, Deserialize)]
pub struct SingleResponse<T> {
    pub result: T,
}

/// Reference to another record
///
/// The Table API renders references as a bare sys_id, as
/// `{"link": ..., "value": ...}`, or, with `sysparm_display_value=true`, as
/// `{"display_value": ..., "link": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordRef {
    Id(String),
    Link {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display_value: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
    },
}

impl RecordRef {
    /// Referenced sys_id, if the platform sent one
    pub fn id(&self) -> Option<&str> {
        let id = match self {
            Self::Id(id) => Some(id.as_str()),
            Self::Link { value, .. } => value.as_deref(),
        };
        id.filter(|id| !id.is_empty())
    }

    /// Display value, falling back to the sys_id
    pub fn display(&self) -> Option<&str> {
        match self {
            Self::Id(id) => Some(id.as_str()).filter(|id| !id.is_empty()),
            Self::Link { display_value: Some(display), .. } => Some(display.as_str()),
            Self::Link { .. } => self.id(),
        }
    }
}

impl From<&str> for RecordRef {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

/// Serde adapters for fields the platform renders as strings
///
/// Booleans arrive as `true` or `"true"`, numbers as `12.5` or `"12.5"`, and
/// both may be `""` when unset.
pub mod lenient {
    use super::{de, Deserialize, Deserializer, Value};

    pub fn bool_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "" => Ok(None),
                "true" | "1" | "yes" => Ok(Some(true)),
                "false" | "0" | "no" => Ok(Some(false)),
                other => Err(de::Error::custom(format!("invalid boolean: {other}"))),
            },
            Some(other) => Err(de::Error::custom(format!("invalid boolean: {other}"))),
        }
    }

    pub fn f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s
                .trim()
                .replace(',', "")
                .parse::<f64>()
                .map(Some)
                .map_err(|_| de::Error::custom(format!("invalid number: {s}"))),
            Some(other) => Err(de::Error::custom(format!("invalid number: {other}"))),
        }
    }

    pub fn u64_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(f64_opt(deserializer)?.filter(|n| *n >= 0.0).map(|n| n as u64))
    }
}
