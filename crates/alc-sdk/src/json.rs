//! The JSON construction and flatten boundary.
//!
//! Configuration loading and serialization live outside ALC; collaborators
//! hand already-materialized `serde_json::Value` trees in and take plain
//! JSON back out. JSON has no set kind, so sets enter as arrays (becoming
//! logged sequences) and flatten back out as arrays.

use alc_tree::LoggedMap;
use alc_types::Value;

use crate::error::{SdkError, SdkResult};

/// Build a logged configuration root from already-materialized JSON.
///
/// Every nested object, array, and scalar is wrapped recursively under
/// dotted child channels derived from `name`.
///
/// # Examples
///
/// ```
/// use alc_sdk::{from_json, to_json};
/// use serde_json::json;
///
/// let config = from_json("app", json!({"servers": ["a", "b"]})).unwrap();
/// config.get("servers").unwrap().as_list().unwrap().append("c");
/// assert_eq!(to_json(&config), json!({"servers": ["a", "b", "c"]}));
/// ```
pub fn from_json(name: impl Into<String>, json: serde_json::Value) -> SdkResult<LoggedMap> {
    match Value::from(json) {
        Value::Map(entries) => Ok(LoggedMap::new(name.into(), entries)),
        other => Err(SdkError::RootNotMapping { kind: other.kind() }),
    }
}

/// Flatten a logged configuration back to plain JSON.
pub fn to_json(config: &LoggedMap) -> serde_json::Value {
    serde_json::Value::from(config.to_plain())
}
