//! Wire types returned by the TalentBridge backend.
//!
//! The backend serves SQLite rows more or less verbatim, so text columns can
//! arrive as strings, numbers or `null`. The helpers below normalise those
//! shapes at the edge so the rest of the portal only sees `Option<String>`.

pub mod analytics;
pub mod cv;
pub mod job;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts a string, number, bool or null and yields it as optional text.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Accepts a JSON array of strings, a JSON-encoded array inside a string, or a
/// comma-delimited string, and yields the trimmed, non-empty items.
pub(crate) fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(value_as_item).collect(),
        Some(Value::String(s)) => split_list(&s),
        Some(other) => value_as_item(&other).into_iter().collect(),
    })
}

/// Splits a delimited list. Strings that hold an encoded JSON array are decoded.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('[') {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
            return items.iter().filter_map(value_as_item).collect();
        }
    }
    trimmed
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn value_as_item(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => return None,
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}
