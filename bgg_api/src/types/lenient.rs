//! Deserializers for fields BoardGameGeek sends as either strings or numbers.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts a JSON string or number and yields its text form. Any other
/// shape (null, bool, object) yields `None`.
pub fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Like [`text_or_number`] but the field must be present.
pub fn required_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    text_or_number(deserializer)?
        .ok_or_else(|| serde::de::Error::custom("expected a string or number"))
}
