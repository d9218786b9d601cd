use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::{KlaviyoError, Result};

pub(crate) fn decode_json<T: DeserializeOwned>(body: &str, what: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|err| KlaviyoError::Decode(format!("invalid {what} JSON: {err}; body: {body}")))
}

/// Decodes the acknowledgement returned by identify/track.
///
/// The endpoints answer `1`/`0`; booleans and their string forms are
/// accepted as well.
pub(crate) fn decode_flag(body: &str) -> Result<bool> {
    let value: JsonValue = decode_json(body, "track response")?;
    let flag = match &value {
        JsonValue::Bool(flag) => Some(*flag),
        JsonValue::Number(number) => number.as_f64().map(|n| n != 0.0),
        JsonValue::String(text) => match text.trim() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    };
    flag.ok_or_else(|| KlaviyoError::Decode(format!("unexpected track response: {body}")))
}

/// Renders a property as a query-string value; `null` has no rendering.
pub(crate) fn query_value(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
