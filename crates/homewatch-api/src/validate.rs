//! Response-shape validation.
//!
//! Only the container is checked here: top level is an object, `homeworks`
//! exists and is an array. Per-item fields are validated lazily when a
//! submission is actually parsed, so one malformed item fails on itself
//! instead of rejecting an otherwise valid batch.

use homewatch_core::error::{HomewatchError, Result};
use homewatch_core::types::StatusSnapshot;
use serde_json::Value;

/// Validate the decoded response and lift it into a [`StatusSnapshot`].
pub fn check_response(body: Value) -> Result<StatusSnapshot> {
    let Some(map) = body.as_object() else {
        return Err(HomewatchError::MalformedResponse {
            expected: "object",
            actual: json_type_name(&body).to_string(),
        });
    };
    let Some(homeworks) = map.get("homeworks") else {
        return Err(HomewatchError::MissingField {
            key: "homeworks".into(),
        });
    };
    let Some(items) = homeworks.as_array() else {
        return Err(HomewatchError::MalformedResponse {
            expected: "array",
            actual: json_type_name(homeworks).to_string(),
        });
    };
    let current_date = map.get("current_date").and_then(Value::as_i64);
    Ok(StatusSnapshot {
        homeworks: items.clone(),
        current_date,
    })
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
