use serde_json::{Map, Value};

/// Flattens streamed function arguments into display text.
///
/// A JSON object whose values are all strings becomes those values joined by
/// a single space, in document order. Any other input is returned unchanged.
pub fn finalize_function_payload(payload: &str) -> String {
    flatten_string_values(payload).unwrap_or_else(|| payload.to_string())
}

fn flatten_string_values(payload: &str) -> Option<String> {
    let object: Map<String, Value> = serde_json::from_str(payload).ok()?;
    let values = object
        .values()
        .map(Value::as_str)
        .collect::<Option<Vec<_>>>()?;
    Some(values.join(" "))
}
