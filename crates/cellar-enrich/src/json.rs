//! Lenient decoding of model replies that are supposed to be JSON objects.

use serde_json::{Map, Value};

/// Parse `content` as a JSON object. Falls back to the span between the
/// first `{` and the last `}`, and finally to an empty object.
pub fn parse_object(content: &str) -> Map<String, Value> {
  if let Ok(Value::Object(map)) = serde_json::from_str(content.trim()) {
    return map;
  }
  let embedded = match (content.find('{'), content.rfind('}')) {
    (Some(start), Some(end)) if start < end => &content[start..=end],
    _ => return Map::new(),
  };
  match serde_json::from_str(embedded) {
    Ok(Value::Object(map)) => map,
    _ => Map::new(),
  }
}

/// A string field, `None` when absent, null, non-string or blank.
pub fn str_field(map: &Map<String, Value>, key: &str) -> Option<String> {
  map
    .get(key)
    .and_then(Value::as_str)
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_owned)
}

/// A numeric field that may arrive as a number or a numeric string.
pub fn f64_field(map: &Map<String, Value>, key: &str) -> Option<f64> {
  match map.get(key)? {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse().ok(),
    _ => None,
  }
}
