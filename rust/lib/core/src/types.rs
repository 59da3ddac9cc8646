use serde_json::{Map, Value};

/// A decoded request body: field name to raw JSON value.
pub type FieldMap = Map<String, Value>;

/// Decode a request body into a field map.
///
/// An empty body, malformed JSON, or a JSON value that is not an object
/// all decode to an empty map, which downstream validation then judges.
pub fn parse_field_map(body: &[u8]) -> FieldMap {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
