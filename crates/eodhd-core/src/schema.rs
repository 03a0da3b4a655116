//! JSON Schema builders for tool input schemas
//!
//! Tools describe their parameters with small composable builders instead of
//! hand-written schema literals.

use serde_json::{Map, Value, json};

fn with_description(mut schema: Value, description: Option<&str>) -> Value {
    if let (Some(d), Some(obj)) = (description, schema.as_object_mut()) {
        obj.insert("description".to_string(), Value::String(d.to_string()));
    }
    schema
}

/// Create a JSON Schema object type
///
/// # Example
///
/// ```
/// use eodhd_core::schema::{object, string, number};
/// use serde_json::json;
///
/// let schema = object(
///     json!({
///         "symbol": string(Some("Ticker symbol")),
///         "threshold": number(None),
///     }),
///     &["symbol"],
/// );
/// assert_eq!(schema["required"][0], "symbol");
/// ```
pub fn object(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Create a free-form object type (arbitrary keys)
pub fn map(values: Option<Value>, description: Option<&str>) -> Value {
    let mut schema = Map::new();
    schema.insert("type".to_string(), json!("object"));
    if let Some(values) = values {
        schema.insert("additionalProperties".to_string(), values);
    }
    with_description(Value::Object(schema), description)
}

/// Create a JSON Schema string type
pub fn string(description: Option<&str>) -> Value {
    with_description(json!({"type": "string"}), description)
}

/// Create a JSON Schema number type
pub fn number(description: Option<&str>) -> Value {
    with_description(json!({"type": "number"}), description)
}

/// Create a JSON Schema integer type
pub fn integer(description: Option<&str>) -> Value {
    with_description(json!({"type": "integer"}), description)
}

/// Create a JSON Schema array type
pub fn array(items: Value, description: Option<&str>) -> Value {
    with_description(json!({"type": "array", "items": items}), description)
}

/// Create an enum schema (string with allowed values)
pub fn enum_string(values: &[&str], description: Option<&str>) -> Value {
    with_description(json!({"type": "string", "enum": values}), description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_is_optional() {
        let schema = string(Some("A symbol"));
        assert_eq!(schema["type"], "string");
        assert_eq!(schema["description"], "A symbol");

        let bare = number(None);
        assert_eq!(bare["type"], "number");
        assert!(bare.get("description").is_none());
    }

    #[test]
    fn test_nested_schema() {
        let schema = object(
            json!({
                "filters": array(array(json!({}), None), Some("Filter triples")),
                "bounds": map(Some(number(None)), Some("Bounds by field")),
                "condition": enum_string(&[">", "<"], None),
                "limit": integer(None),
            }),
            &[],
        );

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["filters"]["items"]["type"], "array");
        assert_eq!(
            schema["properties"]["bounds"]["additionalProperties"]["type"],
            "number"
        );
        assert_eq!(schema["properties"]["condition"]["enum"][1], "<");
        assert_eq!(schema["required"], json!([]));
    }
}
