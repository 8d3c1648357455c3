//! Validate a JSON value against a strict output schema.
//!
//! Covers the keywords the strict dialect allows: `type`, `properties`,
//! `required`, `additionalProperties: false`, `items`, `enum`, `const` and
//! `anyOf`. Returns `Err(message)` describing the first violation found.

use serde_json::Value;

pub fn validate_value(value: &Value, schema: &Value) -> Result<(), String> {
    validate_at(value, schema, "$")
}

fn validate_at(value: &Value, schema: &Value, path: &str) -> Result<(), String> {
    let Some(schema) = schema.as_object() else {
        return Ok(());
    };

    if let Some(options) = schema.get("anyOf").and_then(|v| v.as_array()) {
        if !options.iter().any(|option| validate_at(value, option, path).is_ok()) {
            return Err(format!("{path}: value matches none of the allowed shapes"));
        }
    }

    if let Some(expected) = schema.get("type") {
        let matches = match expected {
            Value::String(t) => value_matches_type(value, t),
            Value::Array(types) => types
                .iter()
                .filter_map(|t| t.as_str())
                .any(|t| value_matches_type(value, t)),
            _ => true,
        };
        if !matches {
            return Err(format!(
                "{path}: expected type {expected}, got {}",
                json_type_name(value)
            ));
        }
    }

    if let Some(allowed) = schema.get("enum").and_then(|v| v.as_array()) {
        if !allowed.contains(value) {
            return Err(format!("{path}: {value} is not one of {}", Value::Array(allowed.clone())));
        }
    }

    if let Some(expected) = schema.get("const") {
        if expected != value {
            return Err(format!("{path}: expected {expected}, got {value}"));
        }
    }

    if let Some(obj) = value.as_object() {
        if let Some(required) = schema.get("required").and_then(|v| v.as_array()) {
            for name in required.iter().filter_map(|n| n.as_str()) {
                if !obj.contains_key(name) {
                    return Err(format!("{path}: missing required field '{name}'"));
                }
            }
        }

        let properties = schema.get("properties").and_then(|v| v.as_object());
        let closed = schema.get("additionalProperties") == Some(&Value::Bool(false));
        for (key, field) in obj {
            match properties.and_then(|props| props.get(key)) {
                Some(field_schema) => validate_at(field, field_schema, &format!("{path}.{key}"))?,
                None if closed => return Err(format!("{path}: unexpected field '{key}'")),
                None => {}
            }
        }
    }

    if let (Some(items), Some(elements)) = (schema.get("items"), value.as_array()) {
        for (i, element) in elements.iter().enumerate() {
            validate_at(element, items, &format!("{path}[{i}]"))?;
        }
    }

    Ok(())
}

fn value_matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
