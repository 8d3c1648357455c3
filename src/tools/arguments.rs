//! Typed access to tool call arguments.

use serde_json::Value;

use crate::error::{ColloquyError, Result};

/// Decoded argument payload of one tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolArguments {
    value: Value,
}

impl ToolArguments {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Decode the JSON text the backend sent. Blank text means no arguments.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::new(Value::Object(Default::default())));
        }
        Ok(Self::new(serde_json::from_str(trimmed)?))
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| ColloquyError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    /// Get an optional string argument.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(|v| v.as_str())
    }

    /// Get a numeric argument.
    pub fn get_f64(&self, key: &str) -> Result<f64> {
        self.value
            .get(key)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| ColloquyError::InvalidArgument(format!("Missing number argument: {key}")))
    }

    /// Get an optional numeric argument.
    pub fn get_f64_opt(&self, key: &str) -> Option<f64> {
        self.value.get(key).and_then(|v| v.as_f64())
    }

    /// Get a boolean argument.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.value
            .get(key)
            .and_then(|v| v.as_bool())
            .ok_or_else(|| ColloquyError::InvalidArgument(format!("Missing boolean argument: {key}")))
    }

    /// Get an optional boolean argument.
    pub fn get_bool_opt(&self, key: &str) -> Option<bool> {
        self.value.get(key).and_then(|v| v.as_bool())
    }

    /// Deserialize the entire arguments into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.value.clone())
            .map_err(|e| ColloquyError::InvalidArgument(format!("Invalid tool arguments: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_argument_text() {
        let args = ToolArguments::parse(r#"{"city": "Porto", "days": 3, "metric": true}"#).unwrap();
        assert_eq!(args.get_str("city").unwrap(), "Porto");
        assert_eq!(args.get_f64("days").unwrap(), 3.0);
        assert!(args.get_bool("metric").unwrap());
        assert_eq!(args.get_str_opt("units"), None);
    }

    #[test]
    fn blank_text_is_empty_object() {
        assert_eq!(ToolArguments::parse("  ").unwrap().raw(), &json!({}));
    }

    #[test]
    fn malformed_text_is_serialization_error() {
        assert!(matches!(
            ToolArguments::parse("{city: Porto}"),
            Err(ColloquyError::Serialization(_))
        ));
    }

    #[test]
    fn missing_key_is_invalid_argument() {
        let args = ToolArguments::new(json!({}));
        assert!(matches!(args.get_str("city"), Err(ColloquyError::InvalidArgument(_))));
    }

    #[test]
    fn deserializes_into_struct() {
        #[derive(Deserialize)]
        struct Query {
            term: String,
            #[serde(default)]
            limit: Option<u32>,
        }
        let query: Query = ToolArguments::new(json!({"term": "rust"})).deserialize().unwrap();
        assert_eq!(query.term, "rust");
        assert_eq!(query.limit, None);
    }
}
