//! Structured output: declared result shapes to strict schemas and back.

mod strict;
mod validation;

pub use strict::strict_schema;
pub use validation::validate_value;

use std::sync::OnceLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ColloquyError, Result};
use crate::types::ResponseFormat;

const FALLBACK_NAME: &str = "response";
const MAX_NAME_LEN: usize = 64;

/// A backend-ready output schema plus the name it is sent under.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    name: String,
    schema: Value,
}

impl OutputSchema {
    /// Derive the schema of `T` and translate it to the strict dialect.
    pub fn for_type<T: JsonSchema>() -> Result<Self> {
        let root = schemars::schema_for!(T);
        Self::from_value(serde_json::to_value(root)?)
    }

    /// Translate a schema supplied at runtime. The name comes from its `title`.
    pub fn from_value(schema: Value) -> Result<Self> {
        let name = schema
            .get("title")
            .and_then(|t| t.as_str())
            .unwrap_or(FALLBACK_NAME)
            .to_string();
        Self::named(name, schema)
    }

    /// Translate a runtime schema under an explicit name.
    pub fn named(name: impl AsRef<str>, schema: Value) -> Result<Self> {
        Ok(Self {
            name: sanitize_name(name.as_ref()),
            schema: strict_schema(&schema)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// The `response_format` directive for this schema.
    pub fn response_format(&self) -> ResponseFormat {
        ResponseFormat::json_schema(self.name.clone(), self.schema.clone())
    }

    /// Parse `text` and check it against this schema.
    pub fn parse_value(&self, text: &str) -> Result<Value> {
        let json_text = strip_code_fences(text);
        let value: Value = serde_json::from_str(json_text).map_err(|e| structured_error(e, text))?;
        validate_value(&value, &self.schema).map_err(|message| ColloquyError::StructuredOutput {
            message,
            raw: text.to_string(),
        })?;
        Ok(value)
    }
}

/// Parse backend output text into the declared type.
///
/// A mismatch is a [`ColloquyError::StructuredOutput`]. Nothing is defaulted:
/// a missing required field fails.
pub fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(strip_code_fences(text)).map_err(|e| structured_error(e, text))
}

fn structured_error(err: serde_json::Error, raw: &str) -> ColloquyError {
    ColloquyError::StructuredOutput {
        message: err.to_string(),
        raw: raw.to_string(),
    }
}

/// Strip markdown code fences from JSON response.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let without_opening = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_opening
        .strip_suffix("```")
        .unwrap_or(without_opening)
        .trim()
}

fn sanitize_name(name: &str) -> String {
    static INVALID: OnceLock<Regex> = OnceLock::new();
    let invalid = INVALID.get_or_init(|| Regex::new(r"[^A-Za-z0-9_-]").expect("static pattern compiles"));
    let cleaned: String = invalid.replace_all(name.trim(), "_").chars().take(MAX_NAME_LEN).collect();
    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned
    }
}
