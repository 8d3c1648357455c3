//! Tool parameter declarations and their JSON Schema form.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use strum::{Display, EnumString};

/// Primitive kinds a tool parameter may declare.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParamKind {
    #[default]
    String,
    Number,
    Boolean,
}

impl ParamKind {
    /// Map a declared type name to a kind. Unknown names fall back to string.
    pub fn from_type_name(type_name: &str) -> Self {
        match type_name.trim() {
            "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
            | "u128" | "usize" | "f32" | "f64" | "int" | "integer" | "float" | "number" => {
                Self::Number
            }
            "bool" | "boolean" => Self::Boolean,
            _ => Self::String,
        }
    }
}

/// One declared tool parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolParameter {
    pub name: String,
    pub kind: ParamKind,
    #[serde(default)]
    pub description: String,
    /// False when the parameter has a default value.
    pub required: bool,
}

/// Ordered parameter list for a tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolParameters {
    params: Vec<ToolParameter>,
}

impl ToolParameters {
    /// A tool that takes no parameters.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> ParameterBuilder {
        ParameterBuilder {
            params: Vec::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolParameter> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// JSON Schema object for the `parameters` field of a tool definition.
    pub fn to_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.params {
            properties.insert(
                param.name.clone(),
                json!({
                    "type": param.kind.to_string(),
                    "description": param.description,
                }),
            );
        }
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }
}

/// Builder for tool parameter lists.
pub struct ParameterBuilder {
    params: Vec<ToolParameter>,
}

impl ParameterBuilder {
    /// Add a parameter. A later parameter with the same name replaces the earlier one.
    pub fn param(
        mut self,
        name: impl Into<String>,
        kind: ParamKind,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        let param = ToolParameter {
            name: name.into(),
            kind,
            description: description.into(),
            required,
        };
        match self.params.iter_mut().find(|p| p.name == param.name) {
            Some(existing) => *existing = param,
            None => self.params.push(param),
        }
        self
    }

    /// Add a required string parameter.
    pub fn string(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.param(name, ParamKind::String, description, true)
    }

    /// Add a required number parameter.
    pub fn number(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.param(name, ParamKind::Number, description, true)
    }

    /// Add a required boolean parameter.
    pub fn boolean(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.param(name, ParamKind::Boolean, description, true)
    }

    /// Add a string parameter that has a default.
    pub fn optional_string(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.param(name, ParamKind::String, description, false)
    }

    /// Add a number parameter that has a default.
    pub fn optional_number(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.param(name, ParamKind::Number, description, false)
    }

    /// Add a boolean parameter that has a default.
    pub fn optional_boolean(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.param(name, ParamKind::Boolean, description, false)
    }

    pub fn build(self) -> ToolParameters {
        ToolParameters {
            params: self.params,
        }
    }
}
