//! Rewrite a JSON Schema into the strict structured-output dialect.
//!
//! The backend accepts a narrow subset of JSON Schema: no `$ref`, no
//! `default`/`format` annotations, closed objects and an explicit `required`
//! list. [`strict_schema`] produces a new tree with those properties and never
//! mutates its input. Applying it twice yields the same tree.

use serde_json::{Map, Value};

use crate::error::{ColloquyError, Result};

const DEF_TABLES: [&str; 2] = ["$defs", "definitions"];
const STRIPPED_KEYWORDS: [&str; 3] = ["default", "format", "$schema"];
/// Keywords whose values are data, not sub-schemas.
const LITERAL_KEYWORDS: [&str; 4] = ["enum", "const", "examples", "required"];
/// Keywords whose values map property names to sub-schemas.
const SCHEMA_MAP_KEYWORDS: [&str; 2] = ["properties", "patternProperties"];

/// Translate `schema` into its strict form.
pub fn strict_schema(schema: &Value) -> Result<Value> {
    let defs = collect_definitions(schema);
    let inlined = inline_refs(schema, &defs, &mut Vec::new())?;
    Ok(normalize(&inlined))
}

fn collect_definitions(schema: &Value) -> Map<String, Value> {
    let mut defs = Map::new();
    for table in DEF_TABLES {
        if let Some(Value::Object(entries)) = schema.get(table) {
            for (name, def) in entries {
                defs.insert(name.clone(), def.clone());
            }
        }
    }
    defs
}

fn ref_name(reference: &str) -> Option<&str> {
    DEF_TABLES
        .iter()
        .find_map(|table| reference.strip_prefix(&format!("#/{table}/")))
}

fn inline_refs(node: &Value, defs: &Map<String, Value>, stack: &mut Vec<String>) -> Result<Value> {
    match node {
        Value::Object(obj) => {
            let mut out = match obj.get("$ref") {
                Some(Value::String(reference)) => resolve_ref(reference, defs, stack)?,
                Some(other) => {
                    return Err(ColloquyError::Schema(format!("$ref must be a string, got {other}")))
                }
                None => Map::new(),
            };

            for (key, value) in obj {
                if key == "$ref" || DEF_TABLES.contains(&key.as_str()) {
                    continue;
                }
                let next = if LITERAL_KEYWORDS.contains(&key.as_str()) {
                    value.clone()
                } else if SCHEMA_MAP_KEYWORDS.contains(&key.as_str()) {
                    map_values(value, |v| inline_refs(v, defs, stack))?
                } else {
                    inline_refs(value, defs, stack)?
                };
                out.insert(key.clone(), next);
            }

            Ok(collapse_single_all_of(out))
        }
        Value::Array(items) => items
            .iter()
            .map(|item| inline_refs(item, defs, stack))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        _ => Ok(node.clone()),
    }
}

fn resolve_ref(
    reference: &str,
    defs: &Map<String, Value>,
    stack: &mut Vec<String>,
) -> Result<Map<String, Value>> {
    let name = ref_name(reference)
        .ok_or_else(|| ColloquyError::Schema(format!("unsupported $ref '{reference}'")))?;
    if stack.iter().any(|seen| seen == name) {
        return Err(ColloquyError::Schema(format!(
            "recursive type '{name}' cannot be inlined"
        )));
    }
    let def = defs
        .get(name)
        .ok_or_else(|| ColloquyError::Schema(format!("unresolved $ref '{reference}'")))?;

    stack.push(name.to_string());
    let resolved = inline_refs(def, defs, stack);
    stack.pop();

    match resolved? {
        Value::Object(obj) => Ok(obj),
        other => Err(ColloquyError::Schema(format!(
            "definition '{name}' is not an object schema: {other}"
        ))),
    }
}

/// `{"allOf": [X], "description": ..}` is how a documented nested type is
/// referenced. Fold the single member into the node.
fn collapse_single_all_of(obj: Map<String, Value>) -> Value {
    let single = match obj.get("allOf") {
        Some(Value::Array(members)) if members.len() == 1 => members[0].as_object().cloned(),
        _ => None,
    };
    let Some(member) = single else {
        return Value::Object(obj);
    };
    let mut out: Map<String, Value> = obj.into_iter().filter(|(key, _)| key != "allOf").collect();
    for (key, value) in member {
        out.entry(key).or_insert(value);
    }
    Value::Object(out)
}

fn normalize(node: &Value) -> Value {
    match node {
        Value::Object(obj) => {
            let mut out = Map::new();
            for (key, value) in obj {
                if STRIPPED_KEYWORDS.contains(&key.as_str()) {
                    continue;
                }
                let next = if LITERAL_KEYWORDS.contains(&key.as_str()) {
                    value.clone()
                } else if SCHEMA_MAP_KEYWORDS.contains(&key.as_str()) {
                    map_values(value, |v| Ok(normalize(v))).unwrap_or_else(|_| value.clone())
                } else {
                    normalize(value)
                };
                out.insert(key.clone(), next);
            }

            if is_object_schema(&out) {
                out.insert("additionalProperties".into(), Value::Bool(false));
                if !out.contains_key("required") {
                    let names: Vec<Value> = match out.get("properties") {
                        Some(Value::Object(props)) => {
                            props.keys().cloned().map(Value::String).collect()
                        }
                        _ => Vec::new(),
                    };
                    out.insert("required".into(), Value::Array(names));
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize).collect()),
        _ => node.clone(),
    }
}

fn map_values(value: &Value, mut f: impl FnMut(&Value) -> Result<Value>) -> Result<Value> {
    match value {
        Value::Object(entries) => {
            let mut out = Map::new();
            for (name, schema) in entries {
                out.insert(name.clone(), f(schema)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

fn is_object_schema(obj: &Map<String, Value>) -> bool {
    let typed_object = match obj.get("type") {
        Some(Value::String(t)) => t == "object",
        Some(Value::Array(types)) => types.iter().any(|t| t == "object"),
        _ => false,
    };
    typed_object || obj.contains_key("properties")
}
