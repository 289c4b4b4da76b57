//! Template context: the key/value payload handed to the engine.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{io_err, RenderError};

/// Key/value rendering payload.
///
/// Values are stored as JSON so contexts can be assembled from any
/// `Serialize` type, a YAML/JSON file, or individual `key=value` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateContext {
    values: Map<String, Value>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a serializable struct or map.
    ///
    /// Fails with [`RenderError::ContextShape`] unless `value` serializes to a
    /// mapping.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, RenderError> {
        Self::from_value(serde_json::to_value(value)?)
    }

    /// Load a context file: `.json` is parsed as JSON, anything else as YAML.
    pub fn from_file(path: &Path) -> Result<Self, RenderError> {
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        let is_json = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let value: Value = if is_json {
            serde_json::from_str(&contents)?
        } else if contents.trim().is_empty() {
            Value::Object(Map::new())
        } else {
            serde_yaml::from_str(&contents).map_err(|e| RenderError::ContextParse {
                path: path.to_path_buf(),
                source: e,
            })?
        };
        Self::from_value(value)
    }

    fn from_value(value: Value) -> Result<Self, RenderError> {
        match value {
            Value::Object(values) => Ok(TemplateContext { values }),
            Value::Null => Ok(Self::default()),
            other => Err(RenderError::ContextShape(kind_of(&other))),
        }
    }

    /// Insert or replace one key.
    pub fn insert<T: Serialize + ?Sized>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<(), RenderError> {
        self.values.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Merge `other` into `self`; keys from `other` win.
    pub fn extend(&mut self, other: TemplateContext) {
        self.values.extend(other.values);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(&self.values).map_err(RenderError::from)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
