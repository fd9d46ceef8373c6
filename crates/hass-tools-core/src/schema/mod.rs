//! Declarative argument schemas for tools
//!
//! A [`SchemaNode`] tree documents what a tool accepts and renders to JSON
//! Schema for discovery. Handlers still check their own arguments; the
//! registry only runs [`SchemaNode::validate`] when configured for strict
//! validation.
//!
//! ```rust
//! use hass_tools_core::schema::SchemaNode;
//!
//! let schema = SchemaNode::object()
//!     .required_property("alias", SchemaNode::string())
//!     .property("verbose", SchemaNode::boolean().with_description("Include config"));
//!
//! assert!(schema.validate(&serde_json::json!({ "alias": "Night" })).is_ok());
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON type accepted by a schema node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Object,
    String,
    Number,
    Boolean,
    Array,
}

impl SchemaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::Object => "object",
            SchemaKind::String => "string",
            SchemaKind::Number => "number",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Array => "array",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            SchemaKind::Object => value.is_object(),
            SchemaKind::String => value.is_string(),
            SchemaKind::Number => value.is_number(),
            SchemaKind::Boolean => value.is_boolean(),
            SchemaKind::Array => value.is_array(),
        }
    }
}

/// One node of a tool's argument schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    #[serde(rename = "type")]
    pub kind: SchemaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaNode>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub required: BTreeSet<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
}

impl SchemaNode {
    fn of_kind(kind: SchemaKind) -> Self {
        Self {
            kind,
            description: None,
            properties: BTreeMap::new(),
            required: BTreeSet::new(),
            enum_values: Vec::new(),
            items: None,
        }
    }

    pub fn object() -> Self {
        Self::of_kind(SchemaKind::Object)
    }

    pub fn string() -> Self {
        Self::of_kind(SchemaKind::String)
    }

    pub fn number() -> Self {
        Self::of_kind(SchemaKind::Number)
    }

    pub fn boolean() -> Self {
        Self::of_kind(SchemaKind::Boolean)
    }

    pub fn array(items: SchemaNode) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of_kind(SchemaKind::Array)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Restrict the node to a fixed set of literal values
    pub fn with_enum<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Add an optional property
    pub fn property(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.properties.insert(name.into(), node);
        self
    }

    /// Add a property and mark it required
    pub fn required_property(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        let name = name.into();
        self.required.insert(name.clone());
        self.properties.insert(name, node);
        self
    }

    /// Render as a JSON Schema object
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Check a value against this schema
    ///
    /// Unknown object properties are accepted. Every violation found is
    /// reported, not just the first.
    pub fn validate(&self, value: &Value) -> Result<(), Vec<SchemaViolation>> {
        let mut violations = Vec::new();
        self.collect_violations(value, "$", &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    fn collect_violations(&self, value: &Value, path: &str, out: &mut Vec<SchemaViolation>) {
        if !self.kind.accepts(value) {
            out.push(SchemaViolation::new(
                path,
                format!("expected {}, got {}", self.kind.as_str(), json_type_name(value)),
            ));
            return;
        }

        if !self.enum_values.is_empty() && !self.enum_values.contains(value) {
            let allowed = self
                .enum_values
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            out.push(SchemaViolation::new(path, format!("must be one of: {}", allowed)));
        }

        match value {
            Value::Object(map) => {
                for name in &self.required {
                    if !map.contains_key(name) {
                        out.push(SchemaViolation::new(
                            &format!("{}.{}", path, name),
                            "required property is missing",
                        ));
                    }
                }
                for (name, node) in &self.properties {
                    if let Some(child) = map.get(name) {
                        node.collect_violations(child, &format!("{}.{}", path, name), out);
                    }
                }
            }
            Value::Array(items) => {
                if let Some(node) = &self.items {
                    for (i, item) in items.iter().enumerate() {
                        node.collect_violations(item, &format!("{}[{}]", path, i), out);
                    }
                }
            }
            _ => {}
        }
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

/// A single schema mismatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Location of the offending value, e.g. `$.triggers[0]`
    pub path: String,
    pub message: String,
}

impl SchemaViolation {
    fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}
