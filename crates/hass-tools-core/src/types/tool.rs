//! Tool definition and tool call result types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::SchemaNode;

/// Arguments passed to a tool call
pub type ToolArgs = Map<String, Value>;

/// A registered tool: name, description and declared argument schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name, unique within a registry
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// Schema describing the accepted arguments
    #[serde(rename = "inputSchema")]
    pub input_schema: SchemaNode,
}

impl ToolDefinition {
    /// Create a new tool definition that takes no arguments
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: SchemaNode::object(),
        }
    }

    /// Set the input schema
    pub fn with_schema(mut self, schema: SchemaNode) -> Self {
        self.input_schema = schema;
        self
    }
}

/// One segment of a tool call result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentSegment {
    Text { text: String },
}

impl ContentSegment {
    pub fn text(text: impl Into<String>) -> Self {
        ContentSegment::Text { text: text.into() }
    }

    pub fn as_text(&self) -> &str {
        match self {
            ContentSegment::Text { text } => text,
        }
    }
}

/// Result of a tool call, used for both success and user-facing failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallResult {
    /// Ordered content segments
    pub content: Vec<ContentSegment>,
    /// Whether this result represents an error
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

impl ToolCallResult {
    /// Create a successful result with a single text segment
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentSegment::text(text)],
            is_error: false,
        }
    }

    /// Create an error result with a single text segment
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ContentSegment::text(message)],
            is_error: true,
        }
    }

    /// Append a text segment
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.content.push(ContentSegment::text(text));
        self
    }

    /// All text segments joined by newlines
    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(ContentSegment::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
