//! Conversions between registry types and the `rmcp` model
//!
//! A host serving the registry over MCP only needs these: tool
//! definitions become `rmcp::model::Tool`, call results become
//! `CallToolResult`.
//!
//! ```rust,ignore
//! use hass_tools_core::mcp;
//!
//! let tools = mcp::list_tools(&registry);
//! let result = mcp::call_tool(&registry, "list_automations", request.arguments, ctx).await;
//! ```

use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, JsonObject, RawContent};
use serde_json::Value;

use crate::tools::{CallContext, ToolRegistry};
use crate::types::{ContentSegment, ToolCallResult, ToolDefinition};

pub use rmcp::model::{CallToolResult as McpToolResult, Tool as McpTool};

impl From<&ToolDefinition> for McpTool {
    fn from(definition: &ToolDefinition) -> Self {
        let schema = match definition.input_schema.to_json() {
            Value::Object(map) => map,
            _ => JsonObject::new(),
        };
        McpTool::new(
            definition.name.clone(),
            definition.description.clone(),
            Arc::new(schema),
        )
    }
}

impl From<ContentSegment> for Content {
    fn from(segment: ContentSegment) -> Self {
        match segment {
            ContentSegment::Text { text } => Content::text(text),
        }
    }
}

impl From<ToolCallResult> for CallToolResult {
    fn from(result: ToolCallResult) -> Self {
        let content = result.content.into_iter().map(Content::from).collect();
        if result.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }
}

/// Text segments of an MCP result; non-text content is skipped
pub fn result_text(result: &CallToolResult) -> Vec<&str> {
    result
        .content
        .iter()
        .filter_map(|content| match &content.raw {
            RawContent::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
        .collect()
}

/// Every registered tool as an MCP tool, in registration order
pub fn list_tools(registry: &ToolRegistry) -> Vec<McpTool> {
    registry.list().into_iter().map(McpTool::from).collect()
}

/// Dispatch an MCP `tools/call` request to the registry
pub async fn call_tool(
    registry: &ToolRegistry,
    name: &str,
    arguments: Option<JsonObject>,
    ctx: CallContext,
) -> CallToolResult {
    let args = arguments.map(Value::Object).unwrap_or(Value::Null);
    registry.dispatch_with(name, args, ctx).await.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::schema::SchemaNode;
    use crate::tools::ToolHandler;
    use crate::types::ToolArgs;
    use async_trait::async_trait;
    use serde_json::json;

    struct Greet;

    #[async_trait]
    impl ToolHandler for Greet {
        async fn call(&self, args: ToolArgs, _ctx: CallContext) -> ToolCallResult {
            match args.get("name").and_then(Value::as_str) {
                Some(name) => ToolCallResult::success(format!("Hello, {}", name)),
                None => ToolCallResult::error("Missing required argument: name"),
            }
        }
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new(Arc::new(NoOpLogger::new()));
        registry
            .register(
                ToolDefinition::new("greet", "Say hello").with_schema(
                    SchemaNode::object().required_property("name", SchemaNode::string()),
                ),
                Greet,
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_definition_to_mcp_tool() {
        let tools = list_tools(&registry());
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "greet");
        assert_eq!(tools[0].input_schema.get("type"), Some(&json!("object")));
        assert_eq!(tools[0].input_schema["required"], json!(["name"]));
    }

    #[test]
    fn test_result_conversion_keeps_segments() {
        let result: CallToolResult = ToolCallResult::success("Found 0 views")
            .with_text("[]")
            .into();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result_text(&result), vec!["Found 0 views", "[]"]);

        let failed: CallToolResult = ToolCallResult::error("Unknown tool: nope").into();
        assert_eq!(failed.is_error, Some(true));
        assert_eq!(result_text(&failed), vec!["Unknown tool: nope"]);
    }

    #[tokio::test]
    async fn test_call_tool() {
        let registry = registry();
        let args = json!({ "name": "kitchen" }).as_object().cloned();

        let result = call_tool(&registry, "greet", args, CallContext::new()).await;
        assert_eq!(result_text(&result), vec!["Hello, kitchen"]);

        let missing = call_tool(&registry, "greet", None, CallContext::new()).await;
        assert_eq!(missing.is_error, Some(true));
    }
}
