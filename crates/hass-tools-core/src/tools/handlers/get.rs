//! `get_automation`

use std::sync::Arc;

use async_trait::async_trait;

use crate::query::QueryEngine;
use crate::schema::SchemaNode;
use crate::tools::args::required_str;
use crate::tools::registry::{CallContext, ToolHandler};
use crate::types::{RecordKind, ToolArgs, ToolCallResult, ToolDefinition};

pub const TOOL_NAME: &str = "get_automation";

/// Fetch one automation with its full configuration
pub struct GetAutomationTool {
    engine: Arc<QueryEngine>,
}

impl GetAutomationTool {
    pub fn new(engine: Arc<QueryEngine>) -> Self {
        Self { engine }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(TOOL_NAME, "Get one automation including its full configuration")
            .with_schema(SchemaNode::object().required_property(
                "entity_id",
                SchemaNode::string()
                    .with_description("Automation entity id, e.g. automation.night_mode"),
            ))
    }
}

#[async_trait]
impl ToolHandler for GetAutomationTool {
    async fn call(&self, args: ToolArgs, ctx: CallContext) -> ToolCallResult {
        let entity_id = match required_str(&args, "entity_id") {
            Ok(id) => id,
            Err(e) => return e.into(),
        };

        match self.engine.get(RecordKind::Automation, entity_id, &ctx.cancel).await {
            Ok(record) => ToolCallResult::success(
                serde_json::to_string_pretty(&record).unwrap_or_else(|_| record.to_string()),
            ),
            Err(e) => ToolCallResult::error(e.to_string()),
        }
    }
}
