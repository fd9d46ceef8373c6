//! `get_helper`

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::identifiers::HelperPlatform;
use crate::query::QueryEngine;
use crate::schema::SchemaNode;
use crate::tools::args::{required_str, ArgumentError};
use crate::tools::registry::{CallContext, ToolHandler};
use crate::types::{RecordKind, ToolArgs, ToolCallResult, ToolDefinition};

pub const TOOL_NAME: &str = "get_helper";

/// Look up a helper entity by its composite id
///
/// The id must start with a recognized helper platform; anything else
/// (`light.kitchen`) is rejected before the backend is consulted.
pub struct GetHelperTool {
    engine: Arc<QueryEngine>,
}

impl GetHelperTool {
    pub fn new(engine: Arc<QueryEngine>) -> Self {
        Self { engine }
    }

    pub fn definition(&self) -> ToolDefinition {
        let platforms = HelperPlatform::ALL
            .iter()
            .map(HelperPlatform::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        ToolDefinition::new(
            TOOL_NAME,
            format!("Get a helper and its attributes. Supported platforms: {}", platforms),
        )
        .with_schema(SchemaNode::object().required_property(
            "helper_id",
            SchemaNode::string().with_description("Helper id, e.g. input_boolean.guest_mode"),
        ))
    }
}

#[async_trait]
impl ToolHandler for GetHelperTool {
    async fn call(&self, args: ToolArgs, ctx: CallContext) -> ToolCallResult {
        let helper_id = match required_str(&args, "helper_id") {
            Ok(id) => id,
            Err(e) => return e.into(),
        };
        let Some((platform, local_id)) = HelperPlatform::split(helper_id) else {
            return ArgumentError::UnknownPlatform(helper_id.to_string()).into();
        };

        match self.engine.get(RecordKind::Entity, helper_id, &ctx.cancel).await {
            Ok(Value::Object(mut record)) => {
                record.insert("platform".to_string(), Value::String(platform.as_str().to_string()));
                record.insert("local_id".to_string(), Value::String(local_id.to_string()));
                let record = Value::Object(record);
                ToolCallResult::success(
                    serde_json::to_string_pretty(&record).unwrap_or_else(|_| record.to_string()),
                )
            }
            Ok(other) => ToolCallResult::success(other.to_string()),
            Err(e) => ToolCallResult::error(e.to_string()),
        }
    }
}
