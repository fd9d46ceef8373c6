//! `create_automation`

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::backend::Backend;
use crate::identifiers::slugify;
use crate::schema::SchemaNode;
use crate::tools::args::{
    optional_array, optional_str, required_array, required_str, ArgResult, ArgumentError,
};
use crate::tools::registry::{CallContext, ToolHandler};
use crate::types::{RecordKind, ToolArgs, ToolCallResult, ToolDefinition};

pub const TOOL_NAME: &str = "create_automation";

/// Automation run modes accepted by Home Assistant
pub const MODES: [&str; 4] = ["single", "restart", "queued", "parallel"];

const DEFAULT_MODE: &str = "single";

/// Create (or overwrite) an automation config
pub struct CreateAutomationTool {
    backend: Arc<dyn Backend>,
}

impl CreateAutomationTool {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub fn definition(&self) -> ToolDefinition {
        let step = || SchemaNode::array(SchemaNode::object());

        ToolDefinition::new(
            TOOL_NAME,
            "Create an automation from triggers, optional conditions and actions. \
             The id defaults to a slug of the alias.",
        )
        .with_schema(
            SchemaNode::object()
                .required_property(
                    "alias",
                    SchemaNode::string().with_description("Human readable name"),
                )
                .property(
                    "id",
                    SchemaNode::string()
                        .with_description("Automation id; derived from the alias when omitted"),
                )
                .property("description", SchemaNode::string())
                .required_property("triggers", step().with_description("At least one trigger"))
                .property("conditions", step())
                .required_property("actions", step().with_description("At least one action"))
                .property(
                    "mode",
                    SchemaNode::string()
                        .with_description("Run mode (default single)")
                        .with_enum(MODES),
                ),
        )
    }

    /// Validate arguments and build the config to save, keyed by its id
    fn build_config(args: &ToolArgs) -> ArgResult<(String, Value)> {
        let alias = required_str(args, "alias")?.trim();
        let triggers = required_array(args, "triggers")?;
        let actions = required_array(args, "actions")?;
        let conditions = optional_array(args, "conditions")?;
        let description = optional_str(args, "description")?;

        let mode = optional_str(args, "mode")?.unwrap_or(DEFAULT_MODE);
        if !MODES.contains(&mode) {
            return Err(ArgumentError::Invalid(format!(
                "Invalid mode '{}', expected one of: {}",
                mode,
                MODES.join(", ")
            )));
        }

        let id = match optional_str(args, "id")?.map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => slugify(alias),
        };
        if id.is_empty() {
            return Err(ArgumentError::Invalid(format!(
                "Cannot derive an automation id from alias '{}'",
                alias
            )));
        }

        let mut config = Map::new();
        config.insert("id".to_string(), json!(id));
        config.insert("alias".to_string(), json!(alias));
        if let Some(description) = description {
            config.insert("description".to_string(), json!(description));
        }
        config.insert("triggers".to_string(), Value::Array(triggers.clone()));
        config.insert(
            "conditions".to_string(),
            Value::Array(conditions.cloned().unwrap_or_default()),
        );
        config.insert("actions".to_string(), Value::Array(actions.clone()));
        config.insert("mode".to_string(), json!(mode));

        Ok((id, Value::Object(config)))
    }
}

#[async_trait]
impl ToolHandler for CreateAutomationTool {
    async fn call(&self, args: ToolArgs, ctx: CallContext) -> ToolCallResult {
        let (id, config) = match Self::build_config(&args) {
            Ok(built) => built,
            Err(e) => return e.into(),
        };
        if ctx.cancel.is_cancelled() {
            return ToolCallResult::error("Error creating automation: request cancelled");
        }

        match self.backend.save_config(RecordKind::Automation, &id, &config).await {
            Ok(()) => {
                let body =
                    serde_json::to_string_pretty(&config).unwrap_or_else(|_| config.to_string());
                ToolCallResult::success(format!("Created automation automation.{}", id))
                    .with_text(body)
            }
            Err(e) => ToolCallResult::error(format!("Error creating automation: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, BackendResult, MemoryBackend};
    use crate::types::{CancellationToken, Record};

    fn args(value: Value) -> ToolArgs {
        value.as_object().cloned().unwrap()
    }

    fn tool() -> (Arc<MemoryBackend>, CreateAutomationTool) {
        let backend = Arc::new(MemoryBackend::new());
        (backend.clone(), CreateAutomationTool::new(backend))
    }

    #[tokio::test]
    async fn test_id_defaults_to_slug() {
        let (backend, tool) = tool();
        let result = tool
            .call(
                args(json!({
                    "alias": "Morning Lights!",
                    "triggers": [{ "platform": "time", "at": "07:00:00" }],
                    "actions": [{ "action": "light.turn_on", "target": { "entity_id": "light.kitchen" } }]
                })),
                CallContext::new(),
            )
            .await;

        assert!(!result.is_error, "{}", result.text());
        assert_eq!(result.content[0].as_text(), "Created automation automation.morning_lights");

        let saved = backend.config_of(RecordKind::Automation, "morning_lights").unwrap();
        assert_eq!(saved["alias"], "Morning Lights!");
        assert_eq!(saved["mode"], "single");
        assert_eq!(saved["conditions"], json!([]));
    }

    #[tokio::test]
    async fn test_explicit_id_and_mode() {
        let (backend, tool) = tool();
        let result = tool
            .call(
                args(json!({
                    "alias": "Night",
                    "id": "night_v2",
                    "description": "Dim everything",
                    "mode": "restart",
                    "triggers": [{}],
                    "actions": [{}]
                })),
                CallContext::new(),
            )
            .await;

        assert!(!result.is_error);
        let saved = backend.config_of(RecordKind::Automation, "night_v2").unwrap();
        assert_eq!(saved["mode"], "restart");
        assert_eq!(saved["description"], "Dim everything");
    }

    #[tokio::test]
    async fn test_argument_errors_skip_backend() {
        let (backend, tool) = tool();
        let cases = [
            (json!({ "triggers": [{}], "actions": [{}] }), "Missing required argument: alias"),
            (
                json!({ "alias": "A", "triggers": [], "actions": [{}] }),
                "Argument 'triggers' must not be empty",
            ),
            (json!({ "alias": "A", "triggers": [{}] }), "Missing required argument: actions"),
            (
                json!({ "alias": "A", "triggers": [{}], "actions": [{}], "mode": "often" }),
                "Invalid mode 'often', expected one of: single, restart, queued, parallel",
            ),
            (
                json!({ "alias": "!!!", "triggers": [{}], "actions": [{}] }),
                "Cannot derive an automation id from alias '!!!'",
            ),
        ];

        for (input, expected) in cases {
            let result = tool.call(args(input), CallContext::new()).await;
            assert!(result.is_error);
            assert_eq!(result.text(), expected);
        }
        assert!(backend.fetch_all(RecordKind::Automation).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_backend_failure_is_prefixed() {
        struct Rejecting;

        #[async_trait]
        impl Backend for Rejecting {
            fn name(&self) -> &str {
                "rejecting"
            }
            async fn fetch_all(&self, _: RecordKind) -> BackendResult<Vec<Record>> {
                Ok(Vec::new())
            }
            async fn fetch_one(&self, kind: RecordKind, key: &str) -> BackendResult<Record> {
                Err(BackendError::not_found(kind, key))
            }
            async fn save_config(&self, _: RecordKind, _: &str, _: &Value) -> BackendResult<()> {
                Err(BackendError::api(401, "Unauthorized"))
            }
        }

        let tool = CreateAutomationTool::new(Arc::new(Rejecting));
        let result = tool
            .call(
                args(json!({ "alias": "A", "triggers": [{}], "actions": [{}] })),
                CallContext::new(),
            )
            .await;

        assert!(result.is_error);
        assert_eq!(result.text(), "Error creating automation: API error (401): Unauthorized");
    }

    #[tokio::test]
    async fn test_cancelled_before_save() {
        let (backend, tool) = tool();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = tool
            .call(
                args(json!({ "alias": "A", "triggers": [{}], "actions": [{}] })),
                CallContext::with_cancel(cancel),
            )
            .await;

        assert!(result.is_error);
        assert!(backend.config_of(RecordKind::Automation, "a").is_none());
    }
}
