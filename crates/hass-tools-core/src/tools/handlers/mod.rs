//! Built-in Home Assistant tools

mod automation;
mod get;
mod helper;
mod list;

use std::sync::Arc;

pub use automation::CreateAutomationTool;
pub use get::GetAutomationTool;
pub use helper::GetHelperTool;
pub use list::ListRecordsTool;

use super::registry::{RegistryError, ToolFilter, ToolRegistry};
use crate::backend::Backend;
use crate::query::QueryEngine;
use crate::types::RecordKind;

const LIST_KINDS: [RecordKind; 3] = [
    RecordKind::Automation,
    RecordKind::Entity,
    RecordKind::DashboardView,
];

/// Register every built-in tool that `filter` allows
///
/// Registration order is stable: the list tools, `get_automation`,
/// `get_helper`, then `create_automation`. List tools for record kinds the
/// backend cannot serve are left out.
pub fn register_builtin_tools(
    registry: &mut ToolRegistry,
    backend: Arc<dyn Backend>,
    engine: Arc<QueryEngine>,
    filter: &ToolFilter,
) -> Result<(), RegistryError> {
    for kind in LIST_KINDS {
        if !backend.supports(kind) || !filter.matches(ListRecordsTool::tool_name(kind)) {
            continue;
        }
        let tool = ListRecordsTool::new(engine.clone(), kind);
        registry.register(tool.definition(), tool)?;
    }

    if filter.matches(get::TOOL_NAME) {
        let tool = GetAutomationTool::new(engine.clone());
        registry.register(tool.definition(), tool)?;
    }

    if filter.matches(helper::TOOL_NAME) {
        let tool = GetHelperTool::new(engine);
        registry.register(tool.definition(), tool)?;
    }

    if filter.matches(automation::TOOL_NAME) {
        let tool = CreateAutomationTool::new(backend);
        registry.register(tool.definition(), tool)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, RestBackend, RestBackendConfig};
    use crate::logging::NoOpLogger;
    use crate::query::COMPACT_HINT;
    use crate::tools::registry::ValidationMode;
    use crate::types::Record;
    use serde_json::{json, Value};

    fn seeded_backend() -> Arc<MemoryBackend> {
        let backend = MemoryBackend::new();
        backend.set_records(
            RecordKind::Automation,
            vec![
                Record::new("automation.hall_lights")
                    .with_state("on")
                    .with_display_name("Hall Lights")
                    .with_config_key("1700000000001")
                    .with_config(json!({
                        "triggers": [{ "platform": "state", "entity_id": "binary_sensor.hall_motion" }],
                        "actions": [{ "action": "light.turn_on", "target": { "entity_id": "light.hall" } }]
                    })),
                Record::new("automation.away_mode")
                    .with_state("off")
                    .with_display_name("Away Mode")
                    .with_config(json!({
                        "triggers": [{ "platform": "state", "entity_id": "person.alex" }],
                        "actions": [{ "action": "climate.set_preset_mode", "entity_id": "climate.living_room" }]
                    })),
            ],
        );
        backend.set_records(
            RecordKind::Entity,
            vec![
                Record::new("input_boolean.guest_mode")
                    .with_state("off")
                    .with_display_name("Guest Mode")
                    .with_config(json!({ "friendly_name": "Guest Mode", "icon": "mdi:account" })),
                Record::new("light.hall")
                    .with_state("on")
                    .with_display_name("Hall"),
            ],
        );
        Arc::new(backend)
    }

    fn registry_with(filter: &ToolFilter, mode: ValidationMode) -> ToolRegistry {
        let backend = seeded_backend();
        let logger = Arc::new(NoOpLogger::new());
        let engine = Arc::new(QueryEngine::new(backend.clone(), logger.clone()));
        let mut registry = ToolRegistry::new(logger).with_validation(mode);
        register_builtin_tools(&mut registry, backend, engine, filter).unwrap();
        registry
    }

    fn registry() -> ToolRegistry {
        registry_with(&ToolFilter::all(), ValidationMode::Advisory)
    }

    fn records(text: &str) -> Vec<Value> {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_builtin_order() {
        let names: Vec<_> = registry().list().iter().map(|d| d.name.clone()).collect();
        assert_eq!(
            names,
            vec![
                "list_automations",
                "list_entities",
                "list_dashboard_views",
                "get_automation",
                "get_helper",
                "create_automation",
            ]
        );
    }

    #[test]
    fn test_filter_skips_disabled_tools() {
        let filter = ToolFilter::all().with_exclude(["create_automation".to_string()]);
        let registry = registry_with(&filter, ValidationMode::Advisory);
        assert_eq!(registry.tool_count(), 5);
        assert!(!registry.contains("create_automation"));
    }

    #[test]
    fn test_registering_twice_is_rejected() {
        let backend = seeded_backend();
        let logger = Arc::new(NoOpLogger::new());
        let engine = Arc::new(QueryEngine::new(backend.clone(), logger.clone()));
        let mut registry = ToolRegistry::new(logger);

        let all = ToolFilter::all();
        register_builtin_tools(&mut registry, backend.clone(), engine.clone(), &all).unwrap();
        let err = register_builtin_tools(&mut registry, backend, engine, &all).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateTool("list_automations".to_string()));
    }

    #[test]
    fn test_unsupported_kinds_are_not_advertised() {
        let backend: Arc<dyn Backend> = Arc::new(
            RestBackend::new(RestBackendConfig::new("http://ha.local:8123", "token")).unwrap(),
        );
        let logger = Arc::new(NoOpLogger::new());
        let engine = Arc::new(QueryEngine::new(backend.clone(), logger.clone()));
        let mut registry = ToolRegistry::new(logger);

        register_builtin_tools(&mut registry, backend, engine, &ToolFilter::all()).unwrap();

        assert!(registry.contains("list_automations"));
        assert!(registry.contains("list_entities"));
        assert!(!registry.contains("list_dashboard_views"));
        assert_eq!(registry.tool_count(), 5);
    }

    #[tokio::test]
    async fn test_list_automations_compact() {
        let result = registry()
            .dispatch("list_automations", json!({ "state": "on" }))
            .await;

        assert!(!result.is_error);
        assert_eq!(result.content.len(), 2);
        assert_eq!(
            result.content[0].as_text(),
            format!("Found 1 automations\n{}", COMPACT_HINT)
        );
        let listed = records(result.content[1].as_text());
        assert_eq!(listed[0]["entity_id"], "automation.hall_lights");
        assert!(listed[0].get("config").is_none());
    }

    #[tokio::test]
    async fn test_list_automations_by_reference_verbose() {
        let result = registry()
            .dispatch(
                "list_automations",
                json!({ "references_entity": "person.alex", "verbose": true }),
            )
            .await;

        assert_eq!(result.content[0].as_text(), "Found 1 automations");
        let listed = records(result.content[1].as_text());
        assert_eq!(listed[0]["alias"], "Away Mode");
        assert_eq!(listed[0]["config"]["triggers"][0]["entity_id"], "person.alex");
    }

    #[tokio::test]
    async fn test_list_rejects_wrong_argument_type() {
        let result = registry()
            .dispatch("list_entities", json!({ "verbose": "yes" }))
            .await;
        assert!(result.is_error);
        assert_eq!(result.text(), "Argument 'verbose' must be a boolean");
    }

    #[tokio::test]
    async fn test_strict_mode_reports_schema_violation() {
        let registry = registry_with(&ToolFilter::all(), ValidationMode::Strict);
        let result = registry
            .dispatch("list_entities", json!({ "verbose": "yes" }))
            .await;
        assert!(result.is_error);
        assert!(result.text().starts_with("Invalid arguments for list_entities:"));
    }

    #[tokio::test]
    async fn test_list_dashboard_views_empty() {
        let result = registry().dispatch("list_dashboard_views", Value::Null).await;
        assert!(!result.is_error);
        assert!(result.content[0].as_text().starts_with("Found 0 views"));
        assert!(records(result.content[1].as_text()).is_empty());
    }

    #[tokio::test]
    async fn test_get_automation() {
        let registry = registry();
        let result = registry
            .dispatch("get_automation", json!({ "entity_id": "automation.hall_lights" }))
            .await;
        assert!(!result.is_error);
        let record: Value = serde_json::from_str(&result.text()).unwrap();
        assert_eq!(record["config_id"], "1700000000001");
        assert_eq!(record["config"]["actions"][0]["action"], "light.turn_on");

        let missing = registry
            .dispatch("get_automation", json!({ "entity_id": "automation.nope" }))
            .await;
        assert!(missing.is_error);
        assert_eq!(missing.text(), "automation not found: automation.nope");

        let empty = registry.dispatch("get_automation", json!({ "entity_id": "" })).await;
        assert_eq!(empty.text(), "Argument 'entity_id' must not be empty");
    }

    #[tokio::test]
    async fn test_get_automation_listing_failure() {
        let backend = seeded_backend();
        backend.fail_listing(RecordKind::Automation, "connection refused");
        let logger = Arc::new(NoOpLogger::new());
        let engine = Arc::new(QueryEngine::new(backend.clone(), logger.clone()));
        let mut registry = ToolRegistry::new(logger);
        register_builtin_tools(&mut registry, backend, engine, &ToolFilter::all()).unwrap();

        let result = registry
            .dispatch("get_automation", json!({ "entity_id": "automation.hall_lights" }))
            .await;
        assert!(result.is_error);
        assert_eq!(
            result.text(),
            "Error getting automation automation.hall_lights: connection refused"
        );
    }

    #[tokio::test]
    async fn test_get_helper() {
        let result = registry()
            .dispatch("get_helper", json!({ "helper_id": "input_boolean.guest_mode" }))
            .await;
        assert!(!result.is_error, "{}", result.text());

        let record: Value = serde_json::from_str(&result.text()).unwrap();
        assert_eq!(record["platform"], "input_boolean");
        assert_eq!(record["local_id"], "guest_mode");
        assert_eq!(record["config"]["icon"], "mdi:account");
    }

    #[tokio::test]
    async fn test_get_helper_rejects_non_helper() {
        let result = registry()
            .dispatch("get_helper", json!({ "helper_id": "light.hall" }))
            .await;
        assert!(result.is_error);
        assert_eq!(result.text(), "Unrecognized helper platform in 'light.hall'");
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let registry = registry();
        let created = registry
            .dispatch(
                "create_automation",
                json!({
                    "alias": "Porch Light",
                    "triggers": [{ "platform": "sun", "event": "sunset" }],
                    "actions": [{ "action": "light.turn_on", "target": { "entity_id": "light.porch" } }]
                }),
            )
            .await;
        assert!(!created.is_error, "{}", created.text());

        let listed = registry
            .dispatch("list_automations", json!({ "references_entity": "light.porch" }))
            .await;
        let found = records(listed.content[1].as_text());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["entity_id"], "automation.porch_light");
    }
}
