//! `list_automations`, `list_entities`, `list_dashboard_views`

use std::sync::Arc;

use async_trait::async_trait;

use crate::query::{FilterCriteria, Projection, QueryEngine};
use crate::schema::SchemaNode;
use crate::tools::args::{optional_bool, optional_str, ArgResult};
use crate::tools::registry::{CallContext, ToolHandler};
use crate::types::{RecordKind, ToolArgs, ToolCallResult, ToolDefinition};

/// List tool over one record kind, backed by the shared query engine
pub struct ListRecordsTool {
    engine: Arc<QueryEngine>,
    kind: RecordKind,
}

impl ListRecordsTool {
    pub fn new(engine: Arc<QueryEngine>, kind: RecordKind) -> Self {
        Self { engine, kind }
    }

    pub fn tool_name(kind: RecordKind) -> &'static str {
        match kind {
            RecordKind::Automation => "list_automations",
            RecordKind::Entity => "list_entities",
            RecordKind::DashboardView => "list_dashboard_views",
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        let (description, name_hint) = match self.kind {
            RecordKind::Automation => (
                "List automations with their state and last trigger time. \
                 Filter by state, alias substring or a referenced entity.",
                "Case-insensitive substring of the automation alias",
            ),
            RecordKind::Entity => (
                "List entities with their state and friendly name. \
                 Filter by state, name substring or an entity referenced in their attributes.",
                "Case-insensitive substring of the friendly name",
            ),
            RecordKind::DashboardView => (
                "List dashboard views. Filter by title substring or an entity used by their cards.",
                "Case-insensitive substring of the view title",
            ),
        };

        ToolDefinition::new(Self::tool_name(self.kind), description).with_schema(
            SchemaNode::object()
                .property(
                    "state",
                    SchemaNode::string()
                        .with_description("Only include records in this exact state"),
                )
                .property("alias_contains", SchemaNode::string().with_description(name_hint))
                .property(
                    "references_entity",
                    SchemaNode::string()
                        .with_description("Only include records whose config uses this entity id"),
                )
                .property(
                    "verbose",
                    SchemaNode::boolean()
                        .with_description("Include the full config of each record (default false)"),
                ),
        )
    }

    fn parse(args: &ToolArgs) -> ArgResult<(FilterCriteria, Projection)> {
        let mut criteria = FilterCriteria::new();
        if let Some(state) = optional_str(args, "state")? {
            criteria = criteria.with_state(state);
        }
        if let Some(fragment) = optional_str(args, "alias_contains")? {
            criteria = criteria.with_alias_contains(fragment);
        }
        if let Some(entity_id) = optional_str(args, "references_entity")? {
            criteria = criteria.with_entity_reference(entity_id);
        }
        let verbose = optional_bool(args, "verbose")?.unwrap_or(false);
        Ok((criteria, Projection::from_verbose(verbose)))
    }
}

#[async_trait]
impl ToolHandler for ListRecordsTool {
    async fn call(&self, args: ToolArgs, ctx: CallContext) -> ToolCallResult {
        let (criteria, projection) = match Self::parse(&args) {
            Ok(parsed) => parsed,
            Err(e) => return e.into(),
        };

        match self.engine.list(self.kind, &criteria, projection, &ctx.cancel).await {
            Ok(outcome) => outcome.into_tool_result(),
            Err(e) => ToolCallResult::error(e.to_string()),
        }
    }
}
