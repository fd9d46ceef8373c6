//! Tool registry: name → (definition, handler) table and dispatch
//!
//! The registry is filled once during startup, then shared read-only
//! (`Arc<ToolRegistry>`) across concurrent calls. Lookups take no locks.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::logging::Logger;
use crate::types::{CancellationToken, ToolArgs, ToolCallResult, ToolDefinition};
use crate::{log_debug, log_info, log_warn};

/// Per-call context handed to tool handlers
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    /// Cancelled by the caller to abandon the call
    pub cancel: CancellationToken,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel(cancel: CancellationToken) -> Self {
        Self { cancel }
    }
}

/// Implementation of one tool
///
/// Handlers validate their own arguments and report every failure as an
/// `is_error` result; they never return `Err` or panic on bad input.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, args: ToolArgs, ctx: CallContext) -> ToolCallResult;
}

/// Whether the registry checks arguments against the schema before dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Schemas only document; handlers do all checking
    #[default]
    Advisory,
    /// Schema violations are reported before the handler runs
    Strict,
}

/// Errors raised while building a registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    #[error("Tool name must not be empty")]
    EmptyName,
}

/// Filter deciding which tools a registry exposes
#[derive(Debug, Clone, Default)]
pub struct ToolFilter {
    /// If set, only include tools with these names
    pub include: Option<HashSet<String>>,
    /// Exclude tools with these names
    pub exclude: HashSet<String>,
}

impl ToolFilter {
    /// Include all tools
    pub fn all() -> Self {
        Self::default()
    }

    /// Include only specific tools
    pub fn with_include(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.include = Some(names.into_iter().collect());
        self
    }

    /// Exclude specific tools
    pub fn with_exclude(mut self, names: impl IntoIterator<Item = String>) -> Self {
        self.exclude = names.into_iter().collect();
        self
    }

    /// Check if a tool name passes this filter
    pub fn matches(&self, name: &str) -> bool {
        if self.exclude.contains(name) {
            return false;
        }

        match self.include {
            Some(ref include) => include.contains(name),
            None => true,
        }
    }
}

struct RegisteredTool {
    definition: ToolDefinition,
    handler: Arc<dyn ToolHandler>,
}

/// Registry of available tools
pub struct ToolRegistry {
    /// Tools in registration order
    tools: Vec<RegisteredTool>,
    /// Name → position in `tools`
    index: HashMap<String, usize>,
    validation: ValidationMode,
    logger: Arc<dyn Logger>,
}

impl ToolRegistry {
    /// Create an empty registry with advisory schemas
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
            validation: ValidationMode::Advisory,
            logger,
        }
    }

    /// Set the validation mode
    pub fn with_validation(mut self, mode: ValidationMode) -> Self {
        self.validation = mode;
        self
    }

    pub fn validation(&self) -> ValidationMode {
        self.validation
    }

    /// Register a tool
    ///
    /// A second registration under the same name is rejected rather than
    /// replacing the first.
    pub fn register(
        &mut self,
        definition: ToolDefinition,
        handler: impl ToolHandler + 'static,
    ) -> Result<(), RegistryError> {
        self.register_shared(definition, Arc::new(handler))
    }

    /// Register a tool whose handler is already shared
    pub fn register_shared(
        &mut self,
        definition: ToolDefinition,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), RegistryError> {
        if definition.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.index.contains_key(&definition.name) {
            return Err(RegistryError::DuplicateTool(definition.name));
        }

        log_debug!(self.logger, "[ToolRegistry] Registered tool: {}", definition.name);
        self.index.insert(definition.name.clone(), self.tools.len());
        self.tools.push(RegisteredTool { definition, handler });
        Ok(())
    }

    /// All tool definitions in registration order
    pub fn list(&self) -> Vec<&ToolDefinition> {
        self.tools.iter().map(|t| &t.definition).collect()
    }

    /// Look up one definition
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&i| &self.tools[i].definition)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Get count of registered tools
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Invoke a tool by name
    pub async fn dispatch(&self, name: &str, args: Value) -> ToolCallResult {
        self.dispatch_with(name, args, CallContext::new()).await
    }

    /// Invoke a tool by name with an explicit call context
    ///
    /// Unknown tools and malformed arguments come back as `is_error`
    /// results, the same shape handlers use for their own failures.
    pub async fn dispatch_with(&self, name: &str, args: Value, ctx: CallContext) -> ToolCallResult {
        let Some(&position) = self.index.get(name) else {
            log_warn!(self.logger, "[ToolRegistry] Unknown tool: {}", name);
            return ToolCallResult::error(format!("Unknown tool: {}", name));
        };
        let tool = &self.tools[position];

        let args = match args {
            Value::Object(map) => map,
            Value::Null => ToolArgs::new(),
            other => {
                return ToolCallResult::error(format!(
                    "Arguments for {} must be an object, got {}",
                    name, other
                ))
            }
        };

        if self.validation == ValidationMode::Strict {
            let candidate = Value::Object(args.clone());
            if let Err(violations) = tool.definition.input_schema.validate(&candidate) {
                let details = violations
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                return ToolCallResult::error(format!(
                    "Invalid arguments for {}: {}",
                    name, details
                ));
            }
        }

        self.invoke(tool, args, ctx).await
    }

    async fn invoke(
        &self,
        tool: &RegisteredTool,
        args: ToolArgs,
        ctx: CallContext,
    ) -> ToolCallResult {
        log_info!(self.logger, "[ToolRegistry] Calling tool: {}", tool.definition.name);
        let result = tool.handler.call(args, ctx).await;
        if result.is_error {
            log_warn!(
                self.logger,
                "[ToolRegistry] Tool {} failed: {}",
                tool.definition.name,
                result.text()
            );
        }
        result
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.iter().map(|t| &t.definition.name).collect::<Vec<_>>())
            .field("validation", &self.validation)
            .finish()
    }
}
