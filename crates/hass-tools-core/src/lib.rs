//! Home Assistant tool core
//!
//! Runtime-agnostic tool registry and query engine for exposing a Home
//! Assistant instance to language-model clients. Hosts (the CLI, an MCP
//! server) build a registry once, then dispatch tool calls against it.
//!
//! ## Pipeline
//!
//! Every `list_*` tool runs the same steps: fetch summaries from the
//! backend, filter on state and name, resolve entity references against
//! lazily fetched configs, then project to compact or verbose output.
//!
//! ```rust,ignore
//! use hass_tools_core::{QueryEngine, RestBackend, ToolRegistry, register_builtin_tools};
//!
//! let backend: Arc<dyn Backend> = Arc::new(RestBackend::new(config.backend_settings()?)?);
//! let engine = Arc::new(QueryEngine::new(backend.clone(), logger.clone()));
//!
//! let mut registry = ToolRegistry::new(logger);
//! register_builtin_tools(&mut registry, backend, engine, &config.tool_filter())?;
//!
//! let result = registry.dispatch("list_automations", json!({ "state": "on" })).await;
//! ```

pub mod backend;
pub mod config;
pub mod identifiers;
pub mod logging;
pub mod mcp;
pub mod query;
pub mod schema;
pub mod tools;
pub mod types;

// Re-export commonly used types
pub use types::{
    CancellationToken, ContentSegment, Record, RecordKind, ToolArgs, ToolCallResult,
    ToolDefinition,
};

pub use schema::{SchemaKind, SchemaNode, SchemaViolation};

pub use identifiers::{parse_helper_id, slugify, HelperPlatform};

pub use logging::{ConsoleLogger, Logger, NoOpLogger};

pub use config::{ConfigError, ConfigResult, EnvOverrides, FileConfig, ToolsConfig};

pub use backend::{
    Backend, BackendError, BackendResult, MemoryBackend, RestBackend, RestBackendConfig,
};

pub use query::{FilterCriteria, Projection, QueryEngine, QueryError, QueryOutcome};

pub use tools::{
    register_builtin_tools, CallContext, RegistryError, ToolFilter, ToolHandler, ToolRegistry,
    ValidationMode,
};
