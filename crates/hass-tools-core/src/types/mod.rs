//! Core types shared across the registry, query engine and backends

mod cancellation;
mod record;
mod tool;

pub use cancellation::CancellationToken;
pub use record::{Record, RecordKind};
pub use tool::{ContentSegment, ToolArgs, ToolCallResult, ToolDefinition};
