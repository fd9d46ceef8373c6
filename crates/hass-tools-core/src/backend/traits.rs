//! Backend collaborator trait

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{Record, RecordKind};

/// Source of automations, entities and dashboard views
///
/// Implementations:
/// - `MemoryBackend`: In-memory store for tests and demos
/// - `RestBackend`: Home Assistant REST API
///
/// The backend owns timeouts and retries; the query engine never retries.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Short name for log lines (e.g. "memory", "rest")
    fn name(&self) -> &str;

    /// Whether this backend can serve records of `kind` at all
    fn supports(&self, _kind: RecordKind) -> bool {
        true
    }

    /// Fetch summaries of every record of a kind
    ///
    /// Summaries may leave `Record::config` unset.
    async fn fetch_all(&self, kind: RecordKind) -> BackendResult<Vec<Record>>;

    /// Fetch one record including its config tree
    async fn fetch_one(&self, kind: RecordKind, key: &str) -> BackendResult<Record>;

    /// Create or replace the config stored under `key`
    async fn save_config(&self, kind: RecordKind, key: &str, config: &Value) -> BackendResult<()>;
}

/// Errors that can occur while talking to the backend
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("{kind} not found: {key}")]
    NotFound { kind: RecordKind, key: String },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("{0}")]
    Other(String),
}

impl BackendError {
    pub fn not_found(kind: RecordKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;
