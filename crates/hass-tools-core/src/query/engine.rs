//! Fetch → filter → project pipeline shared by every list tool

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde_json::Value;

use super::filter::FilterCriteria;
use super::reference::record_references;
use crate::backend::{Backend, BackendError};
use crate::logging::Logger;
use crate::types::{CancellationToken, Record, RecordKind, ToolCallResult};
use crate::{log_debug, log_info, log_warn};

/// Default bound on concurrent per-record fetches
pub const DEFAULT_FETCH_CONCURRENCY: usize = 8;

/// Hint appended to compact summaries
pub const COMPACT_HINT: &str = "Use verbose=true to include the full configuration.";

/// Output shape of a list query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Projection {
    /// Identity and minimal display fields
    #[default]
    Compact,
    /// Full record including the config tree
    Verbose,
}

impl Projection {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Projection::Verbose
        } else {
            Projection::Compact
        }
    }
}

/// Errors that abort a query
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Error listing {}: {source}", .kind.plural())]
    Backend {
        kind: RecordKind,
        source: BackendError,
    },

    #[error("Error listing {}: request cancelled", .kind.plural())]
    Cancelled { kind: RecordKind },

    #[error("Error getting {kind} {id}: {source}")]
    Lookup {
        kind: RecordKind,
        id: String,
        source: BackendError,
    },

    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },
}

pub type QueryResult<T> = Result<T, QueryError>;

/// Projected records plus what is needed to summarise them
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub kind: RecordKind,
    pub projection: Projection,
    pub records: Vec<Value>,
}

impl QueryOutcome {
    pub fn count(&self) -> usize {
        self.records.len()
    }

    /// "Found N <kind>"
    pub fn summary(&self) -> String {
        format!("Found {} {}", self.count(), self.kind.plural())
    }

    /// Summary segment followed by the records as a JSON array
    ///
    /// An empty result still renders `[]`.
    pub fn into_tool_result(self) -> ToolCallResult {
        let mut header = self.summary();
        if self.projection == Projection::Compact {
            header.push('\n');
            header.push_str(COMPACT_HINT);
        }
        let body = serde_json::to_string_pretty(&self.records).unwrap_or_else(|_| "[]".to_string());
        ToolCallResult::success(header).with_text(body)
    }
}

/// A record after its config fetch was attempted
struct Loaded {
    record: Record,
    error: Option<String>,
}

impl Loaded {
    fn into_verbose(self, kind: RecordKind) -> Value {
        let mut out = self.record.verbose(kind);
        if let Some(error) = self.error {
            out.insert("config_error".to_string(), Value::String(error));
        }
        Value::Object(out)
    }
}

/// Runs list queries against a backend
///
/// Stateless between calls; one engine is shared by every list tool.
pub struct QueryEngine {
    backend: Arc<dyn Backend>,
    logger: Arc<dyn Logger>,
    fetch_concurrency: usize,
}

impl QueryEngine {
    pub fn new(backend: Arc<dyn Backend>, logger: Arc<dyn Logger>) -> Self {
        Self {
            backend,
            logger,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }

    /// Bound concurrent per-record fetches (minimum 1)
    pub fn with_fetch_concurrency(mut self, limit: usize) -> Self {
        self.fetch_concurrency = limit.max(1);
        self
    }

    /// List records of `kind` matching `criteria`
    ///
    /// Cheap summary filters run first; the entity-reference filter then
    /// loads configs only for the survivors. A candidate whose config cannot
    /// be loaded is dropped from a reference match, and in verbose output it
    /// keeps its summary fields plus a `config_error`.
    pub async fn list(
        &self,
        kind: RecordKind,
        criteria: &FilterCriteria,
        projection: Projection,
        cancel: &CancellationToken,
    ) -> QueryResult<QueryOutcome> {
        if cancel.is_cancelled() {
            return Err(QueryError::Cancelled { kind });
        }

        log_debug!(
            self.logger,
            "[QueryEngine] Listing {} from {} backend",
            kind.plural(),
            self.backend.name()
        );
        let all = self
            .backend
            .fetch_all(kind)
            .await
            .map_err(|source| QueryError::Backend { kind, source })?;
        let total = all.len();

        let mut candidates: Vec<Record> = all
            .into_iter()
            .filter(|record| criteria.matches_summary(record))
            .collect();

        if let Some(target) = &criteria.entity_reference {
            log_debug!(
                self.logger,
                "[QueryEngine] Loading {} {} configs to search for {}",
                candidates.len(),
                kind,
                target
            );
            candidates = self
                .load_configs(kind, candidates, cancel)
                .await?
                .into_iter()
                .filter(|loaded| {
                    loaded.error.is_none()
                        && loaded
                            .record
                            .config
                            .as_ref()
                            .is_some_and(|config| record_references(kind, config, target))
                })
                .map(|loaded| loaded.record)
                .collect();
        }

        let records: Vec<Value> = match projection {
            Projection::Compact => candidates
                .iter()
                .map(|record| Value::Object(record.compact(kind)))
                .collect(),
            Projection::Verbose => self
                .load_configs(kind, candidates, cancel)
                .await?
                .into_iter()
                .map(|loaded| loaded.into_verbose(kind))
                .collect(),
        };

        log_info!(
            self.logger,
            "[QueryEngine] {} of {} {} matched",
            records.len(),
            total,
            kind.plural()
        );

        Ok(QueryOutcome {
            kind,
            projection,
            records,
        })
    }

    /// Look up a single record by id, config included
    ///
    /// Unlike `list`, a failed config fetch is an error here.
    pub async fn get(
        &self,
        kind: RecordKind,
        id: &str,
        cancel: &CancellationToken,
    ) -> QueryResult<Value> {
        if cancel.is_cancelled() {
            return Err(QueryError::Lookup {
                kind,
                id: id.to_string(),
                source: BackendError::Other("request cancelled".to_string()),
            });
        }

        let mut record = self
            .backend
            .fetch_all(kind)
            .await
            .map_err(|source| QueryError::Lookup {
                kind,
                id: id.to_string(),
                source,
            })?
            .into_iter()
            .find(|record| record.id == id)
            .ok_or_else(|| QueryError::NotFound {
                kind,
                id: id.to_string(),
            })?;

        if record.config.is_none() {
            let full = self
                .backend
                .fetch_one(kind, record.lookup_key())
                .await
                .map_err(|source| QueryError::Lookup {
                    kind,
                    id: id.to_string(),
                    source,
                })?;
            record.config = full.config;
        }

        Ok(Value::Object(record.verbose(kind)))
    }

    /// Make sure every record carries its config, preserving input order
    async fn load_configs(
        &self,
        kind: RecordKind,
        records: Vec<Record>,
        cancel: &CancellationToken,
    ) -> QueryResult<Vec<Loaded>> {
        let stop = cancel.clone();
        let loaded: Vec<Loaded> = stream::iter(records)
            .map(|record| self.ensure_config(kind, record, cancel))
            .buffered(self.fetch_concurrency)
            .take_until(async move { stop.cancelled().await })
            .collect()
            .await;

        if cancel.is_cancelled() {
            log_warn!(
                self.logger,
                "[QueryEngine] Cancelled after loading {} {} configs",
                loaded.len(),
                kind
            );
            return Err(QueryError::Cancelled { kind });
        }
        Ok(loaded)
    }

    async fn ensure_config(
        &self,
        kind: RecordKind,
        mut record: Record,
        cancel: &CancellationToken,
    ) -> Loaded {
        if record.config.is_some() {
            return Loaded { record, error: None };
        }
        if cancel.is_cancelled() {
            return Loaded {
                record,
                error: Some("request cancelled".to_string()),
            };
        }

        match self.backend.fetch_one(kind, record.lookup_key()).await {
            Ok(full) => {
                record.config = full.config;
                Loaded { record, error: None }
            }
            Err(e) => {
                log_warn!(
                    self.logger,
                    "[QueryEngine] Failed to load {} {}: {}",
                    kind,
                    record.id,
                    e
                );
                Loaded {
                    record,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}
