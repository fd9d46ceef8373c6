//! In-memory backend

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use super::traits::{Backend, BackendError, BackendResult};
use crate::types::{CancellationToken, Record, RecordKind};

/// In-memory backend for tests and demos
///
/// `fetch_all` returns summaries with the config stripped, so the query
/// engine has to go through `fetch_one` for config trees exactly as it does
/// against a live server.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: RwLock<HashMap<RecordKind, Vec<Record>>>,
    failing_lists: RwLock<HashMap<RecordKind, String>>,
    failing_keys: RwLock<HashSet<(RecordKind, String)>>,
    cancel_on_fetch: RwLock<Option<CancellationToken>>,
    fetch_one_calls: AtomicUsize,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend holding `records` of one kind
    pub fn with_records(kind: RecordKind, records: Vec<Record>) -> Self {
        let backend = Self::new();
        backend.set_records(kind, records);
        backend
    }

    /// Replace all records of a kind
    pub fn set_records(&self, kind: RecordKind, records: Vec<Record>) {
        self.records.write().insert(kind, records);
    }

    /// Add one record
    pub fn insert(&self, kind: RecordKind, record: Record) {
        self.records.write().entry(kind).or_default().push(record);
    }

    /// Make `fetch_all(kind)` fail with `message`
    pub fn fail_listing(&self, kind: RecordKind, message: impl Into<String>) {
        self.failing_lists.write().insert(kind, message.into());
    }

    /// Make `fetch_one(kind, key)` fail
    pub fn fail_fetch(&self, kind: RecordKind, key: impl Into<String>) {
        self.failing_keys.write().insert((kind, key.into()));
    }

    /// Cancel `token` from inside the next `fetch_one`
    pub fn cancel_on_fetch(&self, token: CancellationToken) {
        *self.cancel_on_fetch.write() = Some(token);
    }

    /// Number of `fetch_one` calls served so far
    pub fn fetch_one_calls(&self) -> usize {
        self.fetch_one_calls.load(Ordering::SeqCst)
    }

    /// Stored config for a record, if any
    pub fn config_of(&self, kind: RecordKind, key: &str) -> Option<Value> {
        self.records
            .read()
            .get(&kind)
            .and_then(|records| records.iter().find(|r| r.lookup_key() == key))
            .and_then(|r| r.config.clone())
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_all(&self, kind: RecordKind) -> BackendResult<Vec<Record>> {
        if let Some(message) = self.failing_lists.read().get(&kind) {
            return Err(BackendError::Other(message.clone()));
        }

        Ok(self
            .records
            .read()
            .get(&kind)
            .map(|records| records.iter().map(Record::summary).collect())
            .unwrap_or_default())
    }

    async fn fetch_one(&self, kind: RecordKind, key: &str) -> BackendResult<Record> {
        self.fetch_one_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(token) = self.cancel_on_fetch.read().as_ref() {
            token.cancel();
        }

        if self.failing_keys.read().contains(&(kind, key.to_string())) {
            return Err(BackendError::Other(format!("failed to load {} {}", kind, key)));
        }

        self.records
            .read()
            .get(&kind)
            .and_then(|records| records.iter().find(|r| r.lookup_key() == key))
            .cloned()
            .ok_or_else(|| BackendError::not_found(kind, key))
    }

    async fn save_config(&self, kind: RecordKind, key: &str, config: &Value) -> BackendResult<()> {
        let mut guard = self.records.write();
        let records = guard.entry(kind).or_default();

        if let Some(existing) = records.iter_mut().find(|r| r.lookup_key() == key) {
            existing.config = Some(config.clone());
            return Ok(());
        }

        let record = match kind {
            RecordKind::Automation => Record::new(format!("automation.{}", key))
                .with_state("on")
                .with_display_name(config.get("alias").and_then(Value::as_str).unwrap_or_default())
                .with_config_key(key),
            RecordKind::Entity | RecordKind::DashboardView => Record::new(key),
        };
        records.push(record.with_config(config.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_all_strips_config() {
        let backend = MemoryBackend::with_records(
            RecordKind::Entity,
            vec![Record::new("light.kitchen").with_config(json!({ "brightness": 3 }))],
        );

        let summaries = backend.fetch_all(RecordKind::Entity).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].config.is_none());

        let full = backend.fetch_one(RecordKind::Entity, "light.kitchen").await.unwrap();
        assert_eq!(full.config, Some(json!({ "brightness": 3 })));
        assert_eq!(backend.fetch_one_calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_kind_is_empty() {
        let backend = MemoryBackend::new();
        assert!(backend.fetch_all(RecordKind::DashboardView).await.unwrap().is_empty());
        assert!(matches!(
            backend.fetch_one(RecordKind::DashboardView, "home").await,
            Err(BackendError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let backend = MemoryBackend::new();
        backend.insert(RecordKind::Automation, Record::new("automation.a"));
        backend.fail_fetch(RecordKind::Automation, "automation.a");
        backend.fail_listing(RecordKind::Entity, "connection refused");

        assert!(backend.fetch_one(RecordKind::Automation, "automation.a").await.is_err());
        let err = backend.fetch_all(RecordKind::Entity).await.unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
    }

    #[tokio::test]
    async fn test_save_config_creates_automation() {
        let backend = MemoryBackend::new();
        let config = json!({ "id": "night_mode", "alias": "Night Mode" });

        backend
            .save_config(RecordKind::Automation, "night_mode", &config)
            .await
            .unwrap();

        let summaries = backend.fetch_all(RecordKind::Automation).await.unwrap();
        assert_eq!(summaries[0].id, "automation.night_mode");
        assert_eq!(summaries[0].display_name, "Night Mode");
        assert_eq!(backend.config_of(RecordKind::Automation, "night_mode"), Some(config));
    }
}
