//! Home Assistant REST API backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

use super::traits::{Backend, BackendError, BackendResult};
use crate::types::{Record, RecordKind};
use crate::{debug_log, error_log, trace_log};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const AUTOMATION_PREFIX: &str = "automation.";

/// Connection settings for [`RestBackend`]
#[derive(Debug, Clone)]
pub struct RestBackendConfig {
    /// Base URL, e.g. `http://homeassistant.local:8123`
    pub base_url: String,
    /// Long-lived access token
    pub token: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl RestBackendConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Backend that talks to a Home Assistant instance over its REST API
///
/// Automations and entities come from `/api/states`; automation configs
/// from `/api/config/automation/config/{id}`. Dashboard views are only
/// exposed over the websocket API and report `Unsupported` here.
pub struct RestBackend {
    config: RestBackendConfig,
    client: Client,
}

impl RestBackend {
    pub fn new(config: RestBackendConfig) -> BackendResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn get_json(&self, path: &str) -> BackendResult<Option<Value>> {
        let url = self.url(path);
        debug_log!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.token)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body: Value = check_status(response).await?.json().await?;
        trace_log!("GET {} -> {}", url, body);
        Ok(Some(body))
    }

    async fn post_json(&self, path: &str, body: &Value) -> BackendResult<()> {
        let url = self.url(path);
        debug_log!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.token)
            .json(body)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn states(&self) -> BackendResult<Vec<Value>> {
        match self.get_json("/api/states").await? {
            Some(Value::Array(states)) => Ok(states),
            Some(other) => Err(BackendError::Other(format!(
                "expected a list of states, got {}",
                other
            ))),
            None => Err(BackendError::api(404, "/api/states not found")),
        }
    }
}

async fn check_status(response: Response) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    error_log!("request failed ({}): {}", status, message);
    Err(BackendError::api(status.as_u16(), message))
}

fn views_unsupported() -> BackendError {
    BackendError::Unsupported(
        "dashboard views are only available over the websocket API".to_string(),
    )
}

/// Build a summary record from one `/api/states` entry
pub(crate) fn record_from_state(kind: RecordKind, state: &Value) -> Option<Record> {
    let entity_id = state.get("entity_id")?.as_str()?;
    let attributes = state.get("attributes");
    let attribute = |key: &str| {
        attributes
            .and_then(|a| a.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    let mut record = Record::new(entity_id)
        .with_state(state.get("state").and_then(Value::as_str).unwrap_or_default())
        .with_display_name(attribute("friendly_name").unwrap_or_default());

    match kind {
        RecordKind::Automation => {
            record.last_triggered = attribute("last_triggered");
            record.config_key = attribute("id");
        }
        RecordKind::Entity | RecordKind::DashboardView => {
            record.last_changed = state
                .get("last_changed")
                .and_then(Value::as_str)
                .map(str::to_string);
        }
    }
    Some(record)
}

#[async_trait]
impl Backend for RestBackend {
    fn name(&self) -> &str {
        "rest"
    }

    fn supports(&self, kind: RecordKind) -> bool {
        kind != RecordKind::DashboardView
    }

    async fn fetch_all(&self, kind: RecordKind) -> BackendResult<Vec<Record>> {
        let states = match kind {
            RecordKind::DashboardView => return Err(views_unsupported()),
            _ => self.states().await?,
        };

        Ok(states
            .iter()
            .filter(|state| {
                kind != RecordKind::Automation
                    || state
                        .get("entity_id")
                        .and_then(Value::as_str)
                        .is_some_and(|id| id.starts_with(AUTOMATION_PREFIX))
            })
            .filter_map(|state| record_from_state(kind, state))
            .collect())
    }

    async fn fetch_one(&self, kind: RecordKind, key: &str) -> BackendResult<Record> {
        match kind {
            RecordKind::Automation => {
                let config = self
                    .get_json(&format!("/api/config/automation/config/{}", key))
                    .await?
                    .ok_or_else(|| BackendError::not_found(kind, key))?;
                let alias = config.get("alias").and_then(Value::as_str).unwrap_or_default();
                Ok(Record::new(format!("{}{}", AUTOMATION_PREFIX, key))
                    .with_display_name(alias)
                    .with_config_key(key)
                    .with_config(config))
            }
            RecordKind::Entity => {
                let state = self
                    .get_json(&format!("/api/states/{}", key))
                    .await?
                    .ok_or_else(|| BackendError::not_found(kind, key))?;
                let mut record = record_from_state(kind, &state)
                    .ok_or_else(|| BackendError::Other(format!("malformed state for {}", key)))?;
                record.config = state.get("attributes").cloned();
                Ok(record)
            }
            RecordKind::DashboardView => Err(views_unsupported()),
        }
    }

    async fn save_config(&self, kind: RecordKind, key: &str, config: &Value) -> BackendResult<()> {
        match kind {
            RecordKind::Automation => {
                self.post_json(&format!("/api/config/automation/config/{}", key), config)
                    .await
            }
            _ => Err(BackendError::Unsupported(format!(
                "saving {} config over REST",
                kind
            ))),
        }
    }
}

impl std::fmt::Debug for RestBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestBackend")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}
