//! Settings structure shared by the file loader and the CLI

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::env::{env_vars_for, EnvOverrides};
use super::{ConfigError, ConfigResult};
use crate::backend::RestBackendConfig;
use crate::query::DEFAULT_FETCH_CONCURRENCY;
use crate::tools::{ToolFilter, ValidationMode};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Top-level configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub query: QuerySettings,

    #[serde(default)]
    pub tools: ToolSettings,
}

/// Home Assistant connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL, e.g. `http://homeassistant.local:8123`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Long-lived access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySettings {
    /// Upper bound on concurrent per-record config fetches
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }
}

fn default_fetch_concurrency() -> usize {
    DEFAULT_FETCH_CONCURRENCY
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Tool names left out of the registry
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled: Vec<String>,

    #[serde(default)]
    pub validation: ValidationMode,
}

impl ToolsConfig {
    /// Overlay environment overrides on top of the file values
    pub fn apply_env(&mut self, overrides: EnvOverrides) {
        if overrides.url.is_some() {
            self.backend.url = overrides.url;
        }
        if overrides.token.is_some() {
            self.backend.token = overrides.token;
        }
    }

    /// Connection settings for the REST backend
    pub fn backend_settings(&self) -> ConfigResult<RestBackendConfig> {
        let url = required(self.backend.url.as_deref(), "url")?;
        let token = required(self.backend.token.as_deref(), "token")?;
        Ok(RestBackendConfig::new(url, token)
            .with_timeout(Duration::from_secs(self.backend.timeout_secs)))
    }

    /// Backend settings good enough to build tool definitions
    ///
    /// Unlike [`backend_settings`](Self::backend_settings) this never fails;
    /// a missing url or token is left empty since nothing is requested.
    pub fn discovery_settings(&self) -> RestBackendConfig {
        RestBackendConfig::new(
            self.backend.url.clone().unwrap_or_default(),
            self.backend.token.clone().unwrap_or_default(),
        )
        .with_timeout(Duration::from_secs(self.backend.timeout_secs))
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Filter that leaves out the disabled tools
    pub fn tool_filter(&self) -> ToolFilter {
        ToolFilter::all().with_exclude(self.tools.disabled.iter().cloned())
    }
}

fn required<'a>(value: Option<&'a str>, setting: &'static str) -> ConfigResult<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing {
            setting,
            env: env_vars_for(setting).join(" or "),
        }),
    }
}
