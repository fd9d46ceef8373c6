//! Configuration
//!
//! - `ToolsConfig`: backend, query and tool settings
//! - `FileConfig`: YAML file (`~/.config/hass-tools/config.yaml`)
//! - environment overrides for the backend URL and token

mod env;
mod file;
mod settings;

pub use env::{env_vars_for, EnvOverrides};
pub use file::FileConfig;
pub use settings::{BackendSettings, QuerySettings, ToolSettings, ToolsConfig};

/// Errors that can occur while loading or saving configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Missing setting '{setting}' (set it in the config file or via {env})")]
    Missing { setting: &'static str, env: String },

    #[error("{0}")]
    Other(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
