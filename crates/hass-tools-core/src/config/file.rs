//! YAML configuration file
//!
//! User-level config lives at `~/.config/hass-tools/config.yaml`
//! (platform config dir via `dirs`).

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use super::settings::ToolsConfig;
use super::ConfigResult;

/// Reads and writes [`ToolsConfig`] as YAML
///
/// # Example
///
/// ```no_run
/// use hass_tools_core::config::FileConfig;
///
/// let file = FileConfig::user();
/// let config = file.load().unwrap_or_default();
/// ```
pub struct FileConfig {
    path: PathBuf,
    cache: RwLock<Option<ToolsConfig>>,
}

impl FileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    /// User-level config file
    pub fn user() -> Self {
        let config_dir = dirs::config_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        });
        Self::new(config_dir.join("hass-tools").join("config.yaml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Cached config, loading it on first use
    ///
    /// A missing file yields the defaults.
    pub fn load(&self) -> ConfigResult<ToolsConfig> {
        if let Some(config) = self.cache.read().as_ref() {
            return Ok(config.clone());
        }
        self.reload()
    }

    /// Re-read the file, replacing the cache
    pub fn reload(&self) -> ConfigResult<ToolsConfig> {
        let config = if self.exists() {
            let content = fs::read_to_string(&self.path)?;
            if content.trim().is_empty() {
                ToolsConfig::default()
            } else {
                serde_yaml::from_str(&content)?
            }
        } else {
            ToolsConfig::default()
        };

        *self.cache.write() = Some(config.clone());
        Ok(config)
    }

    /// Write the config, creating parent directories as needed
    pub fn save(&self, config: &ToolsConfig) -> ConfigResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, serde_yaml::to_string(config)?)?;
        *self.cache.write() = Some(config.clone());
        Ok(())
    }

    /// Copy the current file next to itself as `config.yaml.backup`
    pub fn backup(&self) -> ConfigResult<Option<PathBuf>> {
        if !self.exists() {
            return Ok(None);
        }

        let backup_path = self.path.with_extension("yaml.backup");
        fs::copy(&self.path, &backup_path)?;
        Ok(Some(backup_path))
    }

    /// Back up the existing file, then save `config` in its place
    ///
    /// Returns the backup path when there was a file to back up.
    pub fn replace(&self, config: &ToolsConfig) -> ConfigResult<Option<PathBuf>> {
        let backup = self.backup()?;
        self.save(config)?;
        Ok(backup)
    }
}

impl std::fmt::Debug for FileConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfig")
            .field("path", &self.path)
            .field("exists", &self.exists())
            .finish()
    }
}
