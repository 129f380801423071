//! Configuration loading and management
//!
//! The storage root comes from `--config-path` / `TAU_CONFIG_PATH`, falling
//! back to the platform config directory (`~/.config/tau/` on Linux). Inside
//! the root, an optional `tau.toml` holds user settings.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;

/// Name of the settings file inside the storage root
pub const CONFIG_FILE: &str = "tau.toml";

/// Environment variable selecting the storage root
pub const CONFIG_PATH_ENV: &str = "TAU_CONFIG_PATH";

const APP_DIR: &str = "tau";
const MAX_LOCK_TIMEOUT_MS: u64 = 600_000;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
}

/// `[settings]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Editor command for descriptions and comments; `$VISUAL`/`$EDITOR` otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Default comment author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// How long to wait for a month bucket lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            editor: None,
            author: None,
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a `tau.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `tau.toml` from the storage root, or return defaults
    pub fn load_from_root(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        self.settings.validate()
    }
}

impl Settings {
    fn validate(&self) -> Result<()> {
        if self.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "settings.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        if self.lock_timeout_ms > MAX_LOCK_TIMEOUT_MS {
            return Err(Error::InvalidConfig(format!(
                "settings.lock_timeout_ms must be <= {MAX_LOCK_TIMEOUT_MS}"
            )));
        }
        if matches!(self.editor.as_deref(), Some(editor) if editor.trim().is_empty()) {
            return Err(Error::InvalidConfig(
                "settings.editor cannot be empty".to_string(),
            ));
        }
        if matches!(self.author.as_deref(), Some(author) if author.trim().is_empty()) {
            return Err(Error::InvalidConfig(
                "settings.author cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolve the storage root from an explicit path or the platform default.
pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(expand_home(path));
    }
    let dirs = BaseDirs::new().ok_or_else(|| {
        Error::InvalidConfig(format!(
            "cannot determine a config directory; set {CONFIG_PATH_ENV}"
        ))
    })?;
    Ok(dirs.config_dir().join(APP_DIR))
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(rest),
        None => path.to_path_buf(),
    }
}
