//! Application configuration.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Directory under the platform config/data dirs used by the portal.
pub const APP_DIR: &str = "campus";
/// Name of the configuration file inside [`config_path`]'s directory.
pub const CONFIG_FILE: &str = "config.toml";
/// Durable key the current session is mirrored under.
pub const DEFAULT_SESSION_KEY: &str = "currentUser";

const DEFAULT_CONFIG: &str = r#"# Campus portal configuration.

# Key (file stem) the logged-in user is persisted under.
session_key = "currentUser"

# Artificial delays applied to simulated backend calls.
[latency]
auth_ms = 500
logout_ms = 300
action_ms = 500
dashboard_ms = 800
"#;

/// Simulated latency for each kind of backend call, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    /// Login and registration.
    pub auth_ms: u64,
    /// Logout.
    pub logout_ms: u64,
    /// Action relay calls.
    pub action_ms: u64,
    /// Dashboard dataset fetches.
    pub dashboard_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            auth_ms: 500,
            logout_ms: 300,
            action_ms: 500,
            dashboard_ms: 800,
        }
    }
}

impl LatencyConfig {
    /// No artificial delay anywhere.
    pub fn none() -> Self {
        Self {
            auth_ms: 0,
            logout_ms: 0,
            action_ms: 0,
            dashboard_ms: 0,
        }
    }

    pub(crate) fn auth(&self) -> Duration {
        Duration::from_millis(self.auth_ms)
    }

    pub(crate) fn logout(&self) -> Duration {
        Duration::from_millis(self.logout_ms)
    }

    pub(crate) fn action(&self) -> Duration {
        Duration::from_millis(self.action_ms)
    }

    pub(crate) fn dashboard(&self) -> Duration {
        Duration::from_millis(self.dashboard_ms)
    }
}

/// Runtime configuration for the portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the durable session mirror.
    pub data_dir: PathBuf,
    /// Key the current session is stored under.
    pub session_key: String,
    /// Simulated backend latency.
    pub latency: LatencyConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
            latency: LatencyConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default config file plus `CAMPUS__*` environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration from `path` (optional) plus environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("CAMPUS").separator("__"))
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("failed to parse configuration from {}", path.display()))
    }

    /// Configuration for tests and embedding: mirror under `data_dir`, no latency.
    pub fn ephemeral(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
            latency: LatencyConfig::none(),
        }
    }
}

/// Default location of the configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

/// Default directory for durable client state.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Write the default configuration file if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG).with_context(|| format!("failed to write {}", path.display()))
}
