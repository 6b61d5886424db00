use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::version::registries::npm::DEFAULT_BASE_URL;

// =============================================================================
// Sidebar constants
// =============================================================================

/// Number of versions listed when no preference is stored
pub const DEFAULT_MAX_VERSIONS: u32 = 10;

/// Upper bound accepted for the max-versions preference
pub const MAX_VERSIONS_LIMIT: u32 = 99;

/// How long the "copied" feedback stays visible after a copy (1.5 seconds)
pub const COPY_FEEDBACK_MS: u64 = 1_500;

/// Selection token meaning "no explicit version"
pub const LATEST: &str = "latest";

// =============================================================================
// Preference store keys
// =============================================================================

pub const PKG_MANAGER_STORAGE_KEY: &str = "nia_package_manager";
pub const SHOW_BETA_STORAGE_KEY: &str = "nia_show_beta";
pub const MAX_VERSIONS_STORAGE_KEY: &str = "nia_max_versions";

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "NIA_LOG";

/// Assistant configuration, read from `config.json` in the data directory
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AssistantConfig {
    pub registry: RegistrySettings,
    pub log: LogSettings,
}

/// Registry-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistrySettings {
    /// Base URL of the npm registry
    pub base_url: String,
    /// Request timeout in milliseconds; no timeout when unset
    pub timeout_ms: Option<u64>,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LogSettings {
    /// Write log lines as JSON objects
    pub json: bool,
}

impl AssistantConfig {
    /// Loads the configuration file, falling back to defaults when the file
    /// is missing or cannot be parsed.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!("Failed to read config {:?}: {}", path, e);
                return Self::default();
            }
        };

        serde_json::from_str(&content)
            .inspect_err(|e| warn!("Ignoring malformed config {:?}: {}", path, e))
            .unwrap_or_default()
    }
}

/// Returns the path to the data directory for npm-install-assistant.
/// Uses $XDG_DATA_HOME/npm-install-assistant if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/npm-install-assistant,
/// or ./npm-install-assistant if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the preference database.
pub fn preferences_db_path() -> PathBuf {
    data_dir().join("preferences.db")
}

/// Returns the path to the configuration file.
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("npm-install-assistant.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("npm-install-assistant")
}
