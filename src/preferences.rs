//! Best-effort persistence of the user's sidebar preferences
//!
//! Every read and write goes through [`KeyValueStore`]; failures are logged
//! and swallowed so a broken store never blocks the sidebar.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::command::PackageManager;
use crate::config::{
    DEFAULT_MAX_VERSIONS, MAX_VERSIONS_LIMIT, MAX_VERSIONS_STORAGE_KEY, PKG_MANAGER_STORAGE_KEY,
    SHOW_BETA_STORAGE_KEY,
};
use crate::storage::KeyValueStore;

/// Preferences persisted across sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub package_manager: PackageManager,
    pub show_beta: bool,
    /// Always within `1..=MAX_VERSIONS_LIMIT`
    pub max_versions: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            package_manager: PackageManager::Npm,
            show_beta: false,
            max_versions: DEFAULT_MAX_VERSIONS,
        }
    }
}

/// Reads the leading integer of `input` the way `parseInt` does.
fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// Clamps a max-versions value into `1..=MAX_VERSIONS_LIMIT`.
pub fn clamp_max_versions(value: i64) -> u32 {
    value.clamp(1, i64::from(MAX_VERSIONS_LIMIT)) as u32
}

/// Interprets raw text typed into the max-versions field.
///
/// Non-numeric or non-positive input becomes 1; larger values are capped.
pub fn parse_max_versions_input(raw: &str) -> u32 {
    match parse_leading_int(raw) {
        Some(value) if value > 0 => clamp_max_versions(value),
        _ => 1,
    }
}

/// Preference accessors over a shared key-value store
#[derive(Clone)]
pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
}

impl PreferenceStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn read(&self, key: &str) -> Option<String> {
        self.store
            .get(key)
            .inspect_err(|e| warn!("Failed to read preference {}: {}", key, e))
            .ok()
            .flatten()
    }

    fn write(&self, key: &str, value: &str) {
        let _ = self
            .store
            .set(key, value)
            .inspect_err(|e| warn!("Failed to store preference {}: {}", key, e));
    }

    /// Loads all preferences, using defaults for anything absent, malformed
    /// or unreadable.
    pub fn load(&self) -> Preferences {
        let defaults = Preferences::default();

        let package_manager = self
            .read(PKG_MANAGER_STORAGE_KEY)
            .and_then(|value| value.parse::<PackageManager>().ok())
            .unwrap_or(defaults.package_manager);

        let show_beta = match self.read(SHOW_BETA_STORAGE_KEY).as_deref() {
            Some("true") => true,
            Some("false") => false,
            _ => defaults.show_beta,
        };

        let max_versions = self
            .read(MAX_VERSIONS_STORAGE_KEY)
            .and_then(|value| parse_leading_int(&value))
            .filter(|value| *value > 0)
            .map(clamp_max_versions)
            .unwrap_or(defaults.max_versions);

        let preferences = Preferences {
            package_manager,
            show_beta,
            max_versions,
        };
        debug!("Loaded preferences: {:?}", preferences);
        preferences
    }

    pub fn set_package_manager(&self, package_manager: PackageManager) {
        self.write(PKG_MANAGER_STORAGE_KEY, package_manager.as_str());
    }

    pub fn set_show_beta(&self, show_beta: bool) {
        self.write(SHOW_BETA_STORAGE_KEY, if show_beta { "true" } else { "false" });
    }

    pub fn set_max_versions(&self, max_versions: u32) {
        self.write(MAX_VERSIONS_STORAGE_KEY, &max_versions.to_string());
    }
}
