//! Registry and sidebar test utilities

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use npm_install_assistant::preferences::PreferenceStore;
use npm_install_assistant::sidebar::Sidebar;
use npm_install_assistant::sidebar::clipboard::{Clipboard, ClipboardError};
use npm_install_assistant::storage::{KeyValueStore, MemoryStore};
use npm_install_assistant::version::error::RegistryError;
use npm_install_assistant::version::registry::Registry;
use npm_install_assistant::version::types::PackageVersions;

/// Mock registry for testing
#[derive(Default)]
pub struct MockRegistry {
    versions: HashMap<String, Vec<String>>,
    statuses: HashMap<String, u16>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_versions(mut self, package: &str, versions: Vec<&str>) -> Self {
        self.versions.insert(
            package.to_string(),
            versions.into_iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    pub fn with_status(mut self, package: &str, status: u16) -> Self {
        self.statuses.insert(package.to_string(), status);
        self
    }
}

#[async_trait]
impl Registry for MockRegistry {
    async fn fetch_all_versions(
        &self,
        package_name: &str,
    ) -> Result<PackageVersions, RegistryError> {
        if let Some(status) = self.statuses.get(package_name) {
            return Err(RegistryError::Status(*status));
        }
        match self.versions.get(package_name) {
            Some(versions) => Ok(PackageVersions::new(versions.clone())),
            None => Err(RegistryError::Status(404)),
        }
    }
}

/// Registry whose requests never complete
pub struct PendingRegistry;

#[async_trait]
impl Registry for PendingRegistry {
    async fn fetch_all_versions(
        &self,
        _package_name: &str,
    ) -> Result<PackageVersions, RegistryError> {
        std::future::pending().await
    }
}

/// Clipboard remembering everything written to it
#[derive(Default)]
pub struct RecordingClipboard {
    pub copied: Mutex<Vec<String>>,
}

impl RecordingClipboard {
    pub fn contents(&self) -> Vec<String> {
        self.copied.lock().unwrap().clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// The npm registry response used throughout the sidebar tests
pub fn react_registry() -> MockRegistry {
    MockRegistry::new().with_versions("react", vec!["2.0.0", "1.1.0-beta.1", "1.0.0"])
}

/// Create a sidebar backed by the given registry and an empty preference store
pub fn create_test_sidebar(registry: impl Registry + 'static) -> (Sidebar, Arc<RecordingClipboard>) {
    create_test_sidebar_with_store(registry, Arc::new(MemoryStore::new()))
}

pub fn create_test_sidebar_with_store(
    registry: impl Registry + 'static,
    store: Arc<dyn KeyValueStore>,
) -> (Sidebar, Arc<RecordingClipboard>) {
    let clipboard = Arc::new(RecordingClipboard::default());
    let sidebar = Sidebar::new(
        Arc::new(registry),
        PreferenceStore::new(store),
        clipboard.clone(),
    );
    (sidebar, clipboard)
}
