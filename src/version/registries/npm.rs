//! npm registry API implementation

use std::collections::HashMap;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::RegistrySettings;
use crate::version::compare::sort_versions_desc;
use crate::version::error::RegistryError;
use crate::version::registry::Registry;
use crate::version::types::PackageVersions;

/// Default base URL for npm registry
pub const DEFAULT_BASE_URL: &str = "https://registry.npmjs.org";

/// Response from npm registry API
///
/// Only the key set of `versions` is used; per-version metadata is ignored.
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    #[serde(default)]
    versions: Option<IndexMap<String, serde_json::Value>>,
    #[serde(default, rename = "dist-tags")]
    dist_tags: Option<HashMap<String, serde_json::Value>>,
}

/// Registry implementation for npm registry API
pub struct NpmRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl NpmRegistry {
    /// Creates a new NpmRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("npm-install-assistant/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a registry from configuration, applying the optional request timeout
    pub fn from_settings(settings: &RegistrySettings) -> Result<Self, RegistryError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("npm-install-assistant/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout_ms) = settings.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Encode package name for URL (handles scoped packages)
    fn encode_package_name(package_name: &str) -> String {
        if package_name.starts_with('@') {
            // Scoped package: @scope/name -> @scope%2Fname
            package_name.replace('/', "%2F")
        } else {
            package_name.to_string()
        }
    }
}

impl Default for NpmRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Registry for NpmRegistry {
    async fn fetch_all_versions(
        &self,
        package_name: &str,
    ) -> Result<PackageVersions, RegistryError> {
        let encoded_name = Self::encode_package_name(package_name);
        let url = format!("{}/{}", self.base_url, encoded_name);

        debug!("Fetching versions from {}", url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("npm registry returned status {}: {}", status, url);
            return Err(RegistryError::Status(status.as_u16()));
        }

        let package_info: NpmPackageResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse npm registry response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        let mut versions: Vec<String> = package_info
            .versions
            .map(|versions| versions.into_keys().collect())
            .unwrap_or_default();
        sort_versions_desc(&mut versions);

        let dist_tags = package_info
            .dist_tags
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(tag, version)| match version {
                serde_json::Value::String(version) => Some((tag, version)),
                _ => None,
            })
            .collect();

        debug!("Fetched {} versions for {}", versions.len(), package_name);
        Ok(PackageVersions::with_dist_tags(versions, dist_tags))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn fetch_all_versions_returns_versions_sorted_descending() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/react")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "name": "react",
                    "dist-tags": { "latest": "2.0.0", "next": "1.1.0-beta.1" },
                    "versions": {
                        "1.0.0": {},
                        "2.0.0": {},
                        "1.1.0-beta.1": {},
                        "1.10.0": {}
                    }
                }"#,
            )
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_all_versions("react").await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            result.versions,
            vec![
                "2.0.0".to_string(),
                "1.10.0".to_string(),
                "1.1.0-beta.1".to_string(),
                "1.0.0".to_string()
            ]
        );
        assert_eq!(result.latest_tag(), Some("2.0.0"));
    }

    #[tokio::test]
    async fn fetch_all_versions_returns_status_error_for_nonexistent_package() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/nonexistent-package")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Not found"}"#)
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_all_versions("nonexistent-package").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::Status(404))));
    }

    #[tokio::test]
    async fn fetch_all_versions_returns_status_error_for_server_error() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/react")
            .with_status(503)
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_all_versions("react").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::Status(503))));
    }

    #[tokio::test]
    async fn fetch_all_versions_handles_scoped_package() {
        let mut server = Server::new_async().await;

        // Scoped packages use URL encoding: @types/node -> @types%2Fnode
        let mock = server
            .mock("GET", "/@types%2Fnode")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "name": "@types/node",
                    "versions": {
                        "18.0.0": {},
                        "20.0.0": {}
                    }
                }"#,
            )
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_all_versions("@types/node").await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            result.versions,
            vec!["20.0.0".to_string(), "18.0.0".to_string()]
        );
    }

    #[tokio::test]
    async fn fetch_all_versions_returns_empty_for_package_without_versions() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/empty-package")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "name": "empty-package", "versions": {} }"#)
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_all_versions("empty-package").await.unwrap();

        mock.assert_async().await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn fetch_all_versions_returns_empty_when_versions_field_is_missing() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/unpublished")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "name": "unpublished", "time": {} }"#)
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_all_versions("unpublished").await.unwrap();

        mock.assert_async().await;
        assert!(result.is_empty());
        assert_eq!(result.latest_tag(), None);
    }

    #[tokio::test]
    async fn fetch_all_versions_returns_invalid_response_for_malformed_body() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/broken")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("not json")
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_all_versions("broken").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn fetch_all_versions_returns_network_error_when_registry_is_unreachable() {
        // Nothing listens on a port once its listener is dropped.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let registry = NpmRegistry::new(&format!("http://{}", addr));
        let result = registry.fetch_all_versions("react").await;

        assert!(matches!(result, Err(RegistryError::Network(_))));
    }

    #[tokio::test]
    async fn from_settings_uses_configured_base_url() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/lodash")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{ "versions": { "4.17.21": {} } }"#)
            .create_async()
            .await;

        let settings = RegistrySettings {
            base_url: format!("{}/", server.url()),
            timeout_ms: Some(5_000),
        };
        let registry = NpmRegistry::from_settings(&settings).unwrap();
        let result = registry.fetch_all_versions("lodash").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.versions, vec!["4.17.21".to_string()]);
    }
}
