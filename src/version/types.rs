//! Common types for the version layer

use std::collections::HashMap;

/// Versions published for a single package, as returned by one registry query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageVersions {
    /// Version strings, highest first
    pub versions: Vec<String>,
    /// Dist tags (e.g. `latest` -> `18.3.1`)
    pub dist_tags: HashMap<String, String>,
}

impl PackageVersions {
    pub fn new(versions: Vec<String>) -> Self {
        Self {
            versions,
            dist_tags: HashMap::new(),
        }
    }

    pub fn with_dist_tags(versions: Vec<String>, dist_tags: HashMap<String, String>) -> Self {
        Self {
            versions,
            dist_tags,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Version the `latest` dist tag points at, if the registry published one
    pub fn latest_tag(&self) -> Option<&str> {
        self.dist_tags.get("latest").map(String::as_str)
    }
}
