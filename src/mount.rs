//! Mounting the sidebar into a host page as navigation happens
//!
//! The host announces every navigation by calling
//! [`MountController::on_navigation`] with the new location. The controller
//! derives the package name from it and keeps at most one sidebar container
//! mounted, replacing it when the package changes.

use reqwest::Url;
use tracing::{debug, info};

/// Returns the package name for a package page path.
///
/// Accepts `/package/<name>` and `/package/@<scope>/<name>`, optionally
/// followed by further segments.
pub fn package_name_from_path(path: &str) -> Option<String> {
    let mut parts = path.split('/').filter(|part| !part.is_empty());

    if parts.next()? != "package" {
        return None;
    }

    let first = parts.next()?;
    if first.starts_with('@') {
        let name = parts.next()?;
        return Some(format!("{first}/{name}"));
    }

    Some(first.to_string())
}

/// Returns the package name for an absolute URL or a bare path.
pub fn package_name_from_location(location: &str) -> Option<String> {
    let location = location.trim();
    match Url::parse(location) {
        Ok(url) => package_name_from_path(url.path()),
        Err(_) => {
            let path = location
                .split(['?', '#'])
                .next()
                .unwrap_or(location);
            package_name_from_path(path)
        }
    }
}

/// Turns a command-line target into a package page location.
///
/// Package page URLs and paths are kept as they are. Any other absolute URL
/// yields `None`; everything else is taken as a bare package name.
pub fn location_for_target(target: &str) -> Option<String> {
    let target = target.trim();
    if package_name_from_location(target).is_some() {
        return Some(target.to_string());
    }
    if Url::parse(target).is_ok() {
        return None;
    }

    let location = format!("/package/{}", target.trim_start_matches('/'));
    package_name_from_path(&location).map(|_| location)
}

/// Where a new container ended up in the sidebar region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Directly after the known marker element
    AfterMarker,
    /// At the end of the sidebar region (marker missing)
    Appended,
}

/// Page the sidebar is mounted into
pub trait MountHost {
    /// Handle of an inserted container
    type Container;

    /// Inserts a container for `package_name` into the sidebar region.
    ///
    /// Returns `None` when the page has no sidebar region.
    fn insert_container(&mut self, package_name: &str) -> Option<(Self::Container, Placement)>;

    /// Whether the page has a sidebar region at all
    fn has_sidebar_region(&self) -> bool;

    /// Whether `container` is still part of the page
    fn is_attached(&self, container: &Self::Container) -> bool;

    fn remove_container(&mut self, container: Self::Container);
}

/// Result of handling one navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountOutcome {
    /// The location is not a package page; nothing changed
    NotPackagePage,
    /// The page has no sidebar region yet; nothing changed
    NoSidebarRegion,
    /// The sidebar for this package is already mounted
    Unchanged,
    /// A sidebar was mounted, replacing the one for `replaced` if any
    Mounted {
        package_name: String,
        placement: Placement,
        replaced: Option<String>,
    },
}

struct MountedSidebar<C> {
    container: C,
    package_name: String,
}

/// Tracks the currently mounted sidebar container
pub struct MountController<C> {
    mounted: Option<MountedSidebar<C>>,
}

impl<C> Default for MountController<C> {
    fn default() -> Self {
        Self { mounted: None }
    }
}

impl<C> MountController<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Package of the mounted sidebar, if any
    pub fn current_package(&self) -> Option<&str> {
        self.mounted
            .as_ref()
            .map(|mounted| mounted.package_name.as_str())
    }

    /// Handles a navigation to `location`.
    pub fn on_navigation<H>(&mut self, location: &str, host: &mut H) -> MountOutcome
    where
        H: MountHost<Container = C>,
    {
        let Some(package_name) = package_name_from_location(location) else {
            debug!("Not a package page: {}", location);
            return MountOutcome::NotPackagePage;
        };

        if !host.has_sidebar_region() {
            debug!("No sidebar region on page for {}", package_name);
            return MountOutcome::NoSidebarRegion;
        }

        if let Some(mounted) = &self.mounted
            && mounted.package_name == package_name
            && host.is_attached(&mounted.container)
        {
            return MountOutcome::Unchanged;
        }

        let replaced = self.mounted.take().map(|previous| {
            host.remove_container(previous.container);
            previous.package_name
        });

        let Some((container, placement)) = host.insert_container(&package_name) else {
            return MountOutcome::NoSidebarRegion;
        };

        info!("Mounted sidebar for {} ({:?})", package_name, placement);
        self.mounted = Some(MountedSidebar {
            container,
            package_name: package_name.clone(),
        });

        MountOutcome::Mounted {
            package_name,
            placement,
            replaced,
        }
    }
}
