//! Sidebar state machine
//!
//! [`reduce`] is the only way a [`SidebarState`] changes. It is pure: anything
//! that has to touch the outside world (network, clipboard, timers, the
//! preference store) is returned as an [`Effect`] for the controller to run.
//! Results of asynchronous work come back as events tagged with the fetch
//! generation they belong to, so stale results are dropped here.

use indexmap::IndexSet;

use crate::command::{DependencyType, PackageManager, build_install_command};
use crate::config::LATEST;
use crate::preferences::{Preferences, parse_max_versions_input};
use crate::version::compare::sort_versions_desc;
use crate::version::types::PackageVersions;

/// Message shown in place of the version list when the fetch fails
pub const VERSION_ERROR_MESSAGE: &str = "Unable to load versions";

/// Lifecycle of the version fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarState {
    pub package_name: String,
    pub status: FetchStatus,
    /// Every fetched version, highest first
    pub versions: Vec<String>,
    /// Versions currently offered after beta filtering and truncation
    pub filtered_versions: Vec<String>,
    /// Version the `latest` dist tag points at, when known
    pub latest_tag: Option<String>,
    /// `"latest"` or a member of `filtered_versions`
    pub selected_version: String,
    pub package_manager: PackageManager,
    pub dependency_type: DependencyType,
    pub show_beta: bool,
    pub max_versions: u32,
    pub copied: bool,
    pub settings_open: bool,
    /// Token of the fetch whose result is still wanted
    pub generation: u64,
    pub mounted: bool,
}

impl SidebarState {
    /// State of a freshly mounted sidebar, before its fetch starts
    pub fn new(package_name: &str, preferences: Preferences) -> Self {
        Self {
            package_name: package_name.to_string(),
            status: FetchStatus::Idle,
            versions: Vec::new(),
            filtered_versions: Vec::new(),
            latest_tag: None,
            selected_version: LATEST.to_string(),
            package_manager: preferences.package_manager,
            dependency_type: DependencyType::Prod,
            show_beta: preferences.show_beta,
            max_versions: preferences.max_versions,
            copied: false,
            settings_open: false,
            generation: 0,
            mounted: true,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            FetchStatus::Errored(message) => Some(message),
            _ => None,
        }
    }

    /// Install command for the current selection
    pub fn command(&self) -> String {
        build_install_command(
            self.package_manager,
            self.dependency_type,
            &self.package_name,
            &self.selected_version,
        )
    }

    /// Values offered by the version selector
    pub fn version_options(&self) -> Vec<String> {
        version_options(&self.filtered_versions)
    }

    /// The version selector is disabled while a fetch is in flight
    pub fn version_select_disabled(&self) -> bool {
        self.is_loading()
    }

    /// The beta toggle is disabled while loading and after a failed fetch
    pub fn beta_toggle_disabled(&self) -> bool {
        matches!(self.status, FetchStatus::Loading | FetchStatus::Errored(_))
    }

    fn start_fetch(&mut self) -> Effect {
        self.generation += 1;
        self.status = FetchStatus::Loading;
        self.versions.clear();
        self.latest_tag = None;
        self.selected_version = LATEST.to_string();

        Effect::FetchVersions {
            package_name: self.package_name.clone(),
            generation: self.generation,
        }
    }

    /// Whether a fetch result tagged with `generation` may still be applied
    pub fn accepts_fetch_result(&self, generation: u64) -> bool {
        self.mounted && self.is_loading() && generation == self.generation
    }

    /// Recomputes the filtered list and resets a selection that fell out of it
    fn refilter(&mut self) {
        self.filtered_versions = filter_versions(&self.versions, self.show_beta, self.max_versions);
        if self.selected_version != LATEST && !self.filtered_versions.contains(&self.selected_version)
        {
            self.selected_version = LATEST.to_string();
        }
    }
}

/// Events that drive the sidebar
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarEvent {
    Mounted {
        package_name: String,
        preferences: Preferences,
    },
    PackageChanged {
        package_name: String,
        preferences: Preferences,
    },
    FetchSucceeded {
        generation: u64,
        versions: PackageVersions,
    },
    FetchFailed {
        generation: u64,
        error: String,
    },
    PackageManagerSelected(PackageManager),
    DependencyTypeSelected(DependencyType),
    VersionSelected(String),
    ShowBetaToggled,
    /// Raw text of the max-versions field
    MaxVersionsChanged(String),
    SettingsToggled,
    PointerDown {
        inside_settings: bool,
    },
    CopyRequested,
    CopySucceeded,
    CopyFailed(String),
    CopyFeedbackExpired,
    Unmounted,
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchVersions { package_name: String, generation: u64 },
    PersistPackageManager(PackageManager),
    PersistShowBeta(bool),
    PersistMaxVersions(u32),
    CopyToClipboard(String),
    ScheduleCopyReset,
}

/// Drops prerelease versions unless `show_beta`, then keeps at most
/// `max_versions` entries (at least one).
pub fn filter_versions(versions: &[String], show_beta: bool, max_versions: u32) -> Vec<String> {
    let limit = max_versions.max(1) as usize;
    versions
        .iter()
        .filter(|version| show_beta || !version.contains('-'))
        .take(limit)
        .cloned()
        .collect()
}

/// `"latest"` followed by the filtered versions, without duplicates
pub fn version_options(filtered_versions: &[String]) -> Vec<String> {
    std::iter::once(LATEST.to_string())
        .chain(filtered_versions.iter().cloned())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Applies `event` to `state`, returning the next state and the effects to run.
pub fn reduce(mut state: SidebarState, event: SidebarEvent) -> (SidebarState, Vec<Effect>) {
    let mut effects = Vec::new();

    match event {
        SidebarEvent::Mounted {
            package_name,
            preferences,
        }
        | SidebarEvent::PackageChanged {
            package_name,
            preferences,
        } => {
            // Every package starts from a fresh sidebar. Generations keep
            // increasing so results for the previous package can never match.
            let generation = state.generation;
            state = SidebarState::new(&package_name, preferences);
            state.generation = generation;
            effects.push(state.start_fetch());
        }
        SidebarEvent::FetchSucceeded {
            generation,
            versions,
        } => {
            if state.accepts_fetch_result(generation) {
                let PackageVersions {
                    mut versions,
                    dist_tags,
                } = versions;
                sort_versions_desc(&mut versions);
                state.versions = versions;
                state.latest_tag = dist_tags.get(LATEST).cloned();
                state.status = FetchStatus::Loaded;
                state.selected_version = LATEST.to_string();
            }
        }
        SidebarEvent::FetchFailed { generation, .. } => {
            if state.accepts_fetch_result(generation) {
                state.versions.clear();
                state.latest_tag = None;
                state.status = FetchStatus::Errored(VERSION_ERROR_MESSAGE.to_string());
                state.selected_version = LATEST.to_string();
            }
        }
        SidebarEvent::PackageManagerSelected(package_manager) => {
            if state.package_manager != package_manager {
                state.package_manager = package_manager;
                effects.push(Effect::PersistPackageManager(package_manager));
            }
        }
        SidebarEvent::DependencyTypeSelected(dependency_type) => {
            state.dependency_type = dependency_type;
        }
        SidebarEvent::VersionSelected(version) => {
            if !state.version_select_disabled() && state.version_options().contains(&version) {
                state.selected_version = version;
            }
        }
        SidebarEvent::ShowBetaToggled => {
            if !state.beta_toggle_disabled() {
                state.show_beta = !state.show_beta;
                effects.push(Effect::PersistShowBeta(state.show_beta));
            }
        }
        SidebarEvent::MaxVersionsChanged(raw) => {
            let max_versions = parse_max_versions_input(&raw);
            if state.max_versions != max_versions {
                state.max_versions = max_versions;
                effects.push(Effect::PersistMaxVersions(max_versions));
            }
        }
        SidebarEvent::SettingsToggled => {
            state.settings_open = !state.settings_open;
        }
        SidebarEvent::PointerDown { inside_settings } => {
            if !inside_settings {
                state.settings_open = false;
            }
        }
        SidebarEvent::CopyRequested => {
            effects.push(Effect::CopyToClipboard(state.command()));
        }
        SidebarEvent::CopySucceeded => {
            state.copied = true;
            effects.push(Effect::ScheduleCopyReset);
        }
        SidebarEvent::CopyFailed(_) => {}
        SidebarEvent::CopyFeedbackExpired => {
            state.copied = false;
        }
        SidebarEvent::Unmounted => {
            state.mounted = false;
            state.generation += 1;
            state.status = FetchStatus::Idle;
            state.settings_open = false;
        }
    }

    state.refilter();
    (state, effects)
}
