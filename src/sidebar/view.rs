//! Render model of the sidebar and its plain-text rendering

use std::fmt;

use crate::command::{DependencyType, PackageManager};
use crate::config::LATEST;
use crate::sidebar::state::{FetchStatus, SidebarState};

pub const TITLE: &str = "Install Assistant";
pub const SUBTITLE: &str = "Generate install commands for any package and version. \
Select your package manager, dependency type, and version to get the exact command you need.";
pub const LOADING_HINT: &str = "Loading versions…";
pub const COPY_LABEL: &str = "Copy install command line";
pub const COPIED_LABEL: &str = "Command line copied";

/// Inline message under the version selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hint {
    Loading,
    Error(String),
}

/// Contents of the settings panel while it is open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsPanel {
    pub show_beta: bool,
    pub beta_toggle_disabled: bool,
    pub max_versions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarView {
    pub package_name: String,
    pub package_manager: PackageManager,
    pub dependency_type: DependencyType,
    pub selected_version: String,
    pub version_options: Vec<String>,
    pub version_select_disabled: bool,
    pub latest_tag: Option<String>,
    pub hint: Option<Hint>,
    pub command: String,
    pub copied: bool,
    pub settings: Option<SettingsPanel>,
}

impl SidebarView {
    pub fn from_state(state: &SidebarState) -> Self {
        let hint = match &state.status {
            FetchStatus::Loading => Some(Hint::Loading),
            FetchStatus::Errored(message) => Some(Hint::Error(message.clone())),
            FetchStatus::Idle | FetchStatus::Loaded => None,
        };

        let settings = state.settings_open.then(|| SettingsPanel {
            show_beta: state.show_beta,
            beta_toggle_disabled: state.beta_toggle_disabled(),
            max_versions: state.max_versions,
        });

        Self {
            package_name: state.package_name.clone(),
            package_manager: state.package_manager,
            dependency_type: state.dependency_type,
            selected_version: state.selected_version.clone(),
            version_options: state.version_options(),
            version_select_disabled: state.version_select_disabled(),
            latest_tag: state.latest_tag.clone(),
            hint,
            command: state.command(),
            copied: state.copied,
            settings,
        }
    }

    pub fn copy_label(&self) -> &'static str {
        if self.copied { COPIED_LABEL } else { COPY_LABEL }
    }

    /// Whether `version` is one of the selectable options
    pub fn offers(&self, version: &str) -> bool {
        self.version_options.iter().any(|option| option == version)
    }
}

impl fmt::Display for SidebarView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TITLE} · {}", self.package_name)?;
        writeln!(f, "{SUBTITLE}")?;
        writeln!(f)?;

        let managers = PackageManager::ALL
            .iter()
            .map(PackageManager::as_str)
            .collect::<Vec<_>>()
            .join(" | ");
        writeln!(f, "  Pkg Manager  {:<12} ({managers})", self.package_manager.as_str())?;
        writeln!(f, "  Dependency   {}", self.dependency_type.label())?;

        let options = self
            .version_options
            .iter()
            .map(|option| match (&self.latest_tag, option.as_str()) {
                (Some(tag), LATEST) => format!("{LATEST} ({tag})"),
                _ => option.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "  Version      {:<12} [{options}]", self.selected_version)?;
        if self.version_select_disabled {
            write!(f, " (disabled)")?;
        }
        writeln!(f)?;

        match &self.hint {
            Some(Hint::Loading) => writeln!(f, "               {LOADING_HINT}")?,
            Some(Hint::Error(message)) => writeln!(f, "               {message}")?,
            None => {}
        }

        writeln!(f)?;
        let marker = if self.copied { "✓" } else { "⧉" };
        writeln!(f, "  $ {}   {marker} {}", self.command, self.copy_label())?;

        if let Some(settings) = &self.settings {
            writeln!(f)?;
            writeln!(f, "  Settings")?;
            write!(
                f,
                "    Beta versions  {}",
                if settings.show_beta { "on" } else { "off" }
            )?;
            if settings.beta_toggle_disabled {
                write!(f, " (disabled)")?;
            }
            writeln!(f)?;
            writeln!(f, "    Max versions   {}", settings.max_versions)?;
        }

        Ok(())
    }
}
