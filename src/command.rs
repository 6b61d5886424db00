//! Install command construction
//!
//! | manager | prod                | dev                            |
//! |---------|---------------------|--------------------------------|
//! | npm     | `npm install <pkg>` | `npm install --save-dev <pkg>` |
//! | yarn    | `yarn add <pkg>`    | `yarn add --dev <pkg>`         |
//! | pnpm    | `pnpm add <pkg>`    | `pnpm add --save-dev <pkg>`    |

use std::fmt;
use std::str::FromStr;

use crate::config::LATEST;

/// Package manager the command is generated for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    pub const ALL: [PackageManager; 3] =
        [PackageManager::Npm, PackageManager::Yarn, PackageManager::Pnpm];

    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageManager {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "npm" => Ok(PackageManager::Npm),
            "yarn" => Ok(PackageManager::Yarn),
            "pnpm" => Ok(PackageManager::Pnpm),
            other => Err(format!("unknown package manager: {other}")),
        }
    }
}

/// Whether the package is installed as a regular or a development dependency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DependencyType {
    #[default]
    Prod,
    Dev,
}

impl DependencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyType::Prod => "prod",
            DependencyType::Dev => "dev",
        }
    }

    /// Human-readable label used by the sidebar
    pub fn label(&self) -> &'static str {
        match self {
            DependencyType::Prod => "Production",
            DependencyType::Dev => "Development",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DependencyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prod" => Ok(DependencyType::Prod),
            "dev" => Ok(DependencyType::Dev),
            other => Err(format!("unknown dependency type: {other}")),
        }
    }
}

/// Builds the install command for a package.
///
/// An empty `version` or `"latest"` installs whatever the registry tags as
/// latest, so no `@version` suffix is added.
pub fn build_install_command(
    manager: PackageManager,
    dependency_type: DependencyType,
    package_name: &str,
    version: &str,
) -> String {
    let package = if version.is_empty() || version == LATEST {
        package_name.to_string()
    } else {
        format!("{package_name}@{version}")
    };

    let verb = match (manager, dependency_type) {
        (PackageManager::Npm, DependencyType::Prod) => "npm install",
        (PackageManager::Npm, DependencyType::Dev) => "npm install --save-dev",
        (PackageManager::Yarn, DependencyType::Prod) => "yarn add",
        (PackageManager::Yarn, DependencyType::Dev) => "yarn add --dev",
        (PackageManager::Pnpm, DependencyType::Prod) => "pnpm add",
        (PackageManager::Pnpm, DependencyType::Dev) => "pnpm add --save-dev",
    };

    format!("{verb} {package}")
}
