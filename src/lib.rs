//! Install command helper for npm packages.
//!
//! Given a package name, fetches the published versions from the npm registry
//! and builds the matching `npm`/`yarn`/`pnpm` install command for the chosen
//! dependency type and version.

pub mod command;
pub mod config;
pub mod mount;
pub mod preferences;
pub mod shell;
pub mod sidebar;
pub mod storage;
pub mod version;
