//! Version layer: fetching published versions and ordering them
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│   Compare   │
//! │  (fetch)    │     │ (ordering)  │
//! └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ Registries  │
//! │   (npm)     │
//! └─────────────┘
//! ```
//!
//! - [`compare`]: descending version ordering
//! - [`registry`]: Registry trait for fetching versions from remote sources
//! - [`registries`]: Concrete registry implementations
//! - [`error`]: Error types for registry operations
//! - [`types`]: Common types like `PackageVersions`

pub mod compare;
pub mod error;
pub mod registries;
pub mod registry;
pub mod types;
