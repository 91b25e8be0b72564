//! Core data structures for clang-forge.
//!
//! - The fixed component table and per-run component state
//! - The directory layout of a run
//! - Resolved settings

pub mod component;
pub mod layout;
pub mod settings;

pub use component::{Component, ComponentSpec};
pub use layout::{BuildLayout, InstallSubdir, InstallTree, PackageLayout};
pub use settings::{BuildType, Settings, SettingsOverrides};
