//! High-level operations.
//!
//! This module contains the implementation of clang-forge commands.

pub mod forge_build;
pub mod forge_clean;
pub mod forge_import;
pub mod forge_package;
pub mod forge_run;
pub mod forge_source;

pub use forge_build::{build, planned_components};
pub use forge_clean::{clean, CleanOptions};
pub use forge_import::import;
pub use forge_package::{collect, package, CollectSummary};
pub use forge_run::{run, RunResult};
pub use forge_source::{source, SourceResult};
