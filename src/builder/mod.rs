//! CMake-facing build machinery.
//!
//! This module patches upstream source trees, generates the build info the
//! patched trees read and drives CMake for each component.

pub mod buildinfo;
pub mod cmake;
pub mod options;
pub mod shim;

pub use cmake::ComponentBuildDriver;
pub use options::BuildOptions;
pub use shim::{ensure_patched, PatchError, PatchOutcome};
