//! clang-forge - builds the LLVM clang components under a package manager
//!
//! This crate fetches the `clang`, `compiler-rt`, `libcxx` and
//! `clang-tools-extra` source releases, injects a CMake entry-point shim that
//! makes each tree consume package-manager-provided dependency info, runs an
//! out-of-tree CMake configure/build/install per component and merges the
//! resulting install trees into one package layout.

pub mod builder;
pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

/// Test utilities and mocks for clang-forge unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a scripted command runner and fixtures for
/// source trees, install trees and release archives.
#[cfg(test)]
pub mod test_support;

pub use core::component::{Component, ComponentSpec, COMPONENTS};
pub use core::layout::{BuildLayout, InstallTree, PackageLayout};
pub use core::settings::Settings;
pub use util::context::GlobalContext;
