//! Directory layout of a forge run.
//!
//! ```text
//! <root>/
//!   forge.toml               project config
//!   forge_buildinfo.cmake    generated dependency info, read by every shim
//!   clang/ compiler-rt/ ...  fetched (and patched) source trees
//!   install/<component>/     per-component install trees
//!   build/<component>/       scratch build trees (C:/__build on Windows)
//!   package/                 merged package layout
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::component::ComponentSpec;
use crate::core::settings::Settings;

/// Name of the generated build-info file at the project root.
pub const BUILDINFO_FILE: &str = "forge_buildinfo.cmake";

/// Install root, relative to the project root.
pub const INSTALL_DIR: &str = "install";

/// Default package root, relative to the project root.
pub const PACKAGE_DIR: &str = "package";

/// Scratch root on non-Windows hosts, relative to the project root.
pub const BUILD_DIR: &str = "build";

/// Scratch root on Windows. Short and absolute to keep LLVM's deep object
/// paths under MAX_PATH.
pub const WINDOWS_BUILD_DIR: &str = "C:/__build";

/// Where everything of one run lives. Decided once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
    root: PathBuf,
    build_root: PathBuf,
    install_root: PathBuf,
}

impl BuildLayout {
    /// Layout for the host platform.
    pub fn new(root: &Path, settings: &Settings) -> Self {
        Self::for_platform(root, settings.build_dir.as_deref(), cfg!(windows))
    }

    /// Layout for an explicit platform family. A relative `build_dir`
    /// override is taken relative to `root`.
    pub fn for_platform(root: &Path, build_dir: Option<&Path>, windows: bool) -> Self {
        let build_root = match build_dir {
            Some(dir) => root.join(dir),
            None if windows => PathBuf::from(WINDOWS_BUILD_DIR),
            None => root.join(BUILD_DIR),
        };

        BuildLayout {
            root: root.to_path_buf(),
            build_root,
            install_root: root.join(INSTALL_DIR),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    pub fn source_root(&self, spec: &ComponentSpec) -> PathBuf {
        self.root.join(spec.destination)
    }

    pub fn build_dir(&self, spec: &ComponentSpec) -> PathBuf {
        self.build_root.join(spec.name)
    }

    pub fn install_dir(&self, spec: &ComponentSpec) -> PathBuf {
        self.install_root.join(spec.name)
    }

    pub fn buildinfo_path(&self) -> PathBuf {
        self.root.join(BUILDINFO_FILE)
    }

    pub fn default_package_root(&self) -> PathBuf {
        self.root.join(PACKAGE_DIR)
    }
}

/// Well-known subdirectories of an install tree and of the package layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallSubdir {
    Include,
    Lib,
    Share,
    Bin,
    Libexec,
}

impl InstallSubdir {
    pub const ALL: [InstallSubdir; 5] = [
        InstallSubdir::Include,
        InstallSubdir::Lib,
        InstallSubdir::Share,
        InstallSubdir::Bin,
        InstallSubdir::Libexec,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstallSubdir::Include => "include",
            InstallSubdir::Lib => "lib",
            InstallSubdir::Share => "share",
            InstallSubdir::Bin => "bin",
            InstallSubdir::Libexec => "libexec",
        }
    }

    /// File-name patterns collected from this subdirectory. Empty means all.
    pub fn patterns(&self) -> &'static [&'static str] {
        match self {
            InstallSubdir::Lib => &["*.a", "*.h", "*.so", "*.lib", "*.dylib", "*.dll", "*.cmake"],
            _ => &[],
        }
    }
}

impl fmt::Display for InstallSubdir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one component's install step. Read-only once installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTree {
    root: PathBuf,
}

impl InstallTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        InstallTree { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn subdir(&self, kind: InstallSubdir) -> PathBuf {
        self.root.join(kind.as_str())
    }
}

/// The merged output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    root: PathBuf,
}

impl PackageLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        PackageLayout { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dir(&self, kind: InstallSubdir) -> PathBuf {
        self.root.join(kind.as_str())
    }
}
