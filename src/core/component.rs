//! The fixed component table and per-run component state.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::builder::shim::PRESERVED_ENTRY_POINT;
use crate::core::layout::{BuildLayout, InstallTree};

/// Static description of one independently archived source module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComponentSpec {
    /// Short name; names the build and install directories.
    pub name: &'static str,
    /// Identifier used in the archive name (`<archive>-<version>.src`).
    pub archive: &'static str,
    /// Where the extracted tree lands, relative to the project root.
    pub destination: &'static str,
    /// Whether the component gets its own configure/build/install.
    pub needs_build: bool,
    /// Component whose source tree this one is extracted into.
    pub nested_under: Option<&'static str>,
}

/// Every component, in fetch order. Parents come before anything nested
/// under them, and buildable components appear in build order.
pub const COMPONENTS: &[ComponentSpec] = &[
    ComponentSpec {
        name: "clang",
        archive: "cfe",
        destination: "clang",
        needs_build: true,
        nested_under: None,
    },
    ComponentSpec {
        name: "compiler-rt",
        archive: "compiler-rt",
        destination: "compiler-rt",
        needs_build: true,
        nested_under: None,
    },
    ComponentSpec {
        name: "libcxx",
        archive: "libcxx",
        destination: "libcxx",
        needs_build: true,
        nested_under: None,
    },
    // Built as part of clang through clang's own CMake tree.
    ComponentSpec {
        name: "clang-tools-extra",
        archive: "clang-tools-extra",
        destination: "clang/tools/extra",
        needs_build: false,
        nested_under: Some("clang"),
    },
];

/// Components that are fetched, in fetch order.
pub fn fetch_plan() -> impl Iterator<Item = &'static ComponentSpec> {
    COMPONENTS.iter()
}

/// Components that are patched, built and packaged, in build order.
pub fn build_plan() -> impl Iterator<Item = &'static ComponentSpec> {
    COMPONENTS.iter().filter(|c| c.needs_build)
}

/// Look up a component by name.
pub fn find(name: &str) -> Option<&'static ComponentSpec> {
    COMPONENTS.iter().find(|c| c.name == name)
}

impl fmt::Display for ComponentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A component bound to a release and to the paths of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub spec: &'static ComponentSpec,
    pub release: String,
    /// Extracted source tree.
    pub source_root: PathBuf,
    /// Scratch build directory; destroyed at the start of every build.
    pub build_dir: PathBuf,
    /// Install prefix; survives across builds.
    pub install_dir: PathBuf,
}

impl Component {
    pub fn new(spec: &'static ComponentSpec, release: impl Into<String>, layout: &BuildLayout) -> Self {
        Component {
            spec,
            release: release.into(),
            source_root: layout.source_root(spec),
            build_dir: layout.build_dir(spec),
            install_dir: layout.install_dir(spec),
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    /// Name of the single top-level directory inside the release archive.
    pub fn archive_dir_name(&self) -> String {
        format!("{}-{}.src", self.spec.archive, self.release)
    }

    /// Whether the source tree already carries the build shim.
    pub fn is_patched(&self) -> bool {
        is_patched(&self.source_root)
    }

    /// The install tree produced by this component's install step.
    pub fn install_tree(&self) -> InstallTree {
        InstallTree::new(&self.install_dir)
    }
}

/// Whether `source_root` holds the preserved-original marker.
pub fn is_patched(source_root: &Path) -> bool {
    source_root.join(PRESERVED_ENTRY_POINT).is_file()
}
