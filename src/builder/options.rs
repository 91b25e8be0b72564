//! CMake cache options for a component build.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::component::Component;
use crate::core::layout::BuildLayout;
use crate::core::settings::Settings;
use crate::util::fs::cmake_path;

/// Options turned off for every component: tests, docs and examples.
pub const DISABLED_FEATURES: &[&str] = &[
    "CLANG_INCLUDE_DOCS",
    "CLANG_INCLUDE_TESTS",
    "CLANG_TOOLS_INCLUDE_EXTRA_DOCS",
    "COMPILER_RT_INCLUDE_TESTS",
    "LIBCXX_INCLUDE_DOCS",
    "LIBCXX_INCLUDE_TESTS",
    "LLVM_BUILD_TESTS",
    "LLVM_INCLUDE_EXAMPLES",
    "LLVM_INCLUDE_GO_TESTS",
    "LLVM_INCLUDE_TESTS",
];

/// `-D` options passed to the configure step, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BuildOptions {
    values: BTreeMap<String, String>,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compose the options for one component.
    ///
    /// The result depends only on the component, the settings and the
    /// layout it was bound to.
    pub fn compose(component: &Component, settings: &Settings, layout: &BuildLayout) -> Self {
        let mut options = BuildOptions::new();

        for name in DISABLED_FEATURES {
            options.set(*name, "OFF");
        }

        options.set("LLVM_TARGETS_TO_BUILD", settings.llvm_targets());
        options.set("CMAKE_INSTALL_PREFIX", cmake_path(&component.install_dir));
        options.set("BUILD_SHARED_LIBS", on_off(settings.shared));
        options.set(
            "LIBCXXABI_LIBCXX_INCLUDES",
            cmake_path(&layout.root().join("libcxx").join("include")),
        );
        if settings.verbose_makefile {
            options.set("CMAKE_VERBOSE_MAKEFILE", "1");
        }

        options
    }

    /// Set an option, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as `-DNAME=VALUE` command-line arguments.
    pub fn to_args(&self) -> Vec<String> {
        self.iter()
            .map(|(name, value)| format!("-D{}={}", name, value))
            .collect()
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "ON"
    } else {
        "OFF"
    }
}

/// Arguments the package manager itself contributes to every configure:
/// the generator and the build type.
pub fn generator_args(settings: &Settings) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(generator) = &settings.generator {
        args.push("-G".to_string());
        args.push(generator.clone());
    }
    args.push(format!("-DCMAKE_BUILD_TYPE={}", settings.build_type));
    args
}
