//! Generated dependency info included by every shim.
//!
//! For each configured dependency root the file defines
//! `FORGE_<NAME>_ROOT`, `FORGE_INCLUDE_DIRS_<NAME>`, `FORGE_LIB_DIRS_<NAME>`
//! and `FORGE_BIN_DIRS_<NAME>`, plus aggregate `FORGE_*` lists and the
//! `forge_basic_setup()` macro.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::util::fs::{cmake_path, write_string};

/// Upper-case a dependency name into a CMake variable suffix.
fn var_suffix(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

fn quoted_list<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) -> String {
    paths
        .into_iter()
        .map(|p| format!("\"{}\"", cmake_path(p)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the build info for the given dependency roots.
///
/// Output is deterministic; dependencies appear sorted by name.
pub fn render_buildinfo(dependencies: &BTreeMap<String, PathBuf>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Generated by clang-forge. Do not edit.");
    let _ = writeln!(out);

    let mut roots = Vec::new();
    let mut include_dirs = Vec::new();
    let mut lib_dirs = Vec::new();
    let mut bin_dirs = Vec::new();

    for (name, root) in dependencies {
        let suffix = var_suffix(name);
        let include = root.join("include");
        let lib = root.join("lib");
        let bin = root.join("bin");

        let _ = writeln!(out, "set(FORGE_{}_ROOT \"{}\")", suffix, cmake_path(root));
        let _ = writeln!(
            out,
            "set(FORGE_INCLUDE_DIRS_{} \"{}\")",
            suffix,
            cmake_path(&include)
        );
        let _ = writeln!(out, "set(FORGE_LIB_DIRS_{} \"{}\")", suffix, cmake_path(&lib));
        let _ = writeln!(out, "set(FORGE_BIN_DIRS_{} \"{}\")", suffix, cmake_path(&bin));
        let _ = writeln!(out);

        roots.push(root.clone());
        include_dirs.push(include);
        lib_dirs.push(lib);
        bin_dirs.push(bin);
    }

    let names = dependencies
        .keys()
        .map(|n| n.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let _ = writeln!(out, "set(FORGE_DEPENDENCIES {})", names);
    let _ = writeln!(out, "set(FORGE_ROOTS {})", quoted_list(&roots));
    let _ = writeln!(out, "set(FORGE_INCLUDE_DIRS {})", quoted_list(&include_dirs));
    let _ = writeln!(out, "set(FORGE_LIB_DIRS {})", quoted_list(&lib_dirs));
    let _ = writeln!(out, "set(FORGE_BIN_DIRS {})", quoted_list(&bin_dirs));
    let _ = writeln!(out);

    out.push_str(
        r#"macro(forge_basic_setup)
  message(STATUS "forge: dependencies ${FORGE_DEPENDENCIES}")
  if(FORGE_INCLUDE_DIRS)
    include_directories(${FORGE_INCLUDE_DIRS})
  endif()
  if(FORGE_LIB_DIRS)
    link_directories(${FORGE_LIB_DIRS})
  endif()
endmacro()
"#,
    );

    out
}

/// Write the build info to `path`.
pub fn write_buildinfo(path: &Path, dependencies: &BTreeMap<String, PathBuf>) -> Result<()> {
    tracing::debug!(
        "writing build info for {} dependencies to {}",
        dependencies.len(),
        path.display()
    );
    write_string(path, &render_buildinfo(dependencies))
}
