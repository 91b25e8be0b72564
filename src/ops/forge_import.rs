//! Implementation of `clang-forge import`.
//!
//! Copies the runtime pieces a consumer needs next to its own binaries:
//! Windows DLLs, macOS dylibs and the `clang` driver itself.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::layout::{InstallSubdir, PackageLayout};
use crate::util::fs::ensure_dir;

/// `(package subdirectory, file-name pattern)` pairs copied into `<dest>/bin`.
pub const IMPORT_RULES: &[(InstallSubdir, &str)] = &[
    (InstallSubdir::Bin, "*.dll"),
    (InstallSubdir::Lib, "*.dylib*"),
    (InstallSubdir::Bin, "clang"),
    (InstallSubdir::Bin, "clang.exe"),
];

/// Copy the runtime files of `package` into `<dest>/bin`.
///
/// Returns the copied files, in the order they were copied.
pub fn import(package: &PackageLayout, dest: &Path) -> Result<Vec<PathBuf>> {
    if !package.root().is_dir() {
        bail!(
            "package directory not found: {}\n\
             hint: run `clang-forge package` first",
            package.root().display()
        );
    }

    let bin = dest.join(InstallSubdir::Bin.as_str());
    ensure_dir(&bin)?;
    let mut copied = Vec::new();

    for (kind, pattern) in IMPORT_RULES {
        let dir = package.dir(*kind);
        let pattern = glob::Pattern::new(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?;

        for src in matching_files(&dir, &pattern)? {
            let Some(name) = src.file_name() else {
                continue;
            };
            let target = bin.join(name);
            fs::copy(&src, &target).with_context(|| {
                format!("failed to copy {} to {}", src.display(), target.display())
            })?;
            tracing::debug!("imported {}", target.display());
            copied.push(target);
        }
    }

    Ok(copied)
}

/// Regular files directly inside `dir` whose name matches `pattern`, sorted.
fn matching_files(dir: &Path, pattern: &glob::Pattern) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        let matches = entry
            .file_name()
            .to_str()
            .map(|name| pattern.matches(name))
            .unwrap_or(false);
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
