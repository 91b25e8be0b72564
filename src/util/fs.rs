//! Filesystem utilities.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;
use walkdir::WalkDir;

/// Recursively copy a directory, merging into `dst`.
///
/// Existing files in `dst` with the same relative path are overwritten.
/// Returns the number of files copied.
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<usize> {
    copy_tree_matching(src, dst, &[])
}

/// Recursively copy the files under `src` whose file name matches any of
/// `patterns`, preserving their path relative to `src`.
///
/// An empty pattern list matches every file. Directories are only created in
/// `dst` when a file below them is copied.
pub fn copy_tree_matching(src: &Path, dst: &Path, patterns: &[Pattern]) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("failed to walk directory: {}", src.display()))?;
        if entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !patterns.is_empty() && !patterns.iter().any(|p| p.matches(&name)) {
            continue;
        }

        let rel = relative_path(src, entry.path());
        let dst_path = dst.join(&rel);
        if let Some(parent) = dst_path.parent() {
            ensure_dir(parent)?;
        }

        fs::copy(entry.path(), &dst_path).with_context(|| {
            format!(
                "failed to copy {} to {}",
                entry.path().display(),
                dst_path.display()
            )
        })?;
        copied += 1;
    }

    Ok(copied)
}

/// Compile a list of glob patterns.
pub fn compile_patterns(patterns: &[&str]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("invalid glob pattern: {}", p)))
        .collect()
}

/// Remove a directory and all its contents, if it exists.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("failed to remove directory: {}", path.display())),
    }
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))
}

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }
    fs::write(path, contents).with_context(|| format!("failed to write file: {}", path.display()))
}

/// Move a file or directory, creating the destination's parent if needed.
pub fn move_path(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_dir(parent)?;
        }
    }
    fs::rename(src, dst)
        .with_context(|| format!("failed to move {} to {}", src.display(), dst.display()))
}

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Render a path with forward slashes, as CMake expects.
pub fn cmake_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}
