//! Scoped working-directory changes.
//!
//! CMake and the archive extractor operate relative to the process's current
//! directory. [`ScopedDir`] enters a directory and restores the previous one
//! when dropped, on success and on early `?` returns alike.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::fs::ensure_dir;

/// Guard that restores the previous working directory on drop.
#[derive(Debug)]
#[must_use = "the previous directory is restored as soon as the guard is dropped"]
pub struct ScopedDir {
    previous: PathBuf,
    current: PathBuf,
}

impl ScopedDir {
    /// Create `dir` if it does not exist yet, then enter it.
    pub fn enter(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        ensure_dir(dir)?;

        let previous = env::current_dir().context("failed to get current directory")?;
        env::set_current_dir(dir)
            .with_context(|| format!("failed to enter directory: {}", dir.display()))?;
        let current = env::current_dir().context("failed to get current directory")?;

        tracing::debug!("entered {}", current.display());
        Ok(ScopedDir { previous, current })
    }

    /// The directory this guard entered.
    pub fn path(&self) -> &Path {
        &self.current
    }

    /// The directory that will be restored.
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for ScopedDir {
    fn drop(&mut self) {
        if let Err(e) = env::set_current_dir(&self.previous) {
            tracing::warn!(
                "failed to restore working directory {}: {}",
                self.previous.display(),
                e
            );
        } else {
            tracing::debug!("restored {}", self.previous.display());
        }
    }
}

/// Run `f` with `dir` as the working directory.
pub fn in_dir<T>(dir: impl AsRef<Path>, f: impl FnOnce(&Path) -> Result<T>) -> Result<T> {
    let guard = ScopedDir::enter(dir)?;
    f(guard.path())
}
