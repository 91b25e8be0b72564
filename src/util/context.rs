//! Global context for forge operations.
//!
//! Provides centralized access to the project root, configuration paths and
//! the output shell.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::util::config::{self, Config};
use crate::util::shell::Shell;

/// Global context containing paths and output settings.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Absolute project root; sources, install trees and the build info live here
    root: PathBuf,

    /// Home directory for global forge data (~/.clang-forge/)
    home: Option<PathBuf>,

    /// Output shell
    shell: Arc<Shell>,
}

impl GlobalContext {
    /// Create a context rooted at the current working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Self::with_root(cwd)
    }

    /// Create a context rooted at `root`.
    ///
    /// Relative roots are resolved against the current directory once, here,
    /// so later working-directory changes cannot move the project.
    pub fn with_root(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()
                .context("failed to get current directory")?
                .join(root)
        };

        Ok(GlobalContext {
            root,
            home: config::global_config_dir(),
            shell: Arc::new(Shell::default()),
        })
    }

    /// Use a specific shell for output.
    pub fn with_shell(mut self, shell: Shell) -> Self {
        self.shell = Arc::new(shell);
        self
    }

    /// Ignore the user's global configuration.
    pub fn without_home(mut self) -> Self {
        self.home = None;
        self
    }

    /// Get the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the global forge directory (~/.clang-forge/), if a home exists.
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    /// Get the output shell.
    pub fn shell(&self) -> &Arc<Shell> {
        &self.shell
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> Option<PathBuf> {
        self.home.as_ref().map(|h| h.join("config.toml"))
    }

    /// Get the project configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        config::project_config_path(&self.root)
    }

    /// Load the merged global + project configuration.
    pub fn load_config(&self) -> Result<Config> {
        config::load_config(self.config_path().as_deref(), &self.project_config_path())
    }
}
