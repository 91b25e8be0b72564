//! Command implementations

pub mod build;
pub mod clean;
pub mod completions;
pub mod import;
pub mod info;
pub mod package;
pub mod patch;
pub mod run;
pub mod source;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, SettingsArgs};
use clang_forge::core::settings::Settings;
use clang_forge::util::shell::Shell;
use clang_forge::util::GlobalContext;

/// Build the context for this invocation from the global flags.
pub fn context(global: &GlobalArgs) -> Result<GlobalContext> {
    let shell = Shell::from_flags(global.quiet, global.verbose, global.color);
    let ctx = match &global.root {
        Some(root) => GlobalContext::with_root(root)?,
        None => GlobalContext::new()?,
    };
    Ok(ctx.with_shell(shell))
}

/// Resolve settings: config files, then `FORGE_*` variables, then flags.
pub fn resolve_settings(ctx: &GlobalContext, args: &SettingsArgs) -> Result<Settings> {
    let config = ctx.load_config()?;
    Settings::resolve(&config, |key| std::env::var(key).ok(), &args.overrides())
}

/// Resolve a user-supplied path against the current directory.
pub fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()
        .context("failed to get current directory")?
        .join(path))
}
