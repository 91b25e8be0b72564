//! `clang-forge clean` command

use anyhow::Result;

use crate::cli::{CleanArgs, GlobalArgs, SettingsArgs};
use clang_forge::ops::forge_clean::{clean, CleanOptions};
use clang_forge::util::shell::Status;

pub fn execute(global: &GlobalArgs, args: CleanArgs) -> Result<()> {
    let ctx = super::context(global)?;
    let settings = super::resolve_settings(&ctx, &SettingsArgs::default())?;

    let removed = clean(&ctx, &settings, CleanOptions { all: args.all })?;

    if removed.is_empty() {
        ctx.shell().status(Status::Info, "nothing to clean");
    }
    for path in removed {
        ctx.shell().status(Status::Removed, path.display());
    }
    Ok(())
}
