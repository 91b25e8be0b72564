//! `clang-forge build` command

use anyhow::Result;

use crate::cli::{BuildArgs, GlobalArgs};
use clang_forge::builder::ComponentBuildDriver;
use clang_forge::ops::forge_build::build;
use clang_forge::util::process::SystemRunner;
use clang_forge::util::shell::Status;

pub fn execute(global: &GlobalArgs, args: BuildArgs) -> Result<()> {
    let ctx = super::context(global)?;
    let settings = super::resolve_settings(&ctx, &args.settings)?;

    let mut runner = SystemRunner;
    let mut driver = ComponentBuildDriver::new(&settings, &mut runner, ctx.shell())?;

    let span = ctx.shell().span(Status::Building, settings.reference());
    let trees = build(&ctx, &settings, &mut driver)?;
    span.finish();

    for tree in &trees {
        tracing::info!("installed into {}", tree.root().display());
    }
    Ok(())
}
