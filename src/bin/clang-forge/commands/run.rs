//! `clang-forge run` command
//!
//! Fetches, builds and packages every component in one invocation.

use anyhow::Result;

use crate::cli::{GlobalArgs, RunArgs};
use clang_forge::builder::ComponentBuildDriver;
use clang_forge::ops::forge_run::run;
use clang_forge::util::process::SystemRunner;
use clang_forge::util::shell::Status;

pub fn execute(global: &GlobalArgs, args: RunArgs) -> Result<()> {
    let ctx = super::context(global)?;
    let settings = super::resolve_settings(&ctx, &args.settings)?;
    let dest = args.dest.as_deref().map(super::absolute).transpose()?;

    let mut runner = SystemRunner;
    let mut driver = ComponentBuildDriver::new(&settings, &mut runner, ctx.shell())?;

    let span = ctx.shell().span(Status::Packaging, settings.reference());
    let result = run(&ctx, &settings, &mut driver, dest.as_deref())?;
    span.finish();

    tracing::info!(
        "{} files in {}",
        result.summary.total(),
        result.package.root().display()
    );
    Ok(())
}
