//! `clang-forge source` command

use anyhow::Result;

use crate::cli::{GlobalArgs, SourceArgs};
use clang_forge::ops::forge_source::source;
use clang_forge::util::shell::Status;

pub fn execute(global: &GlobalArgs, args: SourceArgs) -> Result<()> {
    let ctx = super::context(global)?;
    let settings = super::resolve_settings(&ctx, &args.settings)?;

    let result = source(&ctx, &settings)?;

    ctx.shell().status(
        Status::Finished,
        format!(
            "sources for {} ({} fetched, {} already present)",
            settings.reference(),
            result.fetched.len(),
            result.skipped.len()
        ),
    );
    Ok(())
}
