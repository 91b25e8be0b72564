//! `clang-forge patch` command

use anyhow::Result;

use crate::cli::{GlobalArgs, PatchArgs};
use clang_forge::builder::shim::{ensure_patched, PatchOutcome};
use clang_forge::util::shell::Status;

pub fn execute(global: &GlobalArgs, args: PatchArgs) -> Result<()> {
    let ctx = super::context(global)?;
    let dir = super::absolute(&args.dir)?;

    match ensure_patched(&dir)? {
        PatchOutcome::Patched => ctx.shell().status(Status::Patched, dir.display()),
        PatchOutcome::AlreadyPatched => ctx
            .shell()
            .status(Status::Skipped, format!("{} (already patched)", dir.display())),
    }
    Ok(())
}
