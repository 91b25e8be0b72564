//! `clang-forge package` command

use anyhow::Result;

use crate::cli::{GlobalArgs, PackageArgs};
use clang_forge::ops::forge_package::package;

pub fn execute(global: &GlobalArgs, args: PackageArgs) -> Result<()> {
    let ctx = super::context(global)?;
    let settings = super::resolve_settings(&ctx, &args.settings)?;
    let dest = args.dest.as_deref().map(super::absolute).transpose()?;

    let (layout, summary) = package(&ctx, &settings, dest.as_deref())?;

    for (kind, count) in &summary.files {
        tracing::debug!("{}/{}: {} files", layout.root().display(), kind, count);
    }
    Ok(())
}
