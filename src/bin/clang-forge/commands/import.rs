//! `clang-forge import` command

use anyhow::Result;

use crate::cli::{GlobalArgs, ImportArgs};
use clang_forge::core::layout::{PackageLayout, PACKAGE_DIR};
use clang_forge::ops::forge_import::import;
use clang_forge::util::shell::Status;

pub fn execute(global: &GlobalArgs, args: ImportArgs) -> Result<()> {
    let ctx = super::context(global)?;
    let package_root = match &args.package {
        Some(dir) => super::absolute(dir)?,
        None => ctx.root().join(PACKAGE_DIR),
    };
    let dest = super::absolute(&args.dest)?;

    let copied = import(&PackageLayout::new(package_root), &dest)?;

    ctx.shell().status(
        Status::Imported,
        format!("{} files into {}", copied.len(), dest.join("bin").display()),
    );
    Ok(())
}
