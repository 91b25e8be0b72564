//! Implementation of `clang-forge clean`.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::component::fetch_plan;
use crate::core::layout::BuildLayout;
use crate::core::settings::Settings;
use crate::util::fs::remove_dir_all_if_exists;
use crate::util::GlobalContext;

#[derive(Debug, Clone, Copy, Default)]
pub struct CleanOptions {
    /// Also remove fetched sources, the package directory and the build info.
    pub all: bool,
}

/// Remove generated directories. Missing ones are not an error.
///
/// Returns the paths that existed and were removed.
pub fn clean(ctx: &GlobalContext, settings: &Settings, opts: CleanOptions) -> Result<Vec<PathBuf>> {
    let layout = BuildLayout::new(ctx.root(), settings);

    let mut targets = vec![
        layout.build_root().to_path_buf(),
        layout.install_root().to_path_buf(),
    ];
    if opts.all {
        // Nested trees go with their parent
        targets.extend(
            fetch_plan()
                .filter(|spec| spec.nested_under.is_none())
                .map(|spec| layout.source_root(spec)),
        );
        targets.push(layout.default_package_root());
    }

    let mut removed = Vec::new();
    for target in targets {
        if target.exists() {
            tracing::info!("removing {}", target.display());
            remove_dir_all_if_exists(&target)?;
            removed.push(target);
        }
    }

    if opts.all {
        let buildinfo = layout.buildinfo_path();
        if buildinfo.is_file() {
            std::fs::remove_file(&buildinfo)?;
            removed.push(buildinfo);
        }
    }

    Ok(removed)
}
