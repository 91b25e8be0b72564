//! Implementation of `clang-forge source`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::component::{self, fetch_plan, ComponentSpec};
use crate::core::layout::BuildLayout;
use crate::core::settings::Settings;
use crate::sources::ArchiveFetcher;
use crate::util::dir::ScopedDir;
use crate::util::shell::Status;
use crate::util::GlobalContext;

/// Outcome of the fetch phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceResult {
    /// Components downloaded by this run, in fetch order.
    pub fetched: Vec<&'static str>,
    /// Components whose source tree was already present.
    pub skipped: Vec<&'static str>,
}

/// Fetch every component into the project root, parents first.
pub fn source(ctx: &GlobalContext, settings: &Settings) -> Result<SourceResult> {
    let fetcher = ArchiveFetcher::new(settings, ctx.shell())?;
    let layout = BuildLayout::new(ctx.root(), settings);
    let release = settings.release();

    let _root = ScopedDir::enter(ctx.root())?;
    let mut result = SourceResult::default();

    for spec in fetch_plan() {
        if layout.source_root(spec).exists() {
            ctx.shell().status(
                Status::Skipped,
                format!("{} (already at {})", spec.name, spec.destination),
            );
            result.skipped.push(spec.name);
            continue;
        }

        check_parent(spec, &layout)?;
        fetcher
            .fetch(spec.archive, &release, Path::new(spec.destination))
            .with_context(|| format!("failed to fetch {} {}", spec.name, release))?;
        result.fetched.push(spec.name);
    }

    Ok(result)
}

fn check_parent(spec: &ComponentSpec, layout: &BuildLayout) -> Result<()> {
    if let Some(parent) = spec.nested_under.and_then(component::find) {
        let parent_root = layout.source_root(parent);
        if !parent_root.is_dir() {
            anyhow::bail!(
                "{} is extracted into {}, which has not been fetched",
                spec.name,
                parent_root.display()
            );
        }
    }
    Ok(())
}
