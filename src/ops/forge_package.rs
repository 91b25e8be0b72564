//! Implementation of `clang-forge package`.
//!
//! Merges the install trees of every built component into one package
//! layout. The merge is purely additive: files with the same relative path
//! are overwritten by later components, in build order.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Result};
use serde::Serialize;

use crate::core::layout::{BuildLayout, InstallSubdir, InstallTree, PackageLayout};
use crate::core::settings::Settings;
use crate::ops::forge_build::planned_components;
use crate::util::fs::{compile_patterns, copy_tree_matching, ensure_dir};
use crate::util::shell::Status;
use crate::util::GlobalContext;

/// Files copied into each top-level package directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectSummary {
    pub files: BTreeMap<InstallSubdir, usize>,
}

impl CollectSummary {
    pub fn total(&self) -> usize {
        self.files.values().sum()
    }

    pub fn count(&self, kind: InstallSubdir) -> usize {
        self.files.get(&kind).copied().unwrap_or(0)
    }
}

/// Copy the well-known subdirectories of every install tree into `package`.
///
/// Subdirectories missing from an install tree are skipped. `lib` is
/// filtered to library, header and CMake package files.
pub fn collect(trees: &[InstallTree], package: &PackageLayout) -> Result<CollectSummary> {
    ensure_dir(package.root())?;
    let mut summary = CollectSummary::default();

    for tree in trees {
        for kind in InstallSubdir::ALL {
            let src = tree.subdir(kind);
            if !src.is_dir() {
                tracing::debug!("{} has no {}/", tree.root().display(), kind);
                continue;
            }

            let patterns = compile_patterns(kind.patterns())?;
            let copied = copy_tree_matching(&src, &package.dir(kind), &patterns)?;
            tracing::debug!("copied {} files from {}", copied, src.display());
            *summary.files.entry(kind).or_default() += copied;
        }
    }

    Ok(summary)
}

/// Collect the install trees of this project into `dest`, or the default
/// package directory.
pub fn package(
    ctx: &GlobalContext,
    settings: &Settings,
    dest: Option<&Path>,
) -> Result<(PackageLayout, CollectSummary)> {
    let layout = BuildLayout::new(ctx.root(), settings);
    let trees: Vec<InstallTree> = planned_components(&layout, settings)
        .iter()
        .map(|c| c.install_tree())
        .collect();

    for tree in &trees {
        if !tree.root().is_dir() {
            bail!(
                "install tree not found: {}\n\
                 hint: run `clang-forge build` first",
                tree.root().display()
            );
        }
    }

    let package_root = match dest {
        Some(dest) => ctx.root().join(dest),
        None => layout.default_package_root(),
    };
    let package_layout = PackageLayout::new(package_root);
    let summary = collect(&trees, &package_layout)?;

    ctx.shell().status(
        Status::Packaged,
        format!(
            "{} ({} files) into {}",
            settings.reference(),
            summary.total(),
            package_layout.root().display()
        ),
    );

    Ok((package_layout, summary))
}
