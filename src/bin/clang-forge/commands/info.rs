//! `clang-forge info` command
//!
//! Shows what a run would do without touching the network or CMake.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::cli::{GlobalArgs, InfoArgs};
use clang_forge::builder::options::{generator_args, BuildOptions};
use clang_forge::core::component::{fetch_plan, Component, ComponentSpec};
use clang_forge::core::layout::BuildLayout;
use clang_forge::core::settings::Settings;

#[derive(Serialize)]
struct InfoReport<'a> {
    reference: String,
    settings: &'a Settings,
    root: PathBuf,
    build_root: PathBuf,
    install_root: PathBuf,
    buildinfo: PathBuf,
    generator_args: Vec<String>,
    components: Vec<ComponentReport>,
}

#[derive(Serialize)]
struct ComponentReport {
    #[serde(flatten)]
    spec: ComponentSpec,
    archive_dir: String,
    source_root: PathBuf,
    fetched: bool,
    patched: bool,
    /// Absent for components built as part of their parent.
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<BuildOptions>,
}

pub fn execute(global: &GlobalArgs, args: InfoArgs) -> Result<()> {
    let ctx = super::context(global)?;
    let settings = super::resolve_settings(&ctx, &args.settings)?;
    let layout = BuildLayout::new(ctx.root(), &settings);

    let components = fetch_plan()
        .map(|spec| {
            let component = Component::new(spec, settings.release(), &layout);
            ComponentReport {
                spec: *spec,
                archive_dir: component.archive_dir_name(),
                fetched: component.source_root.is_dir(),
                patched: component.is_patched(),
                options: spec
                    .needs_build
                    .then(|| BuildOptions::compose(&component, &settings, &layout)),
                source_root: component.source_root,
            }
        })
        .collect();

    let report = InfoReport {
        reference: settings.reference(),
        settings: &settings,
        root: layout.root().to_path_buf(),
        build_root: layout.build_root().to_path_buf(),
        install_root: layout.install_root().to_path_buf(),
        buildinfo: layout.buildinfo_path(),
        generator_args: generator_args(&settings),
        components,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text(&report);
    }
    Ok(())
}

fn print_text(report: &InfoReport<'_>) {
    println!("{}", report.reference);
    println!("  root:      {}", report.root.display());
    println!("  build:     {}", report.build_root.display());
    println!("  install:   {}", report.install_root.display());
    println!("  generator: {}", report.generator_args.join(" "));
    println!();

    for c in &report.components {
        let state = match (c.fetched, c.patched) {
            (false, _) => "not fetched",
            (true, false) => "fetched",
            (true, true) => "patched",
        };
        match c.spec.nested_under {
            Some(parent) => println!(
                "{} <- {} ({}, built with {})",
                c.spec.destination, c.archive_dir, state, parent
            ),
            None => println!("{} <- {} ({})", c.spec.destination, c.archive_dir, state),
        }

        if let Some(options) = &c.options {
            for arg in options.to_args() {
                println!("    {}", arg);
            }
        }
    }
}
