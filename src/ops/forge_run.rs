//! Implementation of `clang-forge run`: fetch, build and package in one go.

use std::path::Path;

use anyhow::Result;

use crate::builder::cmake::ComponentBuildDriver;
use crate::core::layout::PackageLayout;
use crate::core::settings::Settings;
use crate::ops::forge_build::build;
use crate::ops::forge_package::{package, CollectSummary};
use crate::ops::forge_source::{source, SourceResult};
use crate::util::dir::ScopedDir;
use crate::util::shell::Status;
use crate::util::GlobalContext;

/// Everything a full run produced.
#[derive(Debug)]
pub struct RunResult {
    pub source: SourceResult,
    pub package: PackageLayout,
    pub summary: CollectSummary,
}

/// Run the fixed sequence: fetch all components, patch and build the
/// buildable ones, then collect their install trees.
///
/// The working directory is the project root for the whole run and is
/// restored on return, including when a phase fails.
pub fn run(
    ctx: &GlobalContext,
    settings: &Settings,
    driver: &mut ComponentBuildDriver<'_>,
    package_dest: Option<&Path>,
) -> Result<RunResult> {
    let _root = ScopedDir::enter(ctx.root())?;
    let shell = ctx.shell();

    let span = shell.span(Status::Fetching, format!("sources for {}", settings.reference()));
    let source = source(ctx, settings)?;
    span.finish();

    let span = shell.span(Status::Building, format!("{} components", settings.reference()));
    build(ctx, settings, driver)?;
    span.finish();

    let (package, summary) = package(ctx, settings, package_dest)?;

    Ok(RunResult {
        source,
        package,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::component::fetch_plan;
    use crate::test_support::{
        release_zip, snapshot, upstream_cmakelists, InstallingExecutor, MockExecutor,
        MockProcessOutput,
    };
    use crate::util::shell::Shell;
    use serial_test::serial;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn serve_releases(server: &mut mockito::Server) {
        for spec in fetch_plan() {
            let top = format!("{}-3.8.0.src", spec.archive);
            let cmakelists = upstream_cmakelists(spec.name);
            let body = release_zip(&top, &[("CMakeLists.txt", cmakelists.as_str())]);
            server
                .mock("GET", format!("/{}.zip", top).as_str())
                .with_status(200)
                .with_body(body)
                .create();
        }
    }

    fn setup(server: &mockito::Server) -> (TempDir, GlobalContext, Settings) {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_root(tmp.path().canonicalize().unwrap())
            .unwrap()
            .with_shell(Shell::quiet())
            .without_home();
        let mut settings = Settings::defaults().unwrap();
        settings.url_template = format!("{}/{{component}}-{{version}}.src.zip", server.url());
        settings.build_dir = Some(PathBuf::from("build"));
        (tmp, ctx, settings)
    }

    #[test]
    #[serial(cwd)]
    fn test_full_run() {
        let mut server = mockito::Server::new();
        serve_releases(&mut server);
        let (_tmp, ctx, settings) = setup(&server);
        let shell = Shell::quiet();
        let mut exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::success());
        let before = std::env::current_dir().unwrap();

        let result = {
            let mut driver =
                ComponentBuildDriver::with_cmake(&settings, &mut exec, &shell, "cmake");
            run(&ctx, &settings, &mut driver, None).unwrap()
        };

        let root = ctx.root();
        assert_eq!(result.source.fetched.len(), 4);
        assert_eq!(result.package.root(), root.join("package"));
        assert!(root.join("clang/CMakeListsOriginal.txt").is_file());
        assert!(root.join("clang/tools/extra/CMakeLists.txt").is_file());
        // The nested tree is built through clang, never patched on its own
        assert!(!root.join("clang/tools/extra/CMakeListsOriginal.txt").exists());
        assert!(root.join("forge_buildinfo.cmake").is_file());
        assert_eq!(exec.calls().len(), 9);
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    #[serial(cwd)]
    fn test_two_clean_runs_produce_identical_packages() {
        let mut server = mockito::Server::new();
        serve_releases(&mut server);
        let shell = Shell::quiet();

        let mut packages = Vec::new();
        let mut roots = Vec::new();
        for _ in 0..2 {
            let (tmp, ctx, settings) = setup(&server);
            let mut exec = InstallingExecutor::new();
            let result = {
                let mut driver =
                    ComponentBuildDriver::with_cmake(&settings, &mut exec, &shell, "cmake");
                run(&ctx, &settings, &mut driver, None).unwrap()
            };
            assert_eq!(exec.inner.calls().len(), 9);
            packages.push((snapshot(result.package.root()), result.summary));
            roots.push(tmp);
        }

        let (first, first_summary) = &packages[0];
        let (second, second_summary) = &packages[1];
        assert!(first.contains_key(Path::new("include/clang/clang.h")));
        assert!(first.contains_key(Path::new("lib/liblibcxx.a")));
        assert!(first.contains_key(Path::new("lib/cmake/compiler-rt/compiler-rtConfig.cmake")));
        assert!(!first.contains_key(Path::new("lib/libclang.la")));
        assert_eq!(first_summary.total(), first.len());
        assert_eq!(first, second);
        assert_eq!(first_summary, second_summary);
    }

    #[test]
    #[serial(cwd)]
    fn test_failed_build_restores_cwd_and_skips_package() {
        let mut server = mockito::Server::new();
        serve_releases(&mut server);
        let (_tmp, ctx, settings) = setup(&server);
        let shell = Shell::quiet();
        let mut exec = MockExecutor::new();
        exec.expect_contains("--target install", MockProcessOutput::failure(2, "install failed"));
        exec.set_default(MockProcessOutput::success());
        let before = std::env::current_dir().unwrap();

        let err = {
            let mut driver =
                ComponentBuildDriver::with_cmake(&settings, &mut exec, &shell, "cmake");
            run(&ctx, &settings, &mut driver, None).unwrap_err()
        };

        assert!(format!("{:#}", err).contains("failed to install clang"));
        assert!(!ctx.root().join("package").exists());
        assert_eq!(std::env::current_dir().unwrap(), before);
    }
}
