//! Implementation of `clang-forge build`.

use anyhow::{bail, Context, Result};

use crate::builder::buildinfo::write_buildinfo;
use crate::builder::cmake::ComponentBuildDriver;
use crate::builder::options::BuildOptions;
use crate::builder::shim::{ensure_patched, PatchOutcome};
use crate::core::component::{build_plan, Component};
use crate::core::layout::{BuildLayout, InstallTree};
use crate::core::settings::Settings;
use crate::util::dir::ScopedDir;
use crate::util::shell::Status;
use crate::util::GlobalContext;

/// Components bound to this run's layout, in build order.
pub fn planned_components(layout: &BuildLayout, settings: &Settings) -> Vec<Component> {
    let release = settings.release();
    build_plan()
        .map(|spec| Component::new(spec, release.as_str(), layout))
        .collect()
}

/// Write the build info, then patch and build every buildable component.
///
/// Stops at the first failing component; install trees of components built
/// before it are left in place.
pub fn build(
    ctx: &GlobalContext,
    settings: &Settings,
    driver: &mut ComponentBuildDriver<'_>,
) -> Result<Vec<InstallTree>> {
    let layout = BuildLayout::new(ctx.root(), settings);
    let components = planned_components(&layout, settings);

    for component in &components {
        if !component.source_root.is_dir() {
            bail!(
                "source tree for {} not found at {}\n\
                 hint: run `clang-forge source` first",
                component.name(),
                component.source_root.display()
            );
        }
    }

    let _root = ScopedDir::enter(layout.root())?;

    write_buildinfo(&layout.buildinfo_path(), &settings.dependencies)?;
    tracing::debug!(
        "wrote {} with {} dependencies",
        layout.buildinfo_path().display(),
        settings.dependencies.len()
    );

    let mut trees = Vec::with_capacity(components.len());
    for component in &components {
        match ensure_patched(&component.source_root)
            .with_context(|| format!("failed to patch {}", component.name()))?
        {
            PatchOutcome::Patched => ctx.shell().status(Status::Patched, component.name()),
            PatchOutcome::AlreadyPatched => {
                tracing::debug!("{} is already patched", component.name())
            }
        }

        let options = BuildOptions::compose(component, settings, &layout);
        trees.push(driver.build(component, &options)?);
    }

    Ok(trees)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::shim::PRESERVED_ENTRY_POINT;
    use crate::core::layout::BUILDINFO_FILE;
    use crate::test_support::{write_source_tree, MockExecutor, MockProcessOutput};
    use crate::util::shell::Shell;
    use serial_test::serial;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn setup() -> (TempDir, GlobalContext, Settings) {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().canonicalize().unwrap();
        let ctx = GlobalContext::with_root(&root)
            .unwrap()
            .with_shell(Shell::quiet())
            .without_home();
        let mut settings = Settings::defaults().unwrap();
        settings.build_dir = Some(PathBuf::from("build"));
        settings
            .dependencies
            .insert("llvm".to_string(), PathBuf::from("/opt/llvm"));
        for dir in ["clang", "compiler-rt", "libcxx"] {
            write_source_tree(&root.join(dir), dir);
        }
        (tmp, ctx, settings)
    }

    #[test]
    #[serial(cwd)]
    fn test_build_patches_and_builds_in_order() {
        let (_tmp, ctx, settings) = setup();
        let shell = Shell::quiet();
        let mut exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::success());

        let trees = {
            let mut driver =
                ComponentBuildDriver::with_cmake(&settings, &mut exec, &shell, "cmake");
            build(&ctx, &settings, &mut driver).unwrap()
        };

        let root = ctx.root();
        assert_eq!(trees.len(), 3);
        assert_eq!(trees[0].root(), root.join("install/clang"));
        assert_eq!(trees[2].root(), root.join("install/libcxx"));

        let buildinfo = std::fs::read_to_string(root.join(BUILDINFO_FILE)).unwrap();
        assert!(buildinfo.contains("FORGE_LLVM_ROOT"));

        for dir in ["clang", "compiler-rt", "libcxx"] {
            assert!(root.join(dir).join(PRESERVED_ENTRY_POINT).is_file());
        }
        // Nested component is never built on its own
        assert!(!root.join("build/clang-tools-extra").exists());

        let configures: Vec<_> = exec
            .calls()
            .iter()
            .filter(|c| !c.contains("--build"))
            .collect();
        assert_eq!(configures.len(), 3);
        assert!(configures[0].starts_with(&format!("cmake {}", root.join("clang").display())));
        assert!(configures[1].starts_with(&format!("cmake {}", root.join("compiler-rt").display())));
        assert!(configures[2].starts_with(&format!("cmake {}", root.join("libcxx").display())));
        assert_eq!(exec.calls().len(), 9);
    }

    #[test]
    #[serial(cwd)]
    fn test_build_twice_keeps_single_patch() {
        let (_tmp, ctx, settings) = setup();
        let shell = Shell::quiet();
        let mut exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::success());

        for _ in 0..2 {
            let mut driver =
                ComponentBuildDriver::with_cmake(&settings, &mut exec, &shell, "cmake");
            build(&ctx, &settings, &mut driver).unwrap();
        }

        let preserved =
            std::fs::read_to_string(ctx.root().join("clang").join(PRESERVED_ENTRY_POINT)).unwrap();
        assert!(preserved.contains("project(clang)"));
    }

    #[test]
    #[serial(cwd)]
    fn test_failing_component_stops_the_run() {
        let (_tmp, ctx, settings) = setup();
        let shell = Shell::quiet();
        let mut exec = MockExecutor::new();
        exec.expect_prefix(
            &format!("cmake {}", ctx.root().join("compiler-rt").display()),
            MockProcessOutput::failure(1, "CMake Error: could not find LLVMConfig.cmake"),
        );
        exec.set_default(MockProcessOutput::success());
        let before = std::env::current_dir().unwrap();

        let err = {
            let mut driver =
                ComponentBuildDriver::with_cmake(&settings, &mut exec, &shell, "cmake");
            build(&ctx, &settings, &mut driver).unwrap_err()
        };

        let message = format!("{:#}", err);
        assert!(message.contains("failed to configure compiler-rt"));
        assert!(message.contains("could not find LLVMConfig.cmake"));
        // clang: 3 steps, compiler-rt: configure only
        assert_eq!(exec.calls().len(), 4);
        assert!(!ctx.root().join("libcxx").join(PRESERVED_ENTRY_POINT).exists());
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_missing_source_tree() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_root(tmp.path())
            .unwrap()
            .with_shell(Shell::quiet())
            .without_home();
        let settings = Settings::defaults().unwrap();
        let shell = Shell::quiet();
        let mut exec = MockExecutor::new();
        let mut driver = ComponentBuildDriver::with_cmake(&settings, &mut exec, &shell, "cmake");

        let err = build(&ctx, &settings, &mut driver).unwrap_err();

        assert!(err.to_string().contains("source tree for clang not found"));
    }
}
