//! Out-of-tree CMake configure/build/install for one component.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::builder::options::{generator_args, BuildOptions};
use crate::core::component::Component;
use crate::core::layout::InstallTree;
use crate::core::settings::Settings;
use crate::util::dir::in_dir;
use crate::util::fs::{ensure_dir, remove_dir_all_if_exists};
use crate::util::process::{
    cmake_version, find_cmake, run_checked, CommandRunner, ProcessBuilder,
};
use crate::util::shell::{Shell, Status};

/// Drives CMake for each component in turn.
pub struct ComponentBuildDriver<'a> {
    settings: &'a Settings,
    runner: &'a mut dyn CommandRunner,
    shell: &'a Shell,
    cmake: PathBuf,
    /// Pass `-j<jobs>` to the native tool. Off on Windows, where the
    /// generator's tool does not take it.
    parallel: bool,
}

impl<'a> ComponentBuildDriver<'a> {
    /// Create a driver using the `cmake` found in PATH.
    pub fn new(
        settings: &'a Settings,
        runner: &'a mut dyn CommandRunner,
        shell: &'a Shell,
    ) -> Result<Self> {
        let Some(cmake) = find_cmake() else {
            bail!(
                "CMake not found\n\
                 \n\
                 CMake is required to build the clang components.\n\
                 Install CMake and ensure it's in your PATH."
            );
        };
        match cmake_version(&cmake) {
            Ok(version) => tracing::debug!("using {} (version {})", cmake.display(), version),
            Err(e) => tracing::warn!("could not determine CMake version: {:#}", e),
        }
        Ok(Self::with_cmake(settings, runner, shell, cmake))
    }

    /// Create a driver with an explicit CMake program.
    pub fn with_cmake(
        settings: &'a Settings,
        runner: &'a mut dyn CommandRunner,
        shell: &'a Shell,
        cmake: impl Into<PathBuf>,
    ) -> Self {
        ComponentBuildDriver {
            settings,
            runner,
            shell,
            cmake: cmake.into(),
            parallel: !cfg!(windows),
        }
    }

    /// Override whether the parallel jobs flag is passed.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Configure, build and install `component` from a clean build directory.
    ///
    /// The install directory holds a complete tree only if every step
    /// succeeded; the first failing step aborts the rest.
    pub fn build(&mut self, component: &Component, options: &BuildOptions) -> Result<InstallTree> {
        ensure_dir(&component.install_dir)?;
        remove_dir_all_if_exists(&component.build_dir)?;

        tracing::debug!(
            "building {} in {} with {} options",
            component.name(),
            component.build_dir.display(),
            options.len()
        );

        let steps = [
            (
                Status::Configuring,
                "configure",
                self.configure_command(component, options),
            ),
            (Status::Building, "build", self.build_command()),
            (Status::Installing, "install", self.install_command()),
        ];

        in_dir(&component.build_dir, |_| {
            for (status, step, cmd) in &steps {
                self.shell.status(*status, component.name());
                run_checked(&mut *self.runner, cmd)
                    .with_context(|| format!("failed to {} {}", step, component.name()))?;
            }
            Ok(())
        })?;

        Ok(component.install_tree())
    }

    /// `cmake <source> <generator flags> -D...`
    pub fn configure_command(&self, component: &Component, options: &BuildOptions) -> ProcessBuilder {
        ProcessBuilder::new(&self.cmake)
            .arg(&component.source_root)
            .args(generator_args(self.settings))
            .args(options.to_args())
    }

    /// `cmake --build . --config <type> [-- -j<jobs>]`
    pub fn build_command(&self) -> ProcessBuilder {
        let cmd = ProcessBuilder::new(&self.cmake)
            .args(["--build", ".", "--config"])
            .arg(self.settings.build_type.as_str());

        if self.parallel {
            cmd.arg("--").arg(format!("-j{}", self.settings.jobs))
        } else {
            cmd
        }
    }

    /// `cmake --build . --config <type> --target install`
    pub fn install_command(&self) -> ProcessBuilder {
        ProcessBuilder::new(&self.cmake)
            .args(["--build", ".", "--config"])
            .arg(self.settings.build_type.as_str())
            .args(["--target", "install"])
    }
}
