//! Test utilities and mocks for clang-forge unit tests.
//!
//! Provides a scripted [`MockExecutor`] standing in for CMake, and fixtures
//! for fake source trees, install trees and release archives.
//!
//! # Example
//!
//! ```rust,ignore
//! use clang_forge::test_support::{MockExecutor, MockProcessOutput};
//!
//! let mut exec = MockExecutor::new();
//! exec.expect_prefix("cmake --build", MockProcessOutput::failure(2, "ninja: error"));
//! exec.set_default(MockProcessOutput::success());
//! ```

pub mod fixtures;

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::util::process::{CommandRunner, ProcessBuilder, RunStatus};

pub use fixtures::*;

/// Mock process output for testing command execution.
#[derive(Debug, Clone, Default)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard error, handed back as the run's stderr tail.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output.
    pub fn success() -> Self {
        MockProcessOutput::default()
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stderr: stderr.into(),
        }
    }
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
    /// Match using a regex pattern.
    Regex(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Regex(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(cmd))
                .unwrap_or(false),
            CommandPattern::Any => true,
        }
    }
}

/// Expectation for a command execution.
#[derive(Debug, Clone)]
pub struct CommandExpectation {
    /// Pattern to match against commands.
    pub pattern: CommandPattern,
    /// Output to return when matched.
    pub output: MockProcessOutput,
    /// Number of times this expectation can be used (None = unlimited).
    pub times: Option<usize>,
    /// Number of times this expectation has been used.
    pub used: usize,
}

impl CommandExpectation {
    /// Create a new expectation.
    pub fn new(pattern: CommandPattern, output: MockProcessOutput) -> Self {
        CommandExpectation {
            pattern,
            output,
            times: None,
            used: 0,
        }
    }

    /// Set the number of times this expectation can be used.
    pub fn times(mut self, n: usize) -> Self {
        self.times = Some(n);
        self
    }

    /// Check if this expectation can still be used.
    pub fn available(&self) -> bool {
        match self.times {
            Some(n) => self.used < n,
            None => true,
        }
    }
}

/// Mock process executor for testing command execution.
///
/// Records every command together with the working directory it ran in,
/// and answers with scripted outputs.
#[derive(Debug, Default)]
pub struct MockExecutor {
    expectations: Vec<CommandExpectation>,
    calls: Vec<String>,
    call_dirs: Vec<PathBuf>,
    default_output: Option<MockProcessOutput>,
}

impl MockExecutor {
    /// Create a new mock executor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&mut self, prefix: &str, output: MockProcessOutput) -> &mut Self {
        self.expectations.push(CommandExpectation::new(
            CommandPattern::StartsWith(prefix.to_string()),
            output,
        ));
        self
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&mut self, substring: &str, output: MockProcessOutput) -> &mut Self {
        self.expectations.push(CommandExpectation::new(
            CommandPattern::Contains(substring.to_string()),
            output,
        ));
        self
    }

    /// Add a custom expectation.
    pub fn expect_pattern(&mut self, expectation: CommandExpectation) -> &mut Self {
        self.expectations.push(expectation);
        self
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&mut self, output: MockProcessOutput) -> &mut Self {
        self.default_output = Some(output);
        self
    }

    /// Record a command and return the mock output.
    pub fn record(&mut self, full_cmd: String) -> Result<MockProcessOutput> {
        self.calls.push(full_cmd.clone());
        self.call_dirs
            .push(std::env::current_dir().unwrap_or_default());

        for exp in &mut self.expectations {
            if exp.pattern.matches(&full_cmd) && exp.available() {
                exp.used += 1;
                return Ok(exp.output.clone());
            }
        }

        if let Some(ref default) = self.default_output {
            return Ok(default.clone());
        }

        bail!("unexpected command: {}", full_cmd)
    }

    /// Get all commands that were called.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Working directory of each recorded call.
    pub fn call_dirs(&self) -> &[PathBuf] {
        &self.call_dirs
    }

    /// Verify that all expectations with a specific count were satisfied.
    pub fn verify(&self) -> Result<()> {
        for (i, exp) in self.expectations.iter().enumerate() {
            if let Some(expected) = exp.times {
                if exp.used != expected {
                    bail!(
                        "expectation {} was used {} times, expected {}",
                        i,
                        exp.used,
                        expected
                    );
                }
            }
        }
        Ok(())
    }
}

impl CommandRunner for MockExecutor {
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<RunStatus> {
        let output = self.record(cmd.display_command())?;
        Ok(RunStatus {
            code: Some(output.status),
            stderr: output.stderr,
        })
    }
}

/// A [`MockExecutor`] whose `--target install` step populates the install
/// prefix named at configure time with an [`InstallTreeFixture::component`]
/// tree, as a real CMake install would.
#[derive(Debug, Default)]
pub struct InstallingExecutor {
    pub inner: MockExecutor,
    prefix: Option<PathBuf>,
}

impl InstallingExecutor {
    pub fn new() -> Self {
        let mut inner = MockExecutor::new();
        inner.set_default(MockProcessOutput::success());
        InstallingExecutor {
            inner,
            prefix: None,
        }
    }
}

impl CommandRunner for InstallingExecutor {
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<RunStatus> {
        let line = cmd.display_command();
        if let Some(prefix) = line
            .split_whitespace()
            .find_map(|arg| arg.strip_prefix("-DCMAKE_INSTALL_PREFIX="))
        {
            self.prefix = Some(PathBuf::from(prefix));
        }

        let status = self.inner.run(cmd)?;
        if status.success() && line.ends_with("--target install") {
            let Some(prefix) = &self.prefix else {
                bail!("install before configure: {}", line);
            };
            let name = prefix
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            InstallTreeFixture::component(&name).write_to(prefix)?;
        }
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_executor_scripting() {
        let mut exec = MockExecutor::new();
        exec.expect_pattern(
            CommandExpectation::new(
                CommandPattern::Regex(r"^cmake --build .* --target install$".to_string()),
                MockProcessOutput::failure(2, "install failed"),
            )
            .times(1),
        );
        exec.expect_contains("--build", MockProcessOutput::success());

        let install = ProcessBuilder::new("cmake").args(["--build", ".", "--target", "install"]);
        let build = ProcessBuilder::new("cmake").args(["--build", "."]);

        let failed = exec.run(&install).unwrap();
        assert_eq!(failed.code, Some(2));
        assert_eq!(failed.stderr, "install failed");
        assert!(exec.run(&build).unwrap().success());
        // Exhausted expectation falls through to the next match
        assert!(exec.run(&install).unwrap().success());
        assert!(exec.run(&ProcessBuilder::new("ninja")).is_err());

        assert_eq!(exec.calls().len(), 4);
        exec.verify().unwrap();
    }

    #[test]
    fn test_installing_executor_writes_prefix() {
        let tmp = tempfile::TempDir::new().unwrap();
        let prefix = tmp.path().join("install/libcxx");
        let mut exec = InstallingExecutor::new();

        let configure = ProcessBuilder::new("cmake")
            .arg("/src/libcxx")
            .arg(format!("-DCMAKE_INSTALL_PREFIX={}", prefix.display()));
        let install = ProcessBuilder::new("cmake").args(["--build", ".", "--target", "install"]);
        exec.run(&configure).unwrap();
        assert!(!prefix.exists());
        exec.run(&install).unwrap();

        assert!(prefix.join("include/libcxx/libcxx.h").is_file());
        assert_eq!(exec.inner.calls().len(), 2);
    }

    #[test]
    fn test_verify_reports_unused_expectation() {
        let mut exec = MockExecutor::new();
        exec.expect_pattern(
            CommandExpectation::new(
                CommandPattern::Exact("cmake --version".to_string()),
                MockProcessOutput::success(),
            )
            .times(1),
        );

        assert!(exec.verify().is_err());
    }
}
