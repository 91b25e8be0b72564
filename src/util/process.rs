//! Subprocess execution utilities.

use std::collections::VecDeque;
use std::ffi::OsStr;
use std::fmt;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use anyhow::{bail, Context, Result};

/// Builder for subprocess execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Execute the command with captured output and wait for completion.
    pub fn exec(&self) -> Result<Output> {
        let mut cmd = self.build_command();
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        cmd.output()
            .with_context(|| format!("failed to spawn `{}`", self.program.display()))
    }

    /// Execute with captured output and require success.
    pub fn exec_and_check(&self) -> Result<Output> {
        let output = self.exec()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "`{}` failed with exit code {:?}\n{}",
                self.display_command(),
                output.status.code(),
                stderr
            );
        }
        Ok(output)
    }

    /// Execute with inherited stdout. Stderr is echoed to the terminal as it
    /// arrives and its last `tail` lines are kept in the returned status.
    pub fn status(&self, tail: usize) -> Result<RunStatus> {
        let mut cmd = self.build_command();
        cmd.stderr(Stdio::piped());
        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to execute `{}`", self.display_command()))?;

        let mut kept = VecDeque::with_capacity(tail);
        if let Some(stderr) = child.stderr.take() {
            for line in BufReader::new(stderr).split(b'\n') {
                let line = line.context("failed to read subprocess stderr")?;
                let line = String::from_utf8_lossy(&line);
                let line = line.trim_end_matches('\r');
                eprintln!("{}", line);
                if tail == 0 {
                    continue;
                }
                if kept.len() == tail {
                    kept.pop_front();
                }
                kept.push_back(line.to_string());
            }
        }

        let status = child
            .wait()
            .with_context(|| format!("failed to wait for `{}`", self.display_command()))?;
        Ok(RunStatus {
            code: status.code(),
            stderr: Vec::from(kept).join("\n"),
        })
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

impl fmt::Display for ProcessBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_command())
    }
}

/// Exit status of a finished subprocess.
///
/// `code` is `None` when the process was terminated by a signal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatus {
    pub code: Option<i32>,
    /// Trailing stderr lines, reported when the command fails.
    pub stderr: String,
}

impl RunStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Something that can run a prepared subprocess to completion.
///
/// The build driver talks to this trait rather than spawning processes
/// directly so the configure/build/install sequence can be exercised without
/// a real CMake.
pub trait CommandRunner {
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<RunStatus>;
}

/// Stderr lines of a failed command carried into its error.
const STDERR_TAIL_LINES: usize = 40;

/// Runs commands for real, streaming their output to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<RunStatus> {
        tracing::debug!("running `{}`", cmd);
        cmd.status(STDERR_TAIL_LINES)
    }
}

/// Run a command and turn a non-zero exit into an error carrying the
/// command's trailing stderr.
pub fn run_checked(runner: &mut dyn CommandRunner, cmd: &ProcessBuilder) -> Result<()> {
    let status = runner.run(cmd)?;
    if status.success() {
        return Ok(());
    }

    let stderr = status.stderr.trim_end();
    let detail = if stderr.is_empty() {
        String::new()
    } else {
        format!("\n{}", stderr)
    };
    match status.code {
        Some(code) => bail!("`{}` failed with exit code {}{}", cmd, code, detail),
        None => bail!("`{}` was terminated by a signal{}", cmd, detail),
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Find CMake.
pub fn find_cmake() -> Option<PathBuf> {
    find_executable("cmake")
}

/// Detect the installed CMake version from `cmake --version`.
pub fn cmake_version(cmake: &Path) -> Result<semver::Version> {
    let output = ProcessBuilder::new(cmake).arg("--version").exec_and_check()?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_cmake_version(&stdout)
        .with_context(|| format!("unrecognized `cmake --version` output: {}", stdout.trim()))
}

fn parse_cmake_version(stdout: &str) -> Option<semver::Version> {
    stdout.lines().find_map(|line| {
        let version = line.strip_prefix("cmake version ")?.trim();
        // "3.20.5-dirty" -> "3.20.5"
        let clean = version.split('-').next().unwrap_or(version);
        clean.parse().ok()
    })
}
