//! Centralized status output and progress display.
//!
//! Every phase of a forge run reports through [`Shell`]:
//! - Status lines in the familiar right-aligned `{status:>12} {message}` form
//! - Timed spans that print a `Finished` line when dropped
//! - Spinners (via indicatif) for long blocking calls like downloads
//!
//! All output goes to stderr so stdout stays free for `info --json`.

use std::fmt::Display;
use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: no status lines, no spinners
    Quiet,
    /// Default: status messages + spinners
    #[default]
    Normal,
    /// --verbose: status messages, no spinners (tracing output interleaves)
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses (green)
    Finished,
    Patched,
    Removed,
    Packaged,
    Imported,

    // In-progress statuses (cyan)
    Fetching,
    Configuring,
    Building,
    Installing,
    Packaging,

    // Info statuses (blue/default)
    Info,

    // Warning statuses (yellow)
    Skipped,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Finished => "Finished",
            Status::Patched => "Patched",
            Status::Removed => "Removed",
            Status::Packaged => "Packaged",
            Status::Imported => "Imported",
            Status::Fetching => "Fetching",
            Status::Configuring => "Configuring",
            Status::Building => "Building",
            Status::Installing => "Installing",
            Status::Packaging => "Packaging",
            Status::Info => "Info",
            Status::Skipped => "Skipped",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Finished
            | Status::Patched
            | Status::Removed
            | Status::Packaged
            | Status::Imported => "\x1b[1;32m",
            Status::Fetching
            | Status::Configuring
            | Status::Building
            | Status::Installing
            | Status::Packaging => "\x1b[1;36m",
            Status::Info => "\x1b[1;34m",
            Status::Skipped => "\x1b[1;33m",
        }
    }
}

const STATUS_WIDTH: usize = 12;

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
    interactive: bool,
}

impl Shell {
    /// Create a new shell.
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let interactive = io::stderr().is_terminal();
        let use_color = match color {
            ColorChoice::Auto => interactive,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };

        Shell {
            verbosity,
            use_color,
            interactive,
        }
    }

    /// Create a shell from CLI flags. Quiet wins over verbose.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice) -> Self {
        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        Shell::new(verbosity, color)
    }

    /// A shell that prints nothing. Used by library callers and tests.
    pub fn quiet() -> Self {
        Shell::new(Verbosity::Quiet, ColorChoice::Never)
    }

    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Print a status message.
    ///
    /// Nothing is printed in quiet mode.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_quiet() {
            return;
        }
        eprintln!("{} {}", self.format_status(status), msg);
    }

    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();
        if self.use_color {
            format!(
                "{}{:>width$}\x1b[0m",
                status.color_code(),
                text,
                width = STATUS_WIDTH
            )
        } else {
            format!("{:>width$}", text, width = STATUS_WIDTH)
        }
    }

    /// Start a timed span. The status line is printed immediately and a
    /// `Finished` line with the elapsed time is printed when the span is
    /// finished. A span dropped without `finish` prints nothing more, so a
    /// failing phase never reports success.
    pub fn span(self: &Arc<Self>, status: Status, msg: impl Display) -> Span {
        let message = msg.to_string();
        self.status(status, &message);
        Span {
            shell: Arc::clone(self),
            message,
            start: Instant::now(),
        }
    }

    /// Create a spinner for a blocking call of unknown length.
    ///
    /// Returns a no-op spinner when not attached to a terminal or when quiet
    /// or verbose.
    pub fn spinner(&self, msg: impl Display) -> Spinner {
        if !self.interactive || self.is_quiet() || self.is_verbose() {
            return Spinner { pb: None };
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Spinner { pb: Some(pb) }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, ColorChoice::Auto)
    }
}

/// A timed phase of work.
pub struct Span {
    shell: Arc<Shell>,
    message: String,
    start: Instant,
}

impl Span {
    /// Mark the span as finished and print the elapsed time.
    pub fn finish(self) {
        self.shell.status(
            Status::Finished,
            format!("{} in {}", self.message, format_duration(self.start.elapsed())),
        );
    }
}

/// Spinner wrapper that respects shell mode.
pub struct Spinner {
    pb: Option<ProgressBar>,
}

impl Spinner {
    /// Remove the spinner from the terminal.
    pub fn finish(&self) {
        if let Some(pb) = &self.pb {
            pb.finish_and_clear();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Format a duration in a human-readable way.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}
