//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use clang_forge::core::settings::{BuildType, SettingsOverrides};
use clang_forge::util::shell::ColorChoice;

/// clang-forge - build the LLVM clang components as a package
#[derive(Parser)]
#[command(name = "clang-forge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    /// Project root (defaults to the current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download and extract every component's source release
    Source(SourceArgs),

    /// Patch, configure, build and install every buildable component
    Build(BuildArgs),

    /// Merge the install trees into the package layout
    Package(PackageArgs),

    /// Fetch, build and package in one go
    Run(RunArgs),

    /// Inject the build shim into a single source tree
    Patch(PatchArgs),

    /// Show the resolved settings, component plan and build options
    Info(InfoArgs),

    /// Copy runtime files from the package into a consumer directory
    Import(ImportArgs),

    /// Remove build artifacts
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Settings that can be overridden per invocation.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// LLVM release to build (e.g. 3.8.0)
    #[arg(long = "llvm-version", value_name = "VERSION")]
    pub llvm_version: Option<String>,

    /// Build shared libraries
    #[arg(long, conflicts_with = "static_libs")]
    pub shared: bool,

    /// Build static libraries
    #[arg(long = "static", id = "static_libs")]
    pub static_libs: bool,

    /// CMake build type (Debug, Release, RelWithDebInfo, MinSizeRel)
    #[arg(long, value_name = "TYPE")]
    pub build_type: Option<BuildType>,

    /// Target architecture; selects LLVM_TARGETS_TO_BUILD
    #[arg(long)]
    pub arch: Option<String>,

    /// Number of parallel build jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

impl SettingsArgs {
    pub fn overrides(&self) -> SettingsOverrides {
        let shared = match (self.shared, self.static_libs) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };

        SettingsOverrides {
            version: self.llvm_version.clone(),
            shared,
            build_type: self.build_type,
            arch: self.arch.clone(),
            jobs: self.jobs,
        }
    }
}

#[derive(Args)]
pub struct SourceArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Args)]
pub struct PackageArgs {
    /// Package directory (defaults to <root>/package)
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Args)]
pub struct RunArgs {
    /// Package directory (defaults to <root>/package)
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Args)]
pub struct PatchArgs {
    /// Source tree holding the upstream CMakeLists.txt
    pub dir: PathBuf,
}

#[derive(Args)]
pub struct InfoArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Consumer directory; files land in <DIR>/bin
    #[arg(long, value_name = "DIR")]
    pub dest: PathBuf,

    /// Package directory to import from (defaults to <root>/package)
    #[arg(long, value_name = "DIR")]
    pub package: Option<PathBuf>,
}

#[derive(Args)]
pub struct CleanArgs {
    /// Also remove fetched sources and the package directory
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
