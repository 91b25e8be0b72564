//! Configuration file support for clang-forge.
//!
//! Two configuration file locations are merged:
//! - Global: `~/.clang-forge/config.toml` - User-wide defaults
//! - Project: `<root>/forge.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Every field is
//! optional here; defaults, environment variables and CLI flags are layered
//! on top by [`crate::core::settings::Settings::resolve`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the project configuration file.
pub const PROJECT_CONFIG_FILE: &str = "forge.toml";

/// clang-forge configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Package identity
    pub package: PackageConfig,

    /// Where source archives come from
    pub source: SourceConfig,

    /// Build settings
    pub build: BuildConfig,

    /// Resolved dependency roots, by dependency name
    pub dependencies: BTreeMap<String, PathBuf>,
}

/// Package identity settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    pub name: Option<String>,
    pub version: Option<String>,
    pub user: Option<String>,
    pub channel: Option<String>,
}

/// Source archive settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Download URL template with `{component}` and `{version}` placeholders
    pub url_template: Option<String>,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Build shared libraries (false = static)
    pub shared: Option<bool>,

    /// CMake build type (Debug, Release, RelWithDebInfo, MinSizeRel)
    pub build_type: Option<String>,

    /// Target architecture (x86, x86_64, armv7, armv8, ...)
    pub arch: Option<String>,

    /// Parallel jobs passed to the native build tool
    pub jobs: Option<usize>,

    /// CMake generator (`-G`)
    pub generator: Option<String>,

    /// Override for the build-scratch root
    pub build_dir: Option<PathBuf>,

    /// Pass CMAKE_VERBOSE_MAKEFILE=1
    pub verbose_makefile: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration, treating a missing file as empty.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load_if_exists(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Package settings
        if other.package.name.is_some() {
            self.package.name = other.package.name;
        }
        if other.package.version.is_some() {
            self.package.version = other.package.version;
        }
        if other.package.user.is_some() {
            self.package.user = other.package.user;
        }
        if other.package.channel.is_some() {
            self.package.channel = other.package.channel;
        }

        // Source settings
        if other.source.url_template.is_some() {
            self.source.url_template = other.source.url_template;
        }

        // Build settings
        if other.build.shared.is_some() {
            self.build.shared = other.build.shared;
        }
        if other.build.build_type.is_some() {
            self.build.build_type = other.build.build_type;
        }
        if other.build.arch.is_some() {
            self.build.arch = other.build.arch;
        }
        if other.build.jobs.is_some() {
            self.build.jobs = other.build.jobs;
        }
        if other.build.generator.is_some() {
            self.build.generator = other.build.generator;
        }
        if other.build.build_dir.is_some() {
            self.build.build_dir = other.build.build_dir;
        }
        if other.build.verbose_makefile.is_some() {
            self.build.verbose_makefile = other.build.verbose_makefile;
        }

        // Dependencies merge per key
        self.dependencies.extend(other.dependencies);
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (forge.toml)
/// 2. Global config (~/.clang-forge/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_if_exists(global_path)?);
    }

    config.merge(Config::load_if_exists(project_path)?);

    Ok(config)
}

/// Get the global config directory (~/.clang-forge).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".clang-forge"))
}

/// Get the project config path (<root>/forge.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG_FILE)
}
