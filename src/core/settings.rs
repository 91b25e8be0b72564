//! Resolved per-run settings.
//!
//! [`Settings`] is the single source of truth a run is driven from. It is
//! resolved once from, lowest to highest precedence: built-in defaults, the
//! merged config files, `FORGE_*` environment variables and CLI overrides.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::util::config::Config;

/// Release that is built when nothing overrides it.
pub const DEFAULT_VERSION: &str = "3.8.0";

/// Archive location; `{component}` and `{version}` are substituted.
pub const DEFAULT_URL_TEMPLATE: &str =
    "https://bintray.com/artifact/download/polysquare/LLVM/{component}-{version}.src.zip";

pub const DEFAULT_NAME: &str = "clang";
pub const DEFAULT_USER: &str = "smspillaz";
pub const DEFAULT_CHANNEL: &str = "stable";
pub const DEFAULT_JOBS: usize = 4;

/// Environment variable overriding the release version.
pub const ENV_VERSION_OVERRIDE: &str = "FORGE_VERSION_OVERRIDE";
/// Environment variable overriding the package user.
pub const ENV_USERNAME: &str = "FORGE_USERNAME";
/// Environment variable overriding the package channel.
pub const ENV_CHANNEL: &str = "FORGE_CHANNEL";

/// CMake build type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            "relwithdebinfo" => Ok(BuildType::RelWithDebInfo),
            "minsizerel" => Ok(BuildType::MinSizeRel),
            _ => Err(format!(
                "invalid build type '{}'; expected Debug, Release, RelWithDebInfo or MinSizeRel",
                s
            )),
        }
    }
}

/// Values supplied on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub version: Option<String>,
    pub shared: Option<bool>,
    pub build_type: Option<BuildType>,
    pub arch: Option<String>,
    pub jobs: Option<usize>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub name: String,
    pub version: semver::Version,
    pub user: String,
    pub channel: String,
    pub url_template: String,
    pub shared: bool,
    pub build_type: BuildType,
    pub arch: String,
    pub jobs: usize,
    pub generator: Option<String>,
    pub build_dir: Option<PathBuf>,
    pub verbose_makefile: bool,
    pub dependencies: BTreeMap<String, PathBuf>,
}

impl Settings {
    /// Resolve settings from config, environment and CLI overrides.
    ///
    /// `env` looks up an environment variable; pass `|k| std::env::var(k).ok()`
    /// for the process environment.
    pub fn resolve(
        config: &Config,
        env: impl Fn(&str) -> Option<String>,
        overrides: &SettingsOverrides,
    ) -> Result<Self> {
        let version_str = overrides
            .version
            .clone()
            .or_else(|| env(ENV_VERSION_OVERRIDE))
            .or_else(|| config.package.version.clone())
            .unwrap_or_else(|| DEFAULT_VERSION.to_string());
        let version = semver::Version::parse(version_str.trim())
            .with_context(|| format!("invalid release version '{}'", version_str))?;

        let build_type = match overrides.build_type {
            Some(bt) => bt,
            None => match &config.build.build_type {
                Some(s) => s.parse().map_err(|e: String| anyhow::anyhow!(e))?,
                None => BuildType::default(),
            },
        };

        let jobs = overrides
            .jobs
            .or(config.build.jobs)
            .unwrap_or(DEFAULT_JOBS);
        if jobs == 0 {
            bail!("jobs must be at least 1");
        }

        let url_template = config
            .source
            .url_template
            .clone()
            .unwrap_or_else(|| DEFAULT_URL_TEMPLATE.to_string());
        if !url_template.contains("{component}") || !url_template.contains("{version}") {
            bail!(
                "url_template must contain both {{component}} and {{version}}: {}",
                url_template
            );
        }

        Ok(Settings {
            name: config
                .package
                .name
                .clone()
                .unwrap_or_else(|| DEFAULT_NAME.to_string()),
            version,
            user: env(ENV_USERNAME)
                .or_else(|| config.package.user.clone())
                .unwrap_or_else(|| DEFAULT_USER.to_string()),
            channel: env(ENV_CHANNEL)
                .or_else(|| config.package.channel.clone())
                .unwrap_or_else(|| DEFAULT_CHANNEL.to_string()),
            url_template,
            shared: overrides.shared.or(config.build.shared).unwrap_or(true),
            build_type,
            arch: overrides
                .arch
                .clone()
                .or_else(|| config.build.arch.clone())
                .unwrap_or_else(|| std::env::consts::ARCH.to_string()),
            jobs,
            generator: config.build.generator.clone(),
            build_dir: config.build.build_dir.clone(),
            verbose_makefile: config.build.verbose_makefile.unwrap_or(true),
            dependencies: config.dependencies.clone(),
        })
    }

    /// Settings with every default and no configured dependencies.
    pub fn defaults() -> Result<Self> {
        Self::resolve(&Config::default(), |_| None, &SettingsOverrides::default())
    }

    /// Release tag as used in archive names, e.g. `3.8.0`.
    pub fn release(&self) -> String {
        self.version.to_string()
    }

    /// Package reference, e.g. `clang/3.8.0@smspillaz/stable`.
    pub fn reference(&self) -> String {
        format!(
            "{}/{}@{}/{}",
            self.name, self.version, self.user, self.channel
        )
    }

    /// Value for `LLVM_TARGETS_TO_BUILD` derived from the arch setting.
    pub fn llvm_targets(&self) -> String {
        llvm_target_for_arch(&self.arch)
    }
}

/// Map an architecture setting onto an LLVM backend name.
///
/// Unknown values pass through verbatim so a raw target list like
/// `X86;ARM` can be given directly.
pub fn llvm_target_for_arch(arch: &str) -> String {
    match arch.to_lowercase().as_str() {
        "x86" | "x86_64" | "i386" | "i686" | "amd64" => "X86".to_string(),
        "arm" | "armv6" | "armv7" | "armv7hf" => "ARM".to_string(),
        "armv8" | "aarch64" | "arm64" => "AArch64".to_string(),
        _ => arch.to_string(),
    }
}
