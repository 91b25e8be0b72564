//! Source release download and extraction.
//!
//! A component release is a single archive holding one top-level directory
//! named `<component>-<release>.src`. [`ArchiveFetcher::fetch`] downloads it
//! into the current directory, extracts it, deletes the archive and moves
//! the extracted directory to its destination.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use url::Url;

use crate::core::settings::Settings;
use crate::util::fs::{ensure_dir, move_path, remove_dir_all_if_exists};
use crate::util::shell::{Shell, Status};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("unsupported archive format: {url} (expected .zip, .tar.gz or .tgz)")]
    UnsupportedArchive { url: String },

    #[error("failed to download {url}: HTTP {status}")]
    Http { url: String, status: u16 },

    #[error("archive does not contain {expected}/ (found: {})", .found.join(", "))]
    UnexpectedLayout { expected: String, found: Vec<String> },

    #[error("destination already exists: {}", .path.display())]
    DestinationExists { path: PathBuf },
}

/// Archive formats understood by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
}

impl ArchiveFormat {
    /// Determine the format from an archive file name.
    pub fn from_file_name(name: &str) -> Option<Self> {
        if name.ends_with(".zip") {
            Some(ArchiveFormat::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(ArchiveFormat::TarGz)
        } else {
            None
        }
    }
}

/// Substitute `{component}` and `{version}` into a URL template.
pub fn archive_url(template: &str, component: &str, release: &str) -> Result<Url> {
    let url = template
        .replace("{component}", component)
        .replace("{version}", release);
    Url::parse(&url).with_context(|| format!("invalid archive URL: {}", url))
}

/// Downloads and unpacks component source releases.
pub struct ArchiveFetcher<'a> {
    url_template: String,
    client: reqwest::blocking::Client,
    shell: &'a Shell,
}

impl<'a> ArchiveFetcher<'a> {
    pub fn new(settings: &Settings, shell: &'a Shell) -> Result<Self> {
        Self::with_template(&settings.url_template, shell)
    }

    pub fn with_template(url_template: &str, shell: &'a Shell) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("clang-forge/", env!("CARGO_PKG_VERSION")))
            .timeout(None)
            .build()
            .context("failed to create HTTP client")?;

        Ok(ArchiveFetcher {
            url_template: url_template.to_string(),
            client,
            shell,
        })
    }

    /// Fetch `component` at `release` into `destination`.
    ///
    /// Works relative to the current directory: the archive is downloaded
    /// and extracted here and `destination` is resolved against it. Returns
    /// the absolute source root.
    pub fn fetch(&self, component: &str, release: &str, destination: &Path) -> Result<PathBuf> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let destination = cwd.join(destination);
        if destination.exists() {
            return Err(FetchError::DestinationExists { path: destination }.into());
        }

        let url = archive_url(&self.url_template, component, release)?;
        let file_name = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .with_context(|| format!("archive URL has no file name: {}", url))?;
        let format = ArchiveFormat::from_file_name(&file_name).ok_or_else(|| {
            FetchError::UnsupportedArchive {
                url: url.to_string(),
            }
        })?;

        self.shell
            .status(Status::Fetching, format!("{} {}", component, release));
        let archive_path = cwd.join(&file_name);
        self.download(&url, &archive_path)?;

        let staging = cwd.join(format!(".{}.staging", file_name));
        remove_dir_all_if_exists(&staging)?;
        let extracted = extract(&archive_path, format, &staging);
        fs::remove_file(&archive_path)
            .with_context(|| format!("failed to remove {}", archive_path.display()))?;
        if let Err(e) = extracted {
            let _ = remove_dir_all_if_exists(&staging);
            return Err(e.context(format!("failed to extract {}", file_name)));
        }

        let expected = format!("{}-{}.src", component, release);
        let top_level = staging.join(&expected);
        if !top_level.is_dir() {
            let found = list_names(&staging);
            remove_dir_all_if_exists(&staging)?;
            return Err(FetchError::UnexpectedLayout { expected, found }.into());
        }

        move_path(&top_level, &destination)?;
        remove_dir_all_if_exists(&staging)?;

        tracing::info!("extracted {} to {}", expected, destination.display());
        Ok(destination)
    }

    fn download(&self, url: &Url, dest: &Path) -> Result<()> {
        tracing::info!("download {}", url);
        let spinner = self.shell.spinner(format!("downloading {}", url));

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .with_context(|| format!("failed to download {}", url))?;

        if !response.status().is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: response.status().as_u16(),
            }
            .into());
        }

        let mut file = File::create(dest)
            .with_context(|| format!("failed to create {}", dest.display()))?;
        let written = response
            .copy_to(&mut file)
            .with_context(|| format!("failed to read response body from {}", url));
        spinner.finish();

        match written {
            Ok(bytes) => {
                tracing::debug!("downloaded {} bytes to {}", bytes, dest.display());
                Ok(())
            }
            Err(e) => {
                drop(file);
                let _ = fs::remove_file(dest);
                Err(e)
            }
        }
    }
}

/// Extract an archive into `dest`.
pub fn extract(archive_path: &Path, format: ArchiveFormat, dest: &Path) -> Result<()> {
    ensure_dir(dest)?;
    let file = File::open(archive_path)
        .with_context(|| format!("failed to open {}", archive_path.display()))?;

    match format {
        ArchiveFormat::Zip => {
            let mut archive =
                zip::ZipArchive::new(BufReader::new(file)).context("failed to open zip archive")?;
            archive
                .extract(dest)
                .context("failed to extract zip archive")?;
        }
        ArchiveFormat::TarGz => {
            let decoder = flate2::read::GzDecoder::new(BufReader::new(file));
            let mut archive = tar::Archive::new(decoder);
            archive
                .unpack(dest)
                .context("failed to extract tar.gz archive")?;
        }
    }

    Ok(())
}

fn list_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
