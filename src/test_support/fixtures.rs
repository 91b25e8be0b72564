//! Test fixtures for common test scenarios.
//!
//! Fake upstream source trees, install trees and in-memory release archives
//! shaped like the real LLVM source releases.

use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

/// An upstream `CMakeLists.txt` for a project called `project`.
pub fn upstream_cmakelists(project: &str) -> String {
    format!(
        "cmake_minimum_required(VERSION 2.8.8)\nproject({project})\nadd_subdirectory(lib)\n"
    )
}

/// Write a minimal unpatched source tree at `root`.
pub fn write_source_tree(root: &Path, project: &str) -> PathBuf {
    std::fs::create_dir_all(root.join("lib")).unwrap();
    std::fs::write(root.join("CMakeLists.txt"), upstream_cmakelists(project)).unwrap();
    std::fs::write(root.join("lib/CMakeLists.txt"), "add_library(x x.c)\n").unwrap();
    std::fs::write(root.join("lib/x.c"), "int x(void) { return 0; }\n").unwrap();
    root.to_path_buf()
}

/// Fixture for a component's install tree.
#[derive(Debug, Clone, Default)]
pub struct InstallTreeFixture {
    /// Files (path relative to the install prefix -> content).
    pub files: BTreeMap<PathBuf, String>,
}

impl InstallTreeFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// A plausible install tree for `name`: headers, a static and shared
    /// library, a CMake package file, an executable and data.
    pub fn component(name: &str) -> Self {
        InstallTreeFixture::new()
            .with_file(format!("include/{name}/{name}.h"), "#pragma once\n")
            .with_file(format!("lib/lib{name}.a"), "!<arch>\n")
            .with_file(format!("lib/lib{name}.so"), "\x7fELF")
            .with_file(format!("lib/lib{name}.la"), "libtool junk")
            .with_file(format!("lib/cmake/{name}/{name}Config.cmake"), "set(X 1)\n")
            .with_file(format!("bin/{name}-tool"), "#!/bin/sh\n")
            .with_file(format!("share/{name}/data.txt"), "data\n")
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Write the tree below `prefix`.
    pub fn write_to(&self, prefix: &Path) -> std::io::Result<()> {
        for (rel, content) in &self.files {
            let path = prefix.join(rel);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
        }
        Ok(())
    }
}

/// Every file below `root`, keyed by relative path, with its contents.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            (
                e.path().strip_prefix(root).unwrap().to_path_buf(),
                std::fs::read(e.path()).unwrap(),
            )
        })
        .collect()
}

/// Build a `.zip` release archive with a single top-level directory.
pub fn release_zip(top_dir: &str, files: &[(&str, &str)]) -> Vec<u8> {
    use zip::write::SimpleFileOptions;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    writer
        .add_directory(format!("{}/", top_dir), options)
        .unwrap();
    for (path, content) in files {
        writer
            .start_file(format!("{}/{}", top_dir, path), options)
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }

    writer.finish().unwrap().into_inner()
}

/// Build a `.tar.gz` release archive with a single top-level directory.
pub fn release_tar_gz(top_dir: &str, files: &[(&str, &str)]) -> Vec<u8> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tar::Builder;

    let mut tar_data = Vec::new();
    {
        let encoder = GzEncoder::new(&mut tar_data, Compression::default());
        let mut builder = Builder::new(encoder);

        let mut header = tar::Header::new_gnu();
        header.set_path(format!("{}/", top_dir)).unwrap();
        header.set_size(0);
        header.set_mode(0o755);
        header.set_entry_type(tar::EntryType::Directory);
        header.set_cksum();
        builder.append(&header, std::io::empty()).unwrap();

        for (path, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_path(format!("{}/{}", top_dir, path)).unwrap();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append(&header, Cursor::new(content.as_bytes()))
                .unwrap();
        }

        builder.into_inner().unwrap().finish().unwrap();
    }
    tar_data
}
