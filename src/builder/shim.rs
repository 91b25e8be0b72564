//! CMake entry-point shim.
//!
//! Upstream `CMakeLists.txt` files know nothing about our dependency roots.
//! [`ensure_patched`] moves the original aside to [`PRESERVED_ENTRY_POINT`]
//! and writes a small `CMakeLists.txt` in its place that loads the generated
//! build info, points CMake's search paths at the resolved dependencies and
//! then includes the preserved original.
//!
//! Whether a tree is patched is decided only by the presence of the
//! preserved file, never by looking at the current `CMakeLists.txt`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::core::layout::BUILDINFO_FILE;
use crate::util::fs::write_string;

/// The build-system entry point CMake reads first.
pub const ENTRY_POINT: &str = "CMakeLists.txt";

/// Where the original entry point is kept once the shim is in place.
pub const PRESERVED_ENTRY_POINT: &str = "CMakeListsOriginal.txt";

/// Minimum CMake version declared by the shim.
pub const SHIM_MINIMUM_CMAKE: &str = "2.8";

/// What [`ensure_patched`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The original was preserved and the shim written.
    Patched,
    /// The preserved original was already present; nothing changed.
    AlreadyPatched,
}

#[derive(Debug, Error)]
pub enum PatchError {
    #[error(
        "unsupported source layout in {}: neither CMakeLists.txt nor CMakeListsOriginal.txt exists",
        .source_root.display()
    )]
    UnsupportedLayout { source_root: std::path::PathBuf },
}

/// Render the shim that replaces a component's `CMakeLists.txt`.
///
/// The build info lives at the project root, one level above each
/// component's source root.
pub fn render_shim() -> String {
    format!(
        r#"cmake_minimum_required(VERSION {min})
include("${{CMAKE_CURRENT_LIST_DIR}}/../{buildinfo}")
forge_basic_setup()
set(CMAKE_PREFIX_PATH ${{FORGE_ROOTS}} ${{CMAKE_PREFIX_PATH}})
set(CMAKE_PROGRAM_PATH ${{FORGE_BIN_DIRS}} ${{CMAKE_PROGRAM_PATH}})
if(APPLE OR UNIX)
  foreach(_forge_lib_dir ${{FORGE_LIB_DIRS}})
    set(CMAKE_EXE_LINKER_FLAGS "${{CMAKE_EXE_LINKER_FLAGS}} -Wl,-rpath,${{_forge_lib_dir}}")
    set(CMAKE_SHARED_LINKER_FLAGS "${{CMAKE_SHARED_LINKER_FLAGS}} -Wl,-rpath,${{_forge_lib_dir}}")
  endforeach()
endif()
message(STATUS "forge: program path ${{CMAKE_PROGRAM_PATH}}")
include("${{CMAKE_CURRENT_LIST_DIR}}/{preserved}")
"#,
        min = SHIM_MINIMUM_CMAKE,
        buildinfo = BUILDINFO_FILE,
        preserved = PRESERVED_ENTRY_POINT,
    )
}

/// Install the shim in `source_root` unless it is already there.
pub fn ensure_patched(source_root: &Path) -> Result<PatchOutcome> {
    let preserved = source_root.join(PRESERVED_ENTRY_POINT);
    if preserved.is_file() {
        tracing::debug!("{} already patched", source_root.display());
        return Ok(PatchOutcome::AlreadyPatched);
    }

    let entry_point = source_root.join(ENTRY_POINT);
    if !entry_point.is_file() {
        return Err(PatchError::UnsupportedLayout {
            source_root: source_root.to_path_buf(),
        }
        .into());
    }

    fs::rename(&entry_point, &preserved).with_context(|| {
        format!(
            "failed to preserve {} as {}",
            entry_point.display(),
            preserved.display()
        )
    })?;
    write_string(&entry_point, &render_shim())?;

    tracing::info!("patched {}", entry_point.display());
    Ok(PatchOutcome::Patched)
}
