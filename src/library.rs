//! Static-library target declaration
//!
//! Turns an already-populated cache root into a build-target description the
//! surrounding build system can link against. This module never downloads
//! anything and never mutates the cache; it validates that the declared
//! sources and include directory actually exist and hands back a plain
//! value. Inserting the target into a build graph is the caller's job.

use crate::error::{FetchError, Result};
use crate::internal::fs_utils;
use std::path::{Path, PathBuf};

/// Description of a static library compiled from fetched sources.
///
/// `public_include_dirs` propagate to dependents of the library, not to
/// unrelated targets. `position_independent` is always set so the archive
/// can be linked into shared objects; `default_build` is always off so the
/// library is built only when something depends on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryArtifact {
    pub name: String,
    /// Translation units, absolute paths under the cache root.
    pub source_files: Vec<PathBuf>,
    /// Include roots exposed to dependents as system include paths.
    pub public_include_dirs: Vec<PathBuf>,
    pub position_independent: bool,
    /// Whether a "build everything" default target includes this library.
    pub default_build: bool,
}

/// Declare a static library over files previously fetched into `cache_root`.
///
/// `sources` and `include_subdir` are relative to the root. Every source
/// must exist and the include subdirectory must be a directory.
pub fn declare_static_library(
    cache_root: &Path,
    sources: &[impl AsRef<Path>],
    include_subdir: impl AsRef<Path>,
    name: &str,
) -> Result<LibraryArtifact> {
    let mut source_files = Vec::with_capacity(sources.len());
    for source in sources {
        let rel = source.as_ref();
        let full = cache_root.join(rel);
        // An absolute or escaping path can never live under the root.
        if !fs_utils::is_safe_path(rel) || !full.is_file() {
            return Err(FetchError::MissingSource {
                root: cache_root.to_path_buf(),
                path: rel.to_path_buf(),
            });
        }
        source_files.push(full);
    }

    let include_rel = include_subdir.as_ref();
    let include_dir = cache_root.join(include_rel);
    if !fs_utils::is_safe_path(include_rel) || !include_dir.is_dir() {
        return Err(FetchError::MissingIncludeDir {
            root: cache_root.to_path_buf(),
            path: include_rel.to_path_buf(),
        });
    }

    Ok(LibraryArtifact {
        name: name.to_string(),
        source_files,
        public_include_dirs: vec![include_dir],
        position_independent: true,
        default_build: false,
    })
}
