//! File manifests: the relative paths that define a dependency's footprint
//!
//! A manifest lists every file that must exist under the cache root for the
//! dependency to be complete. Entries may optionally pin a SHA-256 digest;
//! pinned files are verified before being accepted into the cache and
//! re-fetched if an existing copy fails its check.

use crate::cache::MARKER_FILE;
use crate::error::{FetchError, Result};
use crate::identity::Identity;
use crate::internal::fs_utils;
use std::path::{Path, PathBuf};

/// One file to fetch: a relative destination path plus an optional digest pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    path: PathBuf,
    sha256: Option<String>,
}

impl ManifestEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sha256: None,
        }
    }

    /// Pin the entry to a SHA-256 digest (lowercase or uppercase hex).
    pub fn with_sha256(path: impl Into<PathBuf>, digest: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            sha256: Some(digest.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sha256(&self) -> Option<&str> {
        self.sha256.as_deref()
    }
}

/// An ordered list of manifest entries.
///
/// Order only affects fetch scheduling, never correctness.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new(entries: Vec<ManifestEntry>) -> Self {
        Self { entries }
    }

    /// Build a manifest of unpinned entries from plain relative paths.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            entries: paths.into_iter().map(ManifestEntry::new).collect(),
        }
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reject manifests that could write outside the cache root or collide
    /// with the reserved marker file. Runs before any filesystem write.
    pub(crate) fn validate(&self, identity: &Identity) -> Result<()> {
        let invalid = |reason: String| FetchError::InvalidManifest {
            name: identity.name.clone(),
            version: identity.version.clone(),
            reason,
        };

        if self.entries.is_empty() {
            return Err(invalid("manifest is empty".to_string()));
        }

        for entry in &self.entries {
            let path = entry.path();
            if !fs_utils::is_safe_path(path) {
                return Err(invalid(format!(
                    "entry '{}' is absolute or escapes the cache root",
                    path.display()
                )));
            }
            if path.as_os_str().is_empty() {
                return Err(invalid("entry has an empty path".to_string()));
            }
            if path.to_str().is_none() {
                return Err(invalid(format!(
                    "entry '{}' is not valid UTF-8 and cannot form a URL",
                    path.display()
                )));
            }
            if path == Path::new(MARKER_FILE) {
                return Err(invalid(format!(
                    "entry '{}' collides with the reserved version marker",
                    path.display()
                )));
            }
        }

        Ok(())
    }
}
