//! Dependency acquisition
//!
//! [`Fetcher::ensure`] is the single entry point: validate inputs, lock the
//! cache root, reconcile whatever is already on disk, download what is
//! missing, and only then write the version marker. The marker is written
//! last so a crash at any earlier point leaves a root the next run refuses
//! to trust.

mod download;
mod retry;

use crate::cache::{self, lock, marker};
use crate::config::FetchConfig;
use crate::error::{FetchError, Result};
use crate::identity::{self, Identity, UrlTemplate};
use crate::internal::{fs_utils, hash};
use crate::manifest::{Manifest, ManifestEntry};
use crate::output;
use std::path::{Path, PathBuf};

/// Acquires pinned dependencies into a local cache.
///
/// # Example
/// ```no_run
/// use pinfetch::{FetchConfig, Fetcher, Identity, Manifest, UrlTemplate};
///
/// let fetcher = Fetcher::new(FetchConfig::new("/var/cache/deps"));
/// let root = fetcher.ensure(
///     &Identity::new("fmt", "10.2.1"),
///     &UrlTemplate::new("https://example.com/fmt/{VERSION}")?,
///     &Manifest::from_paths(["include/fmt/core.h", "src/format.cc"]),
/// )?;
/// assert!(root.join("src/format.cc").exists());
/// # Ok::<(), pinfetch::FetchError>(())
/// ```
#[derive(Debug)]
pub struct Fetcher {
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Cache root a dependency resolves to. Pure path computation; does not
    /// touch the filesystem or imply the cache is populated.
    pub fn cache_root(&self, identity: &Identity) -> PathBuf {
        cache::root_for(&self.config.cache_dir, identity)
    }

    /// Make every manifest file present under the dependency's cache root
    /// for exactly the pinned version, downloading what is missing.
    ///
    /// A complete cache is a pure hit: no network traffic, no writes. A
    /// root holding another version (or unmarked leftovers) is wiped and
    /// repopulated in full. Concurrent calls for the same identity
    /// serialize on an advisory lock and converge to the same state.
    pub fn ensure(
        &self,
        identity: &Identity,
        template: &UrlTemplate,
        manifest: &Manifest,
    ) -> Result<PathBuf> {
        identity.validate()?;
        manifest.validate(identity)?;

        let root = cache::root_for(&self.config.cache_dir, identity);
        let _lock = lock::acquire(&cache::lock_path_for(&self.config.cache_dir, identity))?;

        let trusted = cache::prepare(&root, identity)?;

        let mut pending: Vec<&ManifestEntry> = Vec::new();
        for entry in manifest.entries() {
            let dest = root.join(entry.path());
            if trusted && entry_is_cached(&dest, entry)? {
                continue;
            }
            pending.push(entry);
        }

        if pending.is_empty() {
            output::skip(&format!("{} already cached", identity));
            return Ok(root);
        }

        output::action(&format!("Fetching {}", identity));
        let base = template.resolve(&identity.version);

        for entry in pending {
            let rel = entry.path().to_str().ok_or_else(|| FetchError::InvalidManifest {
                name: identity.name.clone(),
                version: identity.version.clone(),
                reason: format!("entry '{}' is not valid UTF-8", entry.path().display()),
            })?;
            let url = identity::join_url(&base, rel);
            let dest = root.join(entry.path());

            fs_utils::ensure_parent_dir(&dest)?;
            let bytes = download::fetch_file(&url, &dest, entry.sha256(), &self.config)
                .map_err(|reason| FetchError::Network {
                    name: identity.name.clone(),
                    version: identity.version.clone(),
                    url,
                    reason,
                })?;
            output::detail(&format!("downloaded {} ({} bytes)", rel, bytes));
        }

        // All files are in place; record completion.
        marker::write(&root, identity)?;
        Ok(root)
    }
}

/// Is an already-cached file acceptable for this entry?
///
/// A pinned entry failing its digest counts as corrupt: the stale copy is
/// removed and the entry re-fetched.
fn entry_is_cached(dest: &Path, entry: &ManifestEntry) -> Result<bool> {
    if !dest.is_file() {
        return Ok(false);
    }
    let Some(expected) = entry.sha256() else {
        return Ok(true);
    };

    let matches = hash::file_matches_sha256(dest, expected)
        .map_err(|e| FetchError::io(format!("cannot hash cached file {}", dest.display()), e))?;
    if matches {
        Ok(true)
    } else {
        output::warning(&format!(
            "cached file {} failed its checksum, refetching",
            dest.display()
        ));
        std::fs::remove_file(dest)
            .map_err(|e| FetchError::io(format!("cannot remove corrupt file {}", dest.display()), e))?;
        Ok(false)
    }
}
