//! Cache layout and invalidation
//!
//! Every `{name, version}` pair owns one directory under the cache dir:
//! `<cache_dir>/<name>/<version>/`. The version marker inside that root is
//! the sole durable record that a fetch completed; a root without a matching
//! marker is never trusted. Invalidation is wholesale: the entire root is
//! removed so files from two versions can never coexist at the same paths.

pub(crate) mod lock;
pub(crate) mod marker;

use crate::error::{FetchError, Result};
use crate::identity::Identity;
use crate::output;
use std::path::{Path, PathBuf};

/// Reserved file name of the version marker inside each cache root.
pub const MARKER_FILE: &str = ".pinfetch-version.toml";

/// Cache root for a pinned dependency.
///
/// Name and version are separate directory levels, so `a 1.2-rc` and
/// `a-1.2 rc` can never resolve to the same root.
pub(crate) fn root_for(cache_dir: &Path, identity: &Identity) -> PathBuf {
    cache_dir.join(&identity.name).join(&identity.version)
}

/// Lock file guarding a cache root.
///
/// Sibling of the root, not inside it: invalidation removes the whole root
/// and must not delete the lock another process is blocked on.
pub(crate) fn lock_path_for(cache_dir: &Path, identity: &Identity) -> PathBuf {
    cache_dir
        .join(&identity.name)
        .join(format!(".{}.lock", identity.version))
}

/// Bring a cache root into a state fetching can trust. Caller holds the lock.
///
/// Returns `true` when the root carries a marker for the requested version
/// and its existing files may be reused. Any other pre-existing state (a
/// marker for a different version or dependency, or files without a marker
/// at all) is wiped before fetching, since there is no record of which
/// version produced it.
pub(crate) fn prepare(root: &Path, identity: &Identity) -> Result<bool> {
    if !root.exists() {
        create_root(root)?;
        return Ok(false);
    }

    if !root.is_dir() {
        return Err(FetchError::CacheCorruption {
            name: identity.name.clone(),
            version: identity.version.clone(),
            path: root.to_path_buf(),
            reason: "exists but is not a directory".to_string(),
        });
    }

    match marker::read(root)? {
        Some(m) if m.name == identity.name && m.version == identity.version => Ok(true),
        Some(m) => {
            output::detail(&format!(
                "cache at {} holds {} {}, invalidating",
                root.display(),
                m.name,
                m.version
            ));
            invalidate(root)?;
            create_root(root)?;
            Ok(false)
        }
        None => {
            if root.read_dir().map_or(false, |mut d| d.next().is_some()) {
                output::detail(&format!(
                    "cache at {} has no completion marker, refetching",
                    root.display()
                ));
            }
            invalidate(root)?;
            create_root(root)?;
            Ok(false)
        }
    }
}

/// Remove a cache root and everything under it.
pub(crate) fn invalidate(root: &Path) -> Result<()> {
    std::fs::remove_dir_all(root)
        .map_err(|e| FetchError::io(format!("cannot remove stale cache {}", root.display()), e))
}

fn create_root(root: &Path) -> Result<()> {
    std::fs::create_dir_all(root)
        .map_err(|e| FetchError::io(format!("cannot create cache root {}", root.display()), e))
}
