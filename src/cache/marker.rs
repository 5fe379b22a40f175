//! Version marker: durable record of a completed fetch
//!
//! ## Format
//!
//! ```toml
//! # .pinfetch-version.toml - Auto-generated, do not edit manually
//!
//! name = "fmt"
//! version = "10.2.1"
//!
//! [metadata]
//! fetched_at_unix = 1754524800
//! ```
//!
//! Only `name` and `version` participate in cache validity; metadata is
//! informational.

use super::MARKER_FILE;
use crate::error::{FetchError, Result};
use crate::identity::Identity;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Marker file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct VersionMarker {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub metadata: MarkerMetadata,
}

/// Marker metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct MarkerMetadata {
    /// Unix timestamp of the completing fetch
    #[serde(default)]
    pub fetched_at_unix: Option<u64>,
}

/// Read the marker at a cache root.
///
/// Returns `None` for an absent or unparseable marker; both mean the root
/// cannot be trusted and wholesale invalidation reconciles them.
pub(crate) fn read(root: &Path) -> Result<Option<VersionMarker>> {
    let path = root.join(MARKER_FILE);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        // A marker path that is a directory reads as an error on Unix too;
        // treat anything unreadable-but-present as untrusted.
        Err(e) if e.kind() == std::io::ErrorKind::IsADirectory => return Ok(None),
        Err(e) => {
            return Err(FetchError::io(
                format!("cannot read version marker {}", path.display()),
                e,
            ));
        }
    };

    Ok(toml::from_str(&content).ok())
}

/// Write the marker for a completed fetch (atomic via temp file + rename).
pub(crate) fn write(root: &Path, identity: &Identity) -> Result<()> {
    let marker = VersionMarker {
        name: identity.name.clone(),
        version: identity.version.clone(),
        metadata: MarkerMetadata {
            fetched_at_unix: unix_now(),
        },
    };

    let path = root.join(MARKER_FILE);
    let content = toml::to_string_pretty(&marker).map_err(|e| FetchError::CacheCorruption {
        name: identity.name.clone(),
        version: identity.version.clone(),
        path: path.clone(),
        reason: format!("cannot serialize version marker: {}", e),
    })?;
    let header = format!("# {} - Auto-generated, do not edit manually\n\n", MARKER_FILE);

    let mut temp = tempfile::NamedTempFile::new_in(root)
        .map_err(|e| FetchError::io(format!("cannot create temp file in {}", root.display()), e))?;
    temp.write_all(header.as_bytes())
        .and_then(|_| temp.write_all(content.as_bytes()))
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| FetchError::io(format!("cannot write version marker {}", path.display()), e))?;
    temp.persist(&path)
        .map_err(|e| FetchError::io(format!("cannot write version marker {}", path.display()), e.error))?;

    Ok(())
}

fn unix_now() -> Option<u64> {
    std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
}
