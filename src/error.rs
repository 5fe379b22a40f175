//! Error types for pinfetch
//!
//! Every fallible operation in the crate returns [`Result`]. Variants carry
//! the dependency identity and the failing path or URL so a build log points
//! straight at the broken input.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pinfetch operations
pub type Result<T> = std::result::Result<T, FetchError>;

/// All errors that can occur while fetching or declaring a dependency
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid dependency identity: {reason}")]
    InvalidIdentity { reason: String },

    #[error(
        "invalid URL template '{template}': expected exactly one {{VERSION}} placeholder, found {found}"
    )]
    Template { template: String, found: usize },

    #[error("invalid manifest for {name} {version}: {reason}")]
    InvalidManifest {
        name: String,
        version: String,
        reason: String,
    },

    #[error("download failed for {name} {version} from {url}: {reason}")]
    Network {
        name: String,
        version: String,
        url: String,
        reason: String,
    },

    #[error(
        "cache for {name} {version} is corrupt: {} {reason}. Remove it manually and re-run.",
        .path.display()
    )]
    CacheCorruption {
        name: String,
        version: String,
        path: PathBuf,
        reason: String,
    },

    #[error("source file '{}' not found under cache root {}", .path.display(), .root.display())]
    MissingSource { root: PathBuf, path: PathBuf },

    #[error("include directory '{}' not found under cache root {}", .path.display(), .root.display())]
    MissingIncludeDir { root: PathBuf, path: PathBuf },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Wrap an IO error with a human-readable context line.
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
