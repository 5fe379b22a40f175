//! Pinned third-party source fetcher for LevitateOS build pipelines
//!
//! Build targets sometimes vendor a handful of upstream files (a header-only
//! library, a single-TU implementation) instead of a full package. This
//! crate acquires those files for an exact pinned version and describes the
//! static library to compile from them:
//!
//! 1. [`Fetcher::ensure`] resolves a URL template against the pinned version,
//!    downloads every manifest file into `<cache_dir>/<name>/<version>/`,
//!    and records completion in a version marker. Complete caches are pure
//!    hits (zero network traffic); a version change wipes and repopulates
//!    the whole root so files from two versions never mix.
//! 2. [`declare_static_library`] validates a subset of the cached files and
//!    returns a [`LibraryArtifact`]: position-independent static library,
//!    public include path, excluded from default builds. The surrounding
//!    build system owns compiling and linking it.
//!
//! # Example
//!
//! ```no_run
//! use pinfetch::{declare_static_library, FetchConfig, Fetcher, Identity, Manifest, UrlTemplate};
//!
//! let fetcher = Fetcher::new(FetchConfig::new("/var/cache/leviso/deps"));
//! let root = fetcher.ensure(
//!     &Identity::new("fmt", "10.2.1"),
//!     &UrlTemplate::new("https://raw.githubusercontent.com/fmtlib/fmt/{VERSION}")?,
//!     &Manifest::from_paths([
//!         "include/fmt/core.h",
//!         "include/fmt/format.h",
//!         "src/format.cc",
//!     ]),
//! )?;
//!
//! let fmt = declare_static_library(&root, &["src/format.cc"], "include", "fmt")?;
//! assert!(fmt.position_independent);
//! # Ok::<(), pinfetch::FetchError>(())
//! ```
//!
//! Downloads are staged to temp files and renamed into place, so an
//! interrupted fetch never leaves a partial file at a final path. Concurrent
//! invocations for the same dependency serialize on a per-root advisory
//! lock.

mod cache;
mod config;
mod error;
mod fetch;
mod identity;
mod internal;
mod library;
mod manifest;
mod output;

pub use cache::MARKER_FILE;
pub use config::FetchConfig;
pub use error::{FetchError, Result};
pub use fetch::Fetcher;
pub use identity::{Identity, UrlTemplate, VERSION_PLACEHOLDER};
pub use library::{LibraryArtifact, declare_static_library};
pub use manifest::{Manifest, ManifestEntry};
