//! Fetcher configuration
//!
//! The cache directory is an explicit value threaded through every operation
//! rather than process-global state, so tests run against isolated temporary
//! roots and two builds never share caches by accident.

use std::path::PathBuf;
use std::time::Duration;

/// Default per-attempt HTTP timeout in seconds
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts per file (first try plus retries)
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Default base backoff delay, doubled after each failed attempt
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 200;

/// Cap on the backoff delay between attempts
const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 2000;

/// Tunables for dependency acquisition.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Directory that holds every per-(name, version) cache root.
    pub cache_dir: PathBuf,
    /// Timeout applied to each network attempt.
    pub timeout: Duration,
    /// Total attempts per file before the fetch fails.
    pub retry_attempts: u32,
    /// Delay before the first retry; doubled after each transient failure.
    pub retry_base_delay: Duration,
    /// Upper bound on the backoff delay.
    pub retry_max_delay: Duration,
}

impl FetchConfig {
    /// Config with default network tunables and the given cache directory.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
            retry_max_delay: Duration::from_millis(DEFAULT_RETRY_MAX_DELAY_MS),
        }
    }
}
