//! Single-file download with atomic placement
//!
//! Every download streams into a temporary file next to its destination and
//! is renamed into place only after the body is fully read (and the digest
//! verified, when pinned). A crashed or failed download leaves nothing at
//! the final path; the temp file is cleaned up on drop.

use super::retry::{self, AttemptError};
use crate::config::FetchConfig;
use crate::internal::hash;
use crate::output::{self, ProgressGuard};
use std::io::{Read, Write};
use std::path::Path;

const USER_AGENT: &str = concat!("pinfetch/", env!("CARGO_PKG_VERSION"));

/// Download `url` to `dest`, retrying per the config.
///
/// The parent directory of `dest` must already exist. Returns the byte
/// count on success, or the final failure reason.
pub(crate) fn fetch_file(
    url: &str,
    dest: &Path,
    expected_sha256: Option<&str>,
    config: &FetchConfig,
) -> std::result::Result<u64, String> {
    let filename = dest
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "download".to_string());

    retry::with_backoff(config, &filename, || {
        attempt(url, dest, expected_sha256, config, &filename)
    })
}

fn attempt(
    url: &str,
    dest: &Path,
    expected_sha256: Option<&str>,
    config: &FetchConfig,
    filename: &str,
) -> std::result::Result<u64, AttemptError> {
    let parent = dest
        .parent()
        .ok_or_else(|| AttemptError::Fatal("destination has no parent directory".to_string()))?;

    let pb = output::download_spinner(&format!("downloading {}", filename));
    let _guard = ProgressGuard::new(&pb);

    let response = ureq::get(url)
        .timeout(config.timeout)
        .set("User-Agent", USER_AGENT)
        .call()
        .map_err(retry::classify_http)?;

    if let Some(len) = response
        .header("content-length")
        .and_then(|s| s.parse().ok())
    {
        output::upgrade_to_bytes(&pb, len);
    }

    // Stage into a temp file in the destination directory so the final
    // rename stays on one filesystem and is atomic.
    let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(|e| {
        AttemptError::Fatal(format!("cannot create temp file in {}: {}", parent.display(), e))
    })?;

    let mut reader = response.into_reader();
    let mut buffer = [0u8; 8192];
    let mut total_bytes = 0u64;

    loop {
        let n = reader
            .read(&mut buffer)
            .map_err(|e| AttemptError::Transient(format!("read error: {}", e)))?;
        if n == 0 {
            break;
        }
        temp.write_all(&buffer[..n])
            .map_err(|e| AttemptError::Fatal(format!("write error: {}", e)))?;
        total_bytes += n as u64;
        pb.set_position(total_bytes);
    }

    if let Some(expected) = expected_sha256 {
        let actual = hash::sha256_file(temp.path())
            .map_err(|e| AttemptError::Fatal(format!("cannot hash {}: {}", filename, e)))?;
        if actual != expected.to_lowercase() {
            return Err(AttemptError::Fatal(format!(
                "sha256 mismatch for {}: expected {}, got {}",
                filename,
                expected.to_lowercase(),
                actual
            )));
        }
    }

    temp.as_file()
        .sync_all()
        .map_err(|e| AttemptError::Fatal(format!("sync error: {}", e)))?;
    temp.persist(dest)
        .map_err(|e| AttemptError::Fatal(format!("cannot move download into place: {}", e.error)))?;

    Ok(total_bytes)
}
