//! SHA-256 file digests for manifest pinning and cache integrity checks

use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

/// Chunk size for reading files during hashing (1MB)
const CHUNK_SIZE: usize = 1024 * 1024;

/// Compute the lowercase hex SHA-256 digest of a file.
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Check a file against an expected digest (case-insensitive).
pub fn file_matches_sha256(path: &Path, expected: &str) -> std::io::Result<bool> {
    Ok(sha256_file(path)? == expected.to_lowercase())
}
