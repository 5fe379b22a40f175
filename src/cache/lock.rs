//! Advisory locking for cache roots
//!
//! One coarse lock per cache root serializes concurrent `ensure` calls for
//! the same dependency across processes: whoever wins runs the full
//! invalidate-fetch-mark sequence, the loser blocks and then finds a
//! completed cache. Different identities use different lock files and never
//! contend.

use crate::error::{FetchError, Result};
use crate::internal::fs_utils;
use fs2::FileExt;
use std::fs::File;
use std::path::Path;

/// RAII guard holding an exclusive lock on a cache root.
///
/// The OS lock is released when the guard drops. The lock file itself stays
/// on disk: removing it would let a process that re-creates the path lock a
/// different inode than one still held open by a peer.
#[derive(Debug)]
pub(crate) struct CacheLock {
    _file: File,
}

/// Block until the cache root's lock is held exclusively.
pub(crate) fn acquire(lock_path: &Path) -> Result<CacheLock> {
    fs_utils::ensure_parent_dir(lock_path)?;

    let file = File::create(lock_path)
        .map_err(|e| FetchError::io(format!("cannot create lock file {}", lock_path.display()), e))?;

    file.lock_exclusive()
        .map_err(|e| FetchError::io(format!("cannot lock {}", lock_path.display()), e))?;

    Ok(CacheLock { _file: file })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_lock_acquired_and_file_created() {
        let temp = tempdir().unwrap();
        let lock_path = temp.path().join("fmt/.10.2.1.lock");

        let _lock = acquire(&lock_path).unwrap();
        assert!(lock_path.exists());
    }

    #[test]
    fn test_lock_blocks_second_holder() {
        let temp = tempdir().unwrap();
        let lock_path = temp.path().join(".1.0.lock");

        let guard = acquire(&lock_path).unwrap();

        // A second handle cannot take the lock while the guard lives.
        let probe = File::create(&lock_path).unwrap();
        assert!(probe.try_lock_exclusive().is_err());

        drop(guard);
        assert!(probe.try_lock_exclusive().is_ok());
    }

    #[test]
    fn test_lock_file_survives_release() {
        let temp = tempdir().unwrap();
        let lock_path = temp.path().join(".1.0.lock");

        {
            let _lock = acquire(&lock_path).unwrap();
        }
        assert!(lock_path.exists());
    }
}
