//! RAII guard releasing both lock facets

use super::chain::ChainSlot;
use std::path::PathBuf;

/// Exclusive access to one target path.
///
/// Dropping the guard removes the cross-process lockfile and then resolves
/// the in-process chain slot, waking the next same-process caller. The
/// ordering matters: the lockfile must be gone before the next caller starts
/// its own acquisition, or it would burn backoff on our leftover.
#[derive(Debug)]
pub struct LockGuard {
    pub(crate) lockfile: PathBuf,
    // Dropped after the Drop body runs, i.e. after the lockfile is removed
    pub(crate) _slot: ChainSlot,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // A missing lockfile is fine: another process's stale-lock recovery
        // may have removed it already.
        if let Err(e) = std::fs::remove_file(&self.lockfile) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!("could not remove lockfile {}: {}", self.lockfile.display(), e);
            }
        } else {
            tracing::debug!("released lock on {}", self.lockfile.display());
        }
    }
}
