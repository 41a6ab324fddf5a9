//! In-process wait chain: FIFO serialization of same-process callers per path

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Table of per-path wait chains.
///
/// An entry appears when a path first sees a caller and is removed once its
/// queue drains, so the table stays bounded over the process lifetime. The
/// inner `tokio::sync::Mutex` is fair: waiters are woken in arrival order,
/// which gives the strict FIFO hand-off the read-after-lock discipline
/// depends on.
#[derive(Debug, Default)]
pub(crate) struct WaitChain {
    table: Mutex<HashMap<PathBuf, Arc<AsyncMutex<()>>>>,
}

impl WaitChain {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Waits until every earlier same-process caller on `path` has finished.
    ///
    /// The returned slot must stay alive for the whole protected operation.
    /// Dropping it wakes the next caller in line whether or not the holder's
    /// operation succeeded; one failed operation never blocks the next.
    pub(crate) async fn enter(self: &Arc<Self>, path: &Path) -> ChainSlot {
        let cell = {
            let mut table = self.table.lock().expect("wait-chain table poisoned");
            table.entry(path.to_path_buf()).or_default().clone()
        };
        let guard = cell.clone().lock_owned().await;
        ChainSlot {
            chain: Arc::clone(self),
            path: path.to_path_buf(),
            cell,
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.table.lock().expect("wait-chain table poisoned").len()
    }
}

/// A caller's position in one path's wait chain (RAII).
#[derive(Debug)]
pub(crate) struct ChainSlot {
    chain: Arc<WaitChain>,
    path: PathBuf,
    cell: Arc<AsyncMutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ChainSlot {
    fn drop(&mut self) {
        // Wake the next caller first, then deregister the path if nobody is
        // queued behind us. Cell clones are only handed out under the table
        // lock, so the strong-count check cannot race a new arrival.
        self.guard.take();
        let Ok(mut table) = self.chain.table.lock() else {
            return;
        };
        let drained = table
            .get(&self.path)
            .map(|current| Arc::ptr_eq(current, &self.cell) && Arc::strong_count(&self.cell) == 2)
            .unwrap_or(false);
        if drained {
            table.remove(&self.path);
        }
    }
}
