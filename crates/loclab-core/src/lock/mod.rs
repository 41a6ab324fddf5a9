//! Layered locking for shared resource files
//!
//! Two facets guard every read-modify-write cycle on a path:
//!
//! - an in-process wait chain (strict FIFO per resolved path) so callers in
//!   the same process never interleave their read and write phases, and
//! - a cross-process `<path>.lock` file created with an atomic create-new,
//!   with staleness recovery and a bounded retry budget.
//!
//! Both facets release together through the [`LockGuard`], on success,
//! error and panic paths alike.

mod acquire;
mod chain;
mod error;
mod guard;

pub use error::LockError;
pub use guard::LockGuard;

pub(crate) use chain::WaitChain;

#[cfg(test)]
mod tests;

use crate::config::LockSettings;
use std::path::Path;
use std::sync::Arc;

/// Acquires exclusive access to `target` for one read-modify-write cycle.
///
/// Enters the in-process wait chain first, then arbitrates the cross-process
/// lockfile. The returned guard must live until the protected write
/// completes; dropping it removes the lockfile and wakes the next caller.
pub(crate) async fn acquire_lock(
    chain: &Arc<WaitChain>,
    target: &Path,
    settings: &LockSettings,
) -> Result<LockGuard, LockError> {
    acquire::acquire(chain, target, settings).await
}
