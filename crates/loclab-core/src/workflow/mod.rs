//! The upsert workflow: lock, read latest state, mutate, write, release

mod lookup;
mod upsert;

pub use lookup::LookupHit;
pub use upsert::UpsertReport;


use crate::config::LockSettings;
use crate::lock::WaitChain;
use std::sync::Arc;

/// Entry point for all operations against protected resource files.
///
/// Clones share the underlying wait-chain table, so handing clones to
/// concurrent tasks keeps same-process callers serialized per path. One
/// store per process is the intended shape; cross-process safety holds
/// regardless through the lockfile.
#[derive(Debug, Clone)]
pub struct ResourceStore {
    pub(crate) chain: Arc<WaitChain>,
    pub(crate) settings: LockSettings,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::with_settings(LockSettings::default())
    }

    pub fn with_settings(settings: LockSettings) -> Self {
        Self {
            chain: Arc::new(WaitChain::new()),
            settings,
        }
    }
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::new()
    }
}
