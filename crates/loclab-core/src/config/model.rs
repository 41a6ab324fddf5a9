use super::consts;
use std::time::Duration;

/// Tunable policy for cross-process lockfile arbitration
///
/// The defaults are the reference values; embedders may override any of them
/// (shorter delays for tests, longer staleness windows for slow shares).
#[derive(Debug, Clone)]
pub struct LockSettings {
    /// Lockfile age past which the previous holder is treated as crashed
    pub stale_after: Duration,
    /// Delay before re-attempting a contended acquisition
    pub retry_delay: Duration,
    /// Contended attempts before giving up with a timeout error
    pub max_retries: u32,
}

impl Default for LockSettings {
    fn default() -> Self {
        Self {
            stale_after: consts::lock::STALE_AFTER,
            retry_delay: consts::lock::RETRY_DELAY,
            max_retries: consts::lock::MAX_RETRIES,
        }
    }
}
