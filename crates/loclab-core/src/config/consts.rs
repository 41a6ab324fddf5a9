//! Reference values used across the crate

/// Lockfile arbitration policy
pub mod lock {
    use std::time::Duration;

    /// Age past which a lockfile is presumed abandoned and reclaimable
    pub const STALE_AFTER: Duration = Duration::from_secs(30);

    /// Fixed delay between contended acquisition attempts
    pub const RETRY_DELAY: Duration = Duration::from_millis(50);

    /// Contended attempts before acquisition fails
    /// (about five seconds of total waiting at the default delay)
    pub const MAX_RETRIES: u32 = 100;
}
