//! Error types for lock arbitration

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LockError {
    /// Retry budget exhausted while the lockfile stayed held
    #[error("timed out waiting for lock on '{}' after {attempts} attempts", path.display())]
    Timeout { path: PathBuf, attempts: u32 },

    /// Unexpected filesystem failure during lock arbitration
    ///
    /// The expected already-exists case on lockfile creation is handled by
    /// the retry loop and never surfaces here.
    #[error("I/O error during {operation} on '{}': {source}", path.display())]
    Io {
        source: std::io::Error,
        path: PathBuf,
        operation: &'static str,
    },
}
