use crate::lock::LockError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoclabError {
    // Input errors
    #[error("VALIDATION_ERROR: {0}")]
    Validation(String),

    // Document errors
    #[error("DOCUMENT_NOT_FOUND: resource file '{}' does not exist", path.display())]
    DocumentNotFound { path: PathBuf },

    #[error("PARSE_ERROR: malformed resource markup in '{}': {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    // Lock errors
    #[error("LOCK_TIMEOUT: could not acquire lock on '{}' after {attempts} attempts", path.display())]
    LockTimeout { path: PathBuf, attempts: u32 },

    // IO errors
    #[error("IO_ERROR: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LockError> for LoclabError {
    fn from(err: LockError) -> Self {
        match err {
            LockError::Timeout { path, attempts } => LoclabError::LockTimeout { path, attempts },
            LockError::Io { source, .. } => LoclabError::Io(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoclabError>;
