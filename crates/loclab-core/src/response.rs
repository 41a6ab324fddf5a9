//! Structured failure payloads for the dispatch boundary
//!
//! Expected domain failures travel back to the protocol layer as data, never
//! as panics or transport-level errors. The message carries enough context
//! (path, key, constraint) to diagnose without reading logs.

use crate::error::LoclabError;
use serde::Serialize;
use serde_json::{json, Value};

/// Error-flagged result shape expected by the request dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    pub error: bool,
    pub message: String,
}

impl FailureReport {
    pub fn from_error(err: &LoclabError) -> Self {
        Self {
            error: true,
            message: err.to_string(),
        }
    }

    pub fn payload(&self) -> Value {
        json!({ "error": self.error, "message": self.message })
    }
}

impl From<&LoclabError> for FailureReport {
    fn from(err: &LoclabError) -> Self {
        Self::from_error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn failure_report_names_the_path() {
        let err = LoclabError::DocumentNotFound {
            path: PathBuf::from("Strings.de.resx"),
        };
        let report = FailureReport::from_error(&err);

        assert!(report.error);
        assert!(report.message.contains("DOCUMENT_NOT_FOUND"));
        assert!(report.message.contains("Strings.de.resx"));
    }

    #[test]
    fn payload_matches_the_dispatcher_shape() {
        let report = FailureReport::from_error(&LoclabError::Validation(
            "key must not be empty".to_string(),
        ));
        let payload = report.payload();

        assert_eq!(payload["error"], true);
        assert_eq!(payload["message"], "VALIDATION_ERROR: key must not be empty");
    }
}
