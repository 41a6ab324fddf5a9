//! Concurrency-safe read-modify-write for shared localization resource files
//!
//! Multiple independent processes may upsert entries in the same resx-style
//! resource file without losing each other's writes. Mutual exclusion is
//! layered: a per-path FIFO wait chain serializes callers inside one process,
//! and a sibling `<path>.lock` file (atomic create-new, stale-lock recovery,
//! bounded retry) arbitrates across processes.
//!
//! The surrounding protocol server, argument validation and sibling-file
//! discovery are external collaborators; this crate returns structured
//! results (`UpsertReport`, `LookupHit`, `FailureReport`) for them and logs
//! through `tracing` without ever depending on a subscriber being installed.

// Core modules
pub mod config;
pub mod error;
pub mod lock;
pub mod resource;
pub mod response;
pub mod workflow;

// Re-export commonly used types
pub use error::{LoclabError, Result};
pub use resource::{Document, LineEnding, Record, UpsertAction};
pub use workflow::{LookupHit, ResourceStore, UpsertReport};
