use super::ResourceStore;
use crate::error::{LoclabError, Result};
use crate::lock;
use crate::resource::{codec, ops, LineEnding, UpsertAction};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Structured outcome reported to the request dispatcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpsertReport {
    pub key: String,
    pub action: UpsertAction,
}

impl ResourceStore {
    /// Inserts or updates one key/value pair in the resource file at `path`.
    ///
    /// The whole cycle runs under the layered lock, and the on-disk state is
    /// read only after the lock is held, so the mutation always starts from
    /// the most recent committed write. `eol` overrides the detected
    /// line-ending mode for the write-back.
    ///
    /// A missing target file aborts with `DOCUMENT_NOT_FOUND` before any
    /// mutation; the lock is still released.
    pub async fn upsert(
        &self,
        path: &Path,
        key: &str,
        value: &str,
        eol: Option<LineEnding>,
    ) -> Result<UpsertReport> {
        if path.as_os_str().is_empty() {
            return Err(LoclabError::Validation("path must not be empty".to_string()));
        }
        if key.is_empty() {
            return Err(LoclabError::Validation("key must not be empty".to_string()));
        }

        let _guard = lock::acquire_lock(&self.chain, path, &self.settings).await?;

        let (mut doc, detected) = codec::load(path).await?;
        let action = ops::upsert(&mut doc, key, value);
        let text = codec::serialize(&doc, eol.unwrap_or(detected));
        replace_file(path, &text).await?;

        tracing::debug!("{:?} '{}' in {}", action, key, path.display());
        Ok(UpsertReport {
            key: key.to_string(),
            action,
        })
        // _guard drops here: lockfile removed, next caller woken
    }
}

/// Replaces the target file content in a single atomic step.
///
/// The new text lands in a sibling temp file first and a rename swaps it in,
/// so a reader that opens the target at any moment sees either the previous
/// or the next complete document, never a truncated one. The temp name is
/// fixed per target; the caller holds the lock, so it cannot collide.
async fn replace_file(path: &Path, text: &str) -> Result<()> {
    let staging = staging_path(path);
    tokio::fs::write(&staging, text).await?;
    if let Err(e) = tokio::fs::rename(&staging, path).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(LoclabError::Io(e));
    }
    Ok(())
}

fn staging_path(target: &Path) -> PathBuf {
    let mut os = target.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}
