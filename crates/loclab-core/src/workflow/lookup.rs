use super::ResourceStore;
use crate::error::{LoclabError, Result};
use crate::resource::{codec, ops};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One match from a multi-file lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupHit {
    pub path: PathBuf,
    pub value: String,
}

impl ResourceStore {
    /// Looks up `key` in a single resource file.
    ///
    /// Read-only, no lock: writers swap new content in with an atomic
    /// rename, so a reader observes either the previous or the next
    /// complete state, never a partial one.
    pub async fn lookup(&self, path: &Path, key: &str) -> Result<Option<String>> {
        let (doc, _) = codec::load(path).await?;
        Ok(ops::find_by_key(&doc, key).map(|record| record.value.clone()))
    }

    /// Looks up `key` across sibling culture files.
    ///
    /// The path list comes from the discovery collaborator; this crate does
    /// no filename pattern matching itself. Missing files are skipped,
    /// malformed ones fail the whole lookup.
    pub async fn lookup_many(&self, paths: &[PathBuf], key: &str) -> Result<Vec<LookupHit>> {
        let mut hits = Vec::new();
        for path in paths {
            match codec::load(path).await {
                Ok((doc, _)) => {
                    if let Some(record) = ops::find_by_key(&doc, key) {
                        hits.push(LookupHit {
                            path: path.clone(),
                            value: record.value.clone(),
                        });
                    }
                }
                Err(LoclabError::DocumentNotFound { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(hits)
    }
}
