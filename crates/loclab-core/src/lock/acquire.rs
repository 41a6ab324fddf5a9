//! Lockfile acquisition with staleness recovery and bounded retry

use super::chain::WaitChain;
use super::{LockError, LockGuard};
use crate::config::LockSettings;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::io::AsyncWriteExt;

pub(crate) async fn acquire(
    chain: &Arc<WaitChain>,
    target: &Path,
    settings: &LockSettings,
) -> Result<LockGuard, LockError> {
    let resolved = resolve_target(target);
    let slot = chain.enter(&resolved).await;
    let lockfile = lockfile_path(&resolved);

    let mut attempts: u32 = 0;
    loop {
        let created = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lockfile)
            .await;
        match created {
            Ok(mut file) => {
                // Owner PID and millisecond timestamp, for staleness
                // diagnosis only; nothing ever parses this back.
                let stamp = format!("{}\n{}\n", std::process::id(), Utc::now().timestamp_millis());
                if let Err(e) = file.write_all(stamp.as_bytes()).await {
                    drop(file);
                    let _ = tokio::fs::remove_file(&lockfile).await;
                    return Err(io_err(e, &lockfile, "write lockfile"));
                }
                // Dropping a tokio file submits buffered writes in the
                // background; flush so the stamp is visible once we return.
                if let Err(e) = file.flush().await {
                    drop(file);
                    let _ = tokio::fs::remove_file(&lockfile).await;
                    return Err(io_err(e, &lockfile, "write lockfile"));
                }
                tracing::debug!("acquired lock on {}", lockfile.display());
                return Ok(LockGuard {
                    lockfile,
                    _slot: slot,
                });
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                attempts += 1;
                if attempts >= settings.max_retries {
                    tracing::warn!(
                        "giving up on lock {} after {} attempts",
                        lockfile.display(),
                        attempts
                    );
                    return Err(LockError::Timeout {
                        path: lockfile,
                        attempts,
                    });
                }
                match lockfile_age(&lockfile).await? {
                    Some(age) if age > settings.stale_after => {
                        // Previous holder presumed crashed; reclaim and retry
                        // right away. If two processes reclaim at once, the
                        // create-new above arbitrates the next round.
                        tracing::warn!(
                            "removing stale lockfile {} (age {:?})",
                            lockfile.display(),
                            age
                        );
                        match tokio::fs::remove_file(&lockfile).await {
                            Ok(()) => {}
                            Err(e) if e.kind() == ErrorKind::NotFound => {}
                            Err(e) => return Err(io_err(e, &lockfile, "remove stale lockfile")),
                        }
                    }
                    _ => tokio::time::sleep(settings.retry_delay).await,
                }
            }
            Err(e) => return Err(io_err(e, &lockfile, "create lockfile")),
        }
    }
}

/// Age of the lockfile by modification time.
///
/// `None` when the file vanished between the failed create and the stat
/// (the holder released; the next attempt should succeed) or when the
/// mtime sits in the future (clock skew; treat as fresh).
async fn lockfile_age(lockfile: &Path) -> Result<Option<Duration>, LockError> {
    match tokio::fs::metadata(lockfile).await {
        Ok(meta) => {
            let modified = meta
                .modified()
                .map_err(|e| io_err(e, lockfile, "read lockfile mtime"))?;
            Ok(SystemTime::now().duration_since(modified).ok())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_err(e, lockfile, "stat lockfile")),
    }
}

/// Resolution unit for mutual exclusion: canonical parent plus file name.
///
/// The target file itself may not exist yet, so only the parent directory is
/// canonicalized. Aliases that survive this (symlinked leaf, case-folding
/// filesystems) are a documented limitation, not a guarantee.
fn resolve_target(target: &Path) -> PathBuf {
    let parent = target.parent().filter(|p| !p.as_os_str().is_empty());
    if let (Some(parent), Some(name)) = (parent, target.file_name()) {
        if let Ok(canonical) = parent.canonicalize() {
            return canonical.join(name);
        }
    }
    std::path::absolute(target).unwrap_or_else(|_| target.to_path_buf())
}

fn lockfile_path(target: &Path) -> PathBuf {
    let mut os = target.as_os_str().to_os_string();
    os.push(".lock");
    PathBuf::from(os)
}

fn io_err(source: std::io::Error, path: &Path, operation: &'static str) -> LockError {
    LockError::Io {
        source,
        path: path.to_path_buf(),
        operation,
    }
}
