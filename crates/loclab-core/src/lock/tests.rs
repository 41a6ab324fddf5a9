//! Tests for the layered lock

use super::{acquire_lock, LockError, WaitChain};
use crate::config::LockSettings;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn fast_settings() -> LockSettings {
    LockSettings {
        stale_after: Duration::from_secs(30),
        retry_delay: Duration::from_millis(5),
        max_retries: 5,
    }
}

#[tokio::test]
async fn acquire_creates_lockfile_with_pid_and_timestamp() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("Strings.resx");
    let chain = Arc::new(WaitChain::new());

    let guard = acquire_lock(&chain, &target, &LockSettings::default())
        .await
        .unwrap();

    let lockfile = temp.path().join("Strings.resx.lock");
    assert!(lockfile.exists(), "lockfile should sit next to the target");

    let content = std::fs::read_to_string(&lockfile).unwrap();
    let mut lines = content.lines();
    let pid: u32 = lines.next().unwrap().parse().unwrap();
    let stamp: i64 = lines.next().unwrap().parse().unwrap();
    assert_eq!(pid, std::process::id());
    assert!(stamp > 0, "timestamp line should be a millisecond epoch");

    drop(guard);
}

#[tokio::test]
async fn drop_removes_lockfile() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("Strings.resx");
    let chain = Arc::new(WaitChain::new());

    let guard = acquire_lock(&chain, &target, &LockSettings::default())
        .await
        .unwrap();
    let lockfile = temp.path().join("Strings.resx.lock");
    assert!(lockfile.exists());

    drop(guard);
    assert!(!lockfile.exists(), "lockfile must be removed on release");
}

#[tokio::test]
async fn contended_acquire_times_out() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("Strings.resx");

    // Separate chains model separate processes; contention lands on the
    // lockfile, not the in-process queue.
    let chain_a = Arc::new(WaitChain::new());
    let chain_b = Arc::new(WaitChain::new());

    let _held = acquire_lock(&chain_a, &target, &fast_settings())
        .await
        .unwrap();
    let result = acquire_lock(&chain_b, &target, &fast_settings()).await;

    match result {
        Err(LockError::Timeout { attempts, .. }) => assert_eq!(attempts, 5),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn stale_lockfile_is_reclaimed() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("Strings.resx");
    let lockfile = temp.path().join("Strings.resx.lock");

    // Leftover from a crashed holder
    std::fs::write(&lockfile, "99999\n0\n").unwrap();
    tokio::time::sleep(Duration::from_millis(25)).await;

    let settings = LockSettings {
        stale_after: Duration::from_millis(1),
        retry_delay: Duration::from_millis(5),
        max_retries: 5,
    };
    let chain = Arc::new(WaitChain::new());

    let start = Instant::now();
    let guard = acquire_lock(&chain, &target, &settings).await.unwrap();
    assert!(
        start.elapsed() < Duration::from_millis(200),
        "reclaim should not wait out the retry budget"
    );

    // The reclaimed lockfile now belongs to us
    let content = std::fs::read_to_string(&lockfile).unwrap();
    assert!(content.starts_with(&std::process::id().to_string()));
    drop(guard);
}

#[tokio::test]
async fn fresh_lockfile_is_not_reclaimed() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("Strings.resx");
    let lockfile = temp.path().join("Strings.resx.lock");

    std::fs::write(&lockfile, "99999\n0\n").unwrap();

    let chain = Arc::new(WaitChain::new());
    let result = acquire_lock(&chain, &target, &fast_settings()).await;

    assert!(
        matches!(result, Err(LockError::Timeout { .. })),
        "a recent lockfile belongs to a live holder"
    );
    assert!(lockfile.exists(), "foreign lockfile must be left in place");
    std::fs::remove_file(&lockfile).unwrap();
}

#[tokio::test]
async fn chain_serializes_same_path_callers() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("Strings.resx");
    let chain = Arc::new(WaitChain::new());

    let held = acquire_lock(&chain, &target, &LockSettings::default())
        .await
        .unwrap();

    let chain_clone = Arc::clone(&chain);
    let target_clone = target.clone();
    let waiter = tokio::spawn(async move {
        let guard = acquire_lock(&chain_clone, &target_clone, &LockSettings::default())
            .await
            .unwrap();
        let at = Instant::now();
        drop(guard);
        at
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    let released_at = Instant::now();
    drop(held);

    let acquired_at = waiter.await.unwrap();
    assert!(
        acquired_at >= released_at,
        "second caller must wait for the first to release"
    );
}

#[tokio::test]
async fn different_paths_do_not_block_each_other() {
    let temp = TempDir::new().unwrap();
    let chain = Arc::new(WaitChain::new());

    let _a = acquire_lock(&chain, &temp.path().join("a.resx"), &fast_settings())
        .await
        .unwrap();
    let _b = acquire_lock(&chain, &temp.path().join("b.resx"), &fast_settings())
        .await
        .unwrap();
}

#[tokio::test]
async fn wait_chain_table_drains_after_release() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("Strings.resx");
    let chain = Arc::new(WaitChain::new());

    let guard = acquire_lock(&chain, &target, &LockSettings::default())
        .await
        .unwrap();
    assert_eq!(chain.len(), 1);

    drop(guard);
    assert_eq!(chain.len(), 0, "drained paths must be deregistered");
}

#[tokio::test]
async fn failed_acquire_still_wakes_next_caller() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("Strings.resx");
    let lockfile = temp.path().join("Strings.resx.lock");

    // A foreign holder forces the first caller into a timeout
    std::fs::write(&lockfile, "99999\n0\n").unwrap();

    let chain = Arc::new(WaitChain::new());
    let result = acquire_lock(&chain, &target, &fast_settings()).await;
    assert!(matches!(result, Err(LockError::Timeout { .. })));

    // The failure must not leave the chain wedged
    std::fs::remove_file(&lockfile).unwrap();
    let guard = acquire_lock(&chain, &target, &fast_settings()).await;
    assert!(guard.is_ok(), "chain must recover after a failed holder");
}
