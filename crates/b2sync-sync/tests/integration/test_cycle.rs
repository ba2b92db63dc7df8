//! Whole-cycle behavior of the orchestrator

use std::{ffi::OsString, sync::Arc};

use b2sync_core::{
    domain::{CycleError, CycleOutcome, LockError, PairError, SyncPair},
    ports::{NotificationCategory, ToolOptions},
};
use b2sync_sync::NotificationPolicy;
use tempfile::TempDir;

use crate::common::{orchestrator, FakeTool, RecordingNotifier};

#[tokio::test]
async fn test_one_result_per_pair_in_order_with_failures_in_between() {
    let data = TempDir::new().unwrap();
    let lock_dir = TempDir::new().unwrap();
    let present = data.path().join("present");
    std::fs::create_dir(&present).unwrap();

    let tool = Arc::new(
        FakeTool::installed()
            .reply("b2://bucket/first", true, "7 files uploaded")
            .reply("b2://bucket/third", false, "ERROR: unauthorized"),
    );
    let pairs = vec![
        SyncPair::new(&present, "b2://bucket/first"),
        SyncPair::new(data.path().join("gone"), "b2://bucket/second"),
        SyncPair::new(&present, "b2://bucket/third"),
        SyncPair::new(&present, "b2://bucket/fourth"),
    ];
    let orch = orchestrator(pairs, tool.clone(), ToolOptions::default(), lock_dir.path(), &[]);

    let outcome = orch.run_cycle().await;

    let results = outcome.results();
    assert_eq!(results.len(), 4);
    let ok: Vec<bool> = results.iter().map(|r| r.success).collect();
    assert_eq!(ok, vec![true, false, false, true]);
    assert_eq!(results[0].files_count, 7);
    assert!(matches!(results[1].error, Some(PairError::SourceMissing(_))));
    assert!(matches!(results[2].error, Some(PairError::ToolFailed { .. })));
    assert_eq!(results[2].raw_output, "ERROR: unauthorized");

    // The missing source never reached the tool.
    assert_eq!(tool.calls().len(), 3);
    assert!(!orch.lock().path().exists());
}

#[tokio::test]
async fn test_lock_holds_own_pid_during_pairs() {
    let data = TempDir::new().unwrap();
    let lock_dir = TempDir::new().unwrap();
    let lock_path = lock_dir.path().join("b2sync.pid");
    let tool = Arc::new(FakeTool::installed().watching_lock(&lock_path));
    let pairs = vec![
        SyncPair::new(data.path(), "b2://bucket/a"),
        SyncPair::new(data.path(), "b2://bucket/b"),
    ];
    let orch = orchestrator(pairs, tool.clone(), ToolOptions::default(), lock_dir.path(), &[]);

    orch.run_cycle().await;

    let pid = std::process::id().to_string();
    assert_eq!(tool.lock_seen(), vec![Some(pid.clone()), Some(pid)]);
    assert!(!lock_path.exists());
}

#[tokio::test]
async fn test_keep_days_forwarded_to_every_pair() {
    let data = TempDir::new().unwrap();
    let lock_dir = TempDir::new().unwrap();
    let tool = Arc::new(FakeTool::installed());
    let pairs = vec![SyncPair::new(data.path(), "b2://bucket/a")];
    let orch = orchestrator(
        pairs,
        tool.clone(),
        ToolOptions { keep_days: 14 },
        lock_dir.path(),
        &[],
    );

    orch.run_cycle().await;

    let calls = tool.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        vec![
            OsString::from("sync"),
            OsString::from("--keep-days"),
            OsString::from("14"),
            data.path().as_os_str().to_os_string(),
            OsString::from("b2://bucket/a"),
        ]
    );
}

#[tokio::test]
async fn test_no_pairs_completes_empty() {
    let lock_dir = TempDir::new().unwrap();
    let tool = Arc::new(FakeTool::installed());
    let orch = orchestrator(Vec::new(), tool, ToolOptions::default(), lock_dir.path(), &[]);

    let outcome = orch.run_cycle().await;

    assert!(matches!(outcome, CycleOutcome::Completed(ref r) if r.is_empty()));
    assert!(!orch.lock().path().exists());
}

#[tokio::test]
async fn test_missing_tool_aborts_before_lock() {
    let data = TempDir::new().unwrap();
    let lock_dir = TempDir::new().unwrap();
    let tool = Arc::new(FakeTool::not_installed());
    let pairs = vec![SyncPair::new(data.path(), "b2://bucket/a")];
    let orch = orchestrator(pairs, tool.clone(), ToolOptions::default(), lock_dir.path(), &[]);

    let outcome = orch.run_cycle().await;

    assert!(matches!(
        outcome.abort_reason(),
        Some(CycleError::ToolUnavailable { .. })
    ));
    assert!(tool.calls().is_empty());
    assert!(!orch.lock().path().exists());
}

#[tokio::test]
async fn test_concurrent_holder_causes_skip_and_is_left_alone() {
    let data = TempDir::new().unwrap();
    let lock_dir = TempDir::new().unwrap();
    let tool = Arc::new(FakeTool::installed());
    let pairs = vec![SyncPair::new(data.path(), "b2://bucket/a")];
    let orch = orchestrator(pairs, tool.clone(), ToolOptions::default(), lock_dir.path(), &[31337]);
    std::fs::write(orch.lock().path(), "31337").unwrap();

    let outcome = orch.run_cycle().await;

    assert!(outcome.is_aborted());
    assert!(outcome.results().is_empty());
    assert!(tool.calls().is_empty());
    assert_eq!(
        std::fs::read_to_string(orch.lock().path()).unwrap(),
        "31337"
    );
}

#[tokio::test]
async fn test_corrupt_lock_is_cleared_and_cycle_runs() {
    let data = TempDir::new().unwrap();
    let lock_dir = TempDir::new().unwrap();
    let tool = Arc::new(FakeTool::installed());
    let pairs = vec![SyncPair::new(data.path(), "b2://bucket/a")];
    let orch = orchestrator(pairs, tool.clone(), ToolOptions::default(), lock_dir.path(), &[]);
    std::fs::write(orch.lock().path(), "garbage\n").unwrap();

    let outcome = orch.run_cycle().await;

    assert_eq!(outcome.results().len(), 1);
    assert_eq!(tool.calls().len(), 1);
    assert!(!orch.lock().path().exists());
}

#[tokio::test]
async fn test_back_to_back_cycles_both_run() {
    let data = TempDir::new().unwrap();
    let lock_dir = TempDir::new().unwrap();
    let tool = Arc::new(FakeTool::installed().reply("b2://bucket/a", true, "2 files uploaded"));
    let pairs = vec![SyncPair::new(data.path(), "b2://bucket/a")];
    let orch = orchestrator(pairs, tool.clone(), ToolOptions::default(), lock_dir.path(), &[]);

    let first = orch.run_cycle().await;
    let second = orch.run_cycle().await;

    assert_eq!(first.successful_files(), 2);
    assert_eq!(second.successful_files(), 2);
    assert_eq!(tool.calls().len(), 2);
}

#[cfg(unix)]
#[tokio::test]
async fn test_lock_acquire_failure_aborts_with_single_failure() {
    let data = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    // A dangling symlink as the lock directory: the token reads as absent
    // but the directory can never be created.
    let lock_dir = root.path().join("pids");
    std::os::unix::fs::symlink(root.path().join("nowhere"), &lock_dir).unwrap();
    let tool = Arc::new(FakeTool::installed());
    let pairs = vec![
        SyncPair::new(data.path(), "b2://bucket/a"),
        SyncPair::new(data.path(), "b2://bucket/b"),
    ];
    let orch = orchestrator(pairs, tool.clone(), ToolOptions::default(), &lock_dir, &[]);
    let notifier = RecordingNotifier::default();

    let outcome = orch.run_cycle().await;
    NotificationPolicy::new(0).notify(&outcome, &notifier).await;

    assert!(matches!(
        outcome.abort_reason(),
        Some(CycleError::Lock(LockError::CreateDir { .. }))
    ));
    assert!(outcome.results().is_empty());
    assert!(tool.calls().is_empty());
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].category, NotificationCategory::Error);
    assert!(sent[0].body.starts_with("Sync failed: "));
}

#[tokio::test]
async fn test_unreadable_lock_aborts_before_any_pair() {
    let data = TempDir::new().unwrap();
    let lock_dir = TempDir::new().unwrap();
    let tool = Arc::new(FakeTool::installed());
    let pairs = vec![SyncPair::new(data.path(), "b2://bucket/a")];
    let orch = orchestrator(pairs, tool.clone(), ToolOptions::default(), lock_dir.path(), &[]);
    std::fs::create_dir(orch.lock().path()).unwrap();

    let outcome = orch.run_cycle().await;

    assert!(matches!(
        outcome.abort_reason(),
        Some(CycleError::Lock(LockError::Read { .. }))
    ));
    assert!(tool.calls().is_empty());
    assert!(orch.lock().path().is_dir());
}
