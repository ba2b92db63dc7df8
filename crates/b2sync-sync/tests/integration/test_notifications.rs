//! Cycle outcomes flowing through the notification policy

use std::sync::Arc;

use b2sync_core::{
    domain::SyncPair,
    ports::{NotificationCategory, ToolOptions},
};
use b2sync_sync::{policy::messages, NotificationPolicy};
use tempfile::TempDir;

use crate::common::{orchestrator, FakeTool, RecordingNotifier};

#[tokio::test]
async fn test_one_success_one_missing_source() {
    let data = TempDir::new().unwrap();
    let lock_dir = TempDir::new().unwrap();
    let photos = data.path().join("photos");
    std::fs::create_dir(&photos).unwrap();

    let tool = Arc::new(FakeTool::installed().reply("b2://b/photos", true, "42 files uploaded"));
    let pairs = vec![
        SyncPair::new(&photos, "b2://b/photos"),
        SyncPair::new(data.path().join("missing"), "b2://b/missing"),
    ];
    let orch = orchestrator(pairs, tool, ToolOptions::default(), lock_dir.path(), &[]);
    let notifier = RecordingNotifier::default();

    let outcome = orch.run_cycle().await;
    NotificationPolicy::new(10).notify(&outcome, &notifier).await;

    let results = outcome.results();
    assert_eq!(results.len(), 2);
    assert!(results[0].success);
    assert_eq!(results[0].files_count, 42);
    assert!(!results[1].success);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].category, NotificationCategory::Error);
    assert!(sent[0].body.contains("missing"));
}

#[tokio::test]
async fn test_clean_cycle_above_threshold_reports_total() {
    let data = TempDir::new().unwrap();
    let lock_dir = TempDir::new().unwrap();
    let tool = Arc::new(
        FakeTool::installed()
            .reply("b2://b/a", true, "3 files uploaded")
            .reply("b2://b/b", true, "upload a.txt\nupload b.txt\n"),
    );
    let pairs = vec![
        SyncPair::new(data.path(), "b2://b/a"),
        SyncPair::new(data.path(), "b2://b/b"),
    ];
    let orch = orchestrator(pairs, tool, ToolOptions::default(), lock_dir.path(), &[]);
    let notifier = RecordingNotifier::default();

    let outcome = orch.run_cycle().await;
    NotificationPolicy::new(5).notify(&outcome, &notifier).await;

    assert_eq!(notifier.sent(), vec![messages::sync_complete(5)]);
}

#[tokio::test]
async fn test_quiet_cycle_below_threshold() {
    let data = TempDir::new().unwrap();
    let lock_dir = TempDir::new().unwrap();
    let tool = Arc::new(FakeTool::installed().reply("b2://b/a", true, "nothing to do"));
    let pairs = vec![SyncPair::new(data.path(), "b2://b/a")];
    let orch = orchestrator(pairs, tool, ToolOptions::default(), lock_dir.path(), &[]);
    let notifier = RecordingNotifier::default();

    let outcome = orch.run_cycle().await;
    NotificationPolicy::new(1).notify(&outcome, &notifier).await;

    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn test_skipped_cycle_sends_only_skip_notice() {
    let data = TempDir::new().unwrap();
    let lock_dir = TempDir::new().unwrap();
    let tool = Arc::new(FakeTool::installed());
    let pairs = vec![SyncPair::new(data.path(), "b2://b/a")];
    let orch = orchestrator(pairs, tool, ToolOptions::default(), lock_dir.path(), &[9001]);
    std::fs::write(orch.lock().path(), "9001").unwrap();
    let notifier = RecordingNotifier::default();

    let outcome = orch.run_cycle().await;
    NotificationPolicy::new(0).notify(&outcome, &notifier).await;

    assert_eq!(notifier.sent(), vec![messages::sync_skipped()]);
}

#[tokio::test]
async fn test_missing_tool_sends_install_hint() {
    let data = TempDir::new().unwrap();
    let lock_dir = TempDir::new().unwrap();
    let tool = Arc::new(FakeTool::not_installed());
    let pairs = vec![SyncPair::new(data.path(), "b2://b/a")];
    let orch = orchestrator(pairs, tool, ToolOptions::default(), lock_dir.path(), &[]);
    let notifier = RecordingNotifier::default();

    let outcome = orch.run_cycle().await;
    NotificationPolicy::new(5).notify(&outcome, &notifier).await;

    assert_eq!(notifier.sent(), vec![messages::tool_not_installed()]);
}

#[tokio::test]
async fn test_unreadable_lock_sends_one_generic_failure() {
    let data = TempDir::new().unwrap();
    let lock_dir = TempDir::new().unwrap();
    let tool = Arc::new(FakeTool::installed().reply("b2://b/a", true, "50 files uploaded"));
    let pairs = vec![SyncPair::new(data.path(), "b2://b/a")];
    let orch = orchestrator(pairs, tool, ToolOptions::default(), lock_dir.path(), &[]);
    std::fs::create_dir(orch.lock().path()).unwrap();
    let notifier = RecordingNotifier::default();

    let outcome = orch.run_cycle().await;
    NotificationPolicy::new(0).notify(&outcome, &notifier).await;

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].category, NotificationCategory::Error);
    assert!(sent[0].body.starts_with("Sync failed: failed to read lock file"));
}
