//! Cycles against a real executable standing in for `b2`

#![cfg(unix)]

use std::{fs, os::unix::fs::PermissionsExt, path::Path, sync::Arc};

use b2sync_core::{
    domain::{PairError, SyncPair},
    ports::ToolOptions,
};
use b2sync_sync::{B2Cli, OsProcessProbe, PidLock, SyncOrchestrator};
use tempfile::TempDir;

fn write_script(dir: &Path, body: &str) -> String {
    let path = dir.join("fake-b2");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}

fn orchestrator(
    program: String,
    source: &Path,
    lock_dir: &Path,
    options: ToolOptions,
) -> SyncOrchestrator {
    let lock = PidLock::new(lock_dir.join("b2sync.pid"), Arc::new(OsProcessProbe::new()));
    SyncOrchestrator::new(
        vec![SyncPair::new(source, "b2://bucket/docs")],
        Arc::new(B2Cli::new(program)),
        options,
        lock,
    )
}

#[tokio::test]
async fn test_script_output_is_counted() {
    let bin = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    let lock_dir = TempDir::new().unwrap();
    let program = write_script(bin.path(), r#"echo "args: $*"; echo "12 files uploaded""#);
    let orch = orchestrator(program, data.path(), lock_dir.path(), ToolOptions { keep_days: 3 });

    let outcome = orch.run_cycle().await;

    let results = outcome.results();
    assert_eq!(results.len(), 1);
    assert!(results[0].success);
    assert_eq!(results[0].files_count, 12);
    let expected = format!(
        "args: sync --keep-days 3 {} b2://bucket/docs",
        data.path().display()
    );
    assert!(results[0].raw_output.contains(&expected));
}

#[tokio::test]
async fn test_script_failure_reports_exit_status() {
    let bin = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    let lock_dir = TempDir::new().unwrap();
    let program = write_script(bin.path(), "echo 'ERROR: no such bucket' >&2; exit 2");
    let orch = orchestrator(program, data.path(), lock_dir.path(), ToolOptions::default());

    let outcome = orch.run_cycle().await;

    let results = outcome.results();
    assert!(!results[0].success);
    assert!(matches!(results[0].error, Some(PairError::ToolFailed { .. })));
    assert!(results[0].raw_output.contains("no such bucket"));
    assert!(!lock_dir.path().join("b2sync.pid").exists());
}
