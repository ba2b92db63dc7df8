//! Shared fakes for cycle tests

use std::{
    collections::{HashMap, HashSet},
    ffi::OsString,
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use b2sync_core::{
    domain::SyncPair,
    ports::{INotificationService, IProcessProbe, ISyncTool, Notification, ToolOptions, ToolOutput},
};
use b2sync_sync::{PidLock, SyncOrchestrator};

/// Sync tool that answers per destination and records invocations
#[derive(Default)]
pub struct FakeTool {
    installed: bool,
    replies: HashMap<String, (bool, String)>,
    calls: Mutex<Vec<Vec<OsString>>>,
    /// Lock file contents observed while each invocation ran
    lock_seen: Mutex<Vec<Option<String>>>,
    lock_path: Option<PathBuf>,
}

impl FakeTool {
    pub fn installed() -> Self {
        Self {
            installed: true,
            ..Self::default()
        }
    }

    pub fn not_installed() -> Self {
        Self::default()
    }

    /// Reply for any invocation whose last argument is `destination`
    pub fn reply(mut self, destination: &str, success: bool, output: &str) -> Self {
        self.replies
            .insert(destination.to_string(), (success, output.to_string()));
        self
    }

    /// Record the lock file contents on every invocation
    pub fn watching_lock(mut self, path: &Path) -> Self {
        self.lock_path = Some(path.to_path_buf());
        self
    }

    pub fn calls(&self) -> Vec<Vec<OsString>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn lock_seen(&self) -> Vec<Option<String>> {
        self.lock_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ISyncTool for FakeTool {
    fn name(&self) -> &str {
        "b2"
    }

    fn locate(&self) -> Option<PathBuf> {
        self.installed.then(|| PathBuf::from("/usr/bin/b2"))
    }

    async fn run(&self, args: &[OsString]) -> io::Result<ToolOutput> {
        self.calls.lock().unwrap().push(args.to_vec());
        if let Some(path) = &self.lock_path {
            self.lock_seen
                .lock()
                .unwrap()
                .push(std::fs::read_to_string(path).ok());
        }

        let destination = args
            .last()
            .map(|a| a.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (success, output) = self
            .replies
            .get(&destination)
            .cloned()
            .unwrap_or((true, String::new()));

        Ok(ToolOutput {
            success,
            status: if success { "exit status: 0" } else { "exit status: 1" }.to_string(),
            output,
        })
    }
}

/// Process table with a fixed set of live PIDs
pub struct FakeProbe(HashSet<u32>);

impl FakeProbe {
    pub fn alive(pids: &[u32]) -> Arc<Self> {
        Arc::new(Self(pids.iter().copied().collect()))
    }
}

impl IProcessProbe for FakeProbe {
    fn is_alive(&self, pid: u32) -> bool {
        self.0.contains(&pid)
    }
}

/// Notifier that keeps everything it was asked to show
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl INotificationService for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Builds an orchestrator whose lock lives in `lock_dir`
pub fn orchestrator(
    pairs: Vec<SyncPair>,
    tool: Arc<FakeTool>,
    options: ToolOptions,
    lock_dir: &Path,
    alive: &[u32],
) -> SyncOrchestrator {
    let lock = PidLock::new(lock_dir.join("b2sync.pid"), FakeProbe::alive(alive));
    SyncOrchestrator::new(pairs, tool, options, lock)
}
