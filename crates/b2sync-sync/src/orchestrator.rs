//! Sync orchestrator
//!
//! The [`SyncOrchestrator`] runs one cycle: it checks that the tool is
//! installed, makes sure no other process is mid-cycle, takes the lock and
//! syncs every configured pair in order.
//!
//! ## Cycle Flow
//!
//! ```text
//! locate tool ──✗──→ Aborted(ToolUnavailable)
//!      │
//! is_running ──yes─→ Aborted(AlreadyRunning)
//!      │ ────✗───→ Aborted(Lock)
//!      │
//! acquire ────✗───→ Aborted(Lock)
//!      │
//! pair 1 → pair 2 → … → pair N   (lock held, released on every exit path)
//!      │
//! Completed([result 1, …, result N])
//! ```
//!
//! A failed pair never stops the loop and nothing is retried; the next
//! scheduled cycle is the retry.

use std::{path::PathBuf, sync::Arc};

use b2sync_core::{
    config::{expand_home, Config},
    domain::{CycleError, CycleOutcome, SyncPair, SyncResult},
    ports::{ISyncTool, ToolOptions},
};
use tracing::{error, info};

use crate::{b2::B2Cli, executor::PairExecutor, lock::PidLock, probe::OsProcessProbe};

/// Runs sync cycles over a fixed list of pairs
pub struct SyncOrchestrator {
    pairs: Vec<SyncPair>,
    tool: Arc<dyn ISyncTool>,
    executor: PairExecutor,
    lock: PidLock,
}

impl SyncOrchestrator {
    pub fn new(
        pairs: Vec<SyncPair>,
        tool: Arc<dyn ISyncTool>,
        options: ToolOptions,
        lock: PidLock,
    ) -> Self {
        let executor = PairExecutor::new(Arc::clone(&tool), options);
        Self {
            pairs,
            tool,
            executor,
            lock,
        }
    }

    /// Wires the real adapters from configuration: the configured command,
    /// the OS process table and the configured PID file.
    pub fn from_config(config: &Config) -> Self {
        let tool = Arc::new(B2Cli::new(config.sync.tool.clone()));
        let lock = PidLock::new(
            expand_home(&config.lock.pid_file),
            Arc::new(OsProcessProbe::new()),
        );
        Self::new(config.resolved_pairs(), tool, config.tool_options(), lock)
    }

    pub fn pairs(&self) -> &[SyncPair] {
        &self.pairs
    }

    pub fn lock(&self) -> &PidLock {
        &self.lock
    }

    /// Resolves the sync tool on the search path
    ///
    /// # Errors
    /// Returns [`CycleError::ToolUnavailable`] if it is not installed.
    pub fn check_tool(&self) -> Result<PathBuf, CycleError> {
        self.tool
            .locate()
            .ok_or_else(|| CycleError::ToolUnavailable {
                tool: self.tool.name().to_string(),
            })
    }

    /// Runs one complete cycle
    ///
    /// Returns `Aborted` without attempting any pair if the tool is missing,
    /// another process holds the lock, or the lock cannot be read or written.
    /// Otherwise returns exactly one result per pair, in configuration
    /// order. The lock file is gone when this returns.
    pub async fn run_cycle(&self) -> CycleOutcome {
        if let Err(e) = self.check_tool() {
            error!(error = %e, "Sync tool check failed");
            return CycleOutcome::Aborted(e);
        }

        match self.lock.is_running() {
            Ok(true) => {
                info!("Sync already running, skipping this cycle");
                return CycleOutcome::Aborted(CycleError::AlreadyRunning);
            }
            Ok(false) => {}
            Err(e) => {
                // An unreadable token may still belong to a live holder.
                error!(error = %e, "Failed to check if sync is running");
                return CycleOutcome::Aborted(e.into());
            }
        }

        let _guard = match self.lock.acquire() {
            Ok(guard) => guard,
            Err(e) => {
                error!(error = %e, "Failed to create lock file");
                return CycleOutcome::Aborted(e.into());
            }
        };

        let mut results = Vec::with_capacity(self.pairs.len());
        for pair in &self.pairs {
            let result = self.executor.run(pair).await;
            log_result(&result);
            results.push(result);
        }

        CycleOutcome::Completed(results)
    }
}

impl std::fmt::Debug for SyncOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncOrchestrator")
            .field("pairs", &self.pairs)
            .field("executor", &self.executor)
            .field("lock", &self.lock)
            .finish()
    }
}

fn log_result(result: &SyncResult) {
    let source = result.pair.source.display();
    let destination = &result.pair.destination;
    let duration_ms = result.duration.as_millis() as u64;

    match &result.error {
        None => info!(
            %source,
            %destination,
            files = result.files_count,
            duration_ms,
            "Sync completed"
        ),
        Some(err) => {
            let output = result.raw_output.trim();
            if output.is_empty() {
                error!(%source, %destination, error = %err, "Sync failed");
            } else {
                error!(%source, %destination, error = %err, output, "Sync failed");
            }
        }
    }
}
