//! B2Sync Sync - Cycle orchestration around an external sync tool
//!
//! Provides:
//! - A cooperative single-instance lock keyed on a live PID
//! - Per-pair invocation of the external tool with result classification
//! - Whole-cycle orchestration under the lock
//! - The threshold-gated notification policy
//!
//! ## Modules
//!
//! - [`lock`] - PID file lock with stale/corrupt token recovery
//! - [`probe`] - `kill(pid, 0)` process liveness adapter
//! - [`b2`] - `b2` command adapter for the [`ISyncTool`](b2sync_core::ports::ISyncTool) port
//! - [`output`] - Best-effort transferred-file count from tool output
//! - [`executor`] - Runs one pair and builds its `SyncResult`
//! - [`orchestrator`] - Runs a full cycle under the lock
//! - [`policy`] - Decides which notifications a cycle produces

pub mod b2;
pub mod executor;
pub mod lock;
pub mod orchestrator;
pub mod output;
pub mod policy;
pub mod probe;

pub use b2::B2Cli;
pub use executor::PairExecutor;
pub use lock::{LockGuard, PidLock};
pub use orchestrator::SyncOrchestrator;
pub use output::parse_files_count;
pub use policy::NotificationPolicy;
pub use probe::OsProcessProbe;
