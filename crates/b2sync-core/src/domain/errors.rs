//! Error taxonomy for sync cycles
//!
//! Failures come at two levels:
//! - **Pair level** ([`PairError`]): fails one pair, the cycle carries on.
//! - **Cycle level** ([`CycleError`]): short-circuits the cycle before any
//!   pair is attempted.
//!
//! "Already running" is its own variant so callers branch on the type
//! rather than on message text.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while inspecting or writing the single-instance lock file
#[derive(Debug, Error)]
pub enum LockError {
    /// The lock file exists but could not be read
    #[error("failed to read lock file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The lock directory could not be created
    #[error("failed to create lock directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The current process ID could not be persisted
    #[error("failed to write lock file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors that fail a single pair without aborting the cycle
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PairError {
    /// The configured source path does not exist; the tool was not invoked
    #[error("source directory does not exist: {}", .0.display())]
    SourceMissing(PathBuf),

    /// The tool ran and exited unsuccessfully
    #[error("{tool} sync failed: {status}")]
    ToolFailed {
        /// Command name
        tool: String,
        /// Exit status description
        status: String,
    },

    /// The tool could not be started at all
    #[error("failed to run {tool}: {message}")]
    Spawn { tool: String, message: String },
}

/// Conditions that abort a whole cycle before any pair runs
#[derive(Debug, Error)]
pub enum CycleError {
    /// The external sync command is not resolvable on `PATH`
    #[error("{tool} CLI not found in PATH")]
    ToolUnavailable { tool: String },

    /// Another live process holds the lock
    #[error("sync already running")]
    AlreadyRunning,

    /// The lock could not be taken
    #[error(transparent)]
    Lock(#[from] LockError),
}

impl CycleError {
    /// Whether this is the skip condition rather than a failure
    pub fn is_already_running(&self) -> bool {
        matches!(self, CycleError::AlreadyRunning)
    }
}
