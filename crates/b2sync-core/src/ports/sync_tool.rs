//! External sync tool port (driven/secondary port)
//!
//! The actual transfer is delegated to an external command. This trait is
//! the whole of what the cycle logic knows about it: whether it can be found,
//! and what happened when it was run with a given argument list.

use std::{ffi::OsString, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Settings that shape every tool invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOptions {
    /// Days of file history to keep remotely; `0` leaves the flag off
    pub keep_days: u32,
}

/// Captured result of one tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// `true` when the command exited with status zero
    pub success: bool,
    /// Exit status description, e.g. `exit status: 1`
    pub status: String,
    /// stdout followed by stderr
    pub output: String,
}

/// Port trait for the external sync command
#[async_trait::async_trait]
pub trait ISyncTool: Send + Sync {
    /// Command name used in messages (`b2`)
    fn name(&self) -> &str;

    /// Resolves the command on the execution search path
    ///
    /// Returns `None` when the command is not installed.
    fn locate(&self) -> Option<PathBuf>;

    /// Runs the command once and waits for it to exit
    ///
    /// # Errors
    /// Returns an I/O error only if the process could not be started.
    /// A non-zero exit is reported through [`ToolOutput::success`].
    async fn run(&self, args: &[OsString]) -> std::io::Result<ToolOutput>;
}
