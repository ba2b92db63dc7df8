//! `b2` command adapter (secondary/driven adapter)
//!
//! Implements [`ISyncTool`] by spawning the Backblaze B2 CLI (or any
//! command-compatible program) with `tokio::process`.

use std::{ffi::OsString, path::PathBuf, process::Stdio};

use async_trait::async_trait;
use b2sync_core::ports::{ISyncTool, ToolOutput};
use tokio::process::Command;
use tracing::debug;

/// Runs the external sync command found on `PATH`
#[derive(Debug, Clone)]
pub struct B2Cli {
    program: String,
}

impl B2Cli {
    /// Creates an adapter for `program`, a command name or a path
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for B2Cli {
    fn default() -> Self {
        Self::new("b2")
    }
}

#[async_trait]
impl ISyncTool for B2Cli {
    fn name(&self) -> &str {
        &self.program
    }

    fn locate(&self) -> Option<PathBuf> {
        which::which(&self.program).ok()
    }

    async fn run(&self, args: &[OsString]) -> std::io::Result<ToolOutput> {
        debug!(program = %self.program, ?args, "Spawning sync tool");

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(ToolOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            output: text,
        })
    }
}
