//! Status command - Is a sync cycle running right now?
//!
//! Reads the lock file the daemon holds while a cycle runs. A stale or
//! corrupt lock file is cleaned up the same way the daemon would; a live
//! one is never touched.

use std::{path::Path, sync::Arc, time::SystemTime};

use anyhow::{Context, Result};
use b2sync_core::{
    config::{expand_home, Config},
    ports::ISyncTool,
};
use b2sync_sync::{B2Cli, OsProcessProbe, PidLock};
use chrono::{DateTime, Local};
use tracing::info;

use crate::output::{get_formatter, OutputFormat};

/// Arguments for the status subcommand
#[derive(Debug, clap::Args)]
pub struct StatusCommand {}

/// Snapshot of the daemon-facing state
#[derive(Debug)]
struct StatusReport {
    lock_file: String,
    holder: Option<u32>,
    held_since: Option<DateTime<Local>>,
    tool: String,
    tool_path: Option<String>,
    pairs: usize,
    frequency: String,
}

impl StatusReport {
    fn collect(config: &Config) -> Result<Self> {
        let lock_path = expand_home(&config.lock.pid_file);
        let lock = PidLock::new(&lock_path, Arc::new(OsProcessProbe::new()));
        let holder = lock.holder().context("Failed to read lock file")?;
        let held_since = holder.and_then(|_| modified(&lock_path));

        let tool = B2Cli::new(config.sync.tool.clone());

        Ok(Self {
            lock_file: lock_path.display().to_string(),
            holder,
            held_since,
            tool: config.sync.tool.clone(),
            tool_path: tool.locate().map(|p| p.display().to_string()),
            pairs: config.sync_pairs.len(),
            frequency: format_frequency(config),
        })
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "syncing": self.holder.is_some(),
            "pid": self.holder,
            "held_since": self.held_since.map(|t| t.to_rfc3339()),
            "lock_file": self.lock_file,
            "tool": self.tool,
            "tool_path": self.tool_path,
            "pairs": self.pairs,
            "frequency": self.frequency,
        })
    }
}

fn modified(path: &Path) -> Option<DateTime<Local>> {
    let mtime: SystemTime = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Local>::from(mtime))
}

fn format_frequency(config: &Config) -> String {
    let secs = config.sync.frequency.as_secs();
    if secs % 3600 == 0 && secs > 0 {
        format!("{}h", secs / 3600)
    } else if secs % 60 == 0 && secs > 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{secs}s")
    }
}

impl StatusCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let config = Config::load_if_present(config_path)?;

        let report = StatusReport::collect(&config)?;
        info!(lock_file = %report.lock_file, holder = ?report.holder, "Checked sync status");

        if format.is_json() {
            formatter.print_json(&report.to_json());
            return Ok(());
        }

        match (report.holder, report.held_since) {
            (Some(pid), Some(since)) => formatter.success(&format!(
                "Sync in progress (PID {pid}, since {})",
                since.format("%Y-%m-%d %H:%M:%S")
            )),
            (Some(pid), None) => formatter.success(&format!("Sync in progress (PID {pid})")),
            (None, _) => formatter.success("No sync in progress"),
        }
        formatter.field("Lock file", &report.lock_file);
        formatter.field(
            "Sync pairs",
            &format_args!("{}, every {}", report.pairs, report.frequency),
        );
        match &report.tool_path {
            Some(path) => formatter.field("Sync tool", path),
            None => formatter.warn(&format!("{} CLI not found in PATH", report.tool)),
        }

        Ok(())
    }
}
