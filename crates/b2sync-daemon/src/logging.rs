//! Log output and retention
//!
//! Events go to stderr and to a daily file `b2sync.<YYYY-MM-DD>.log` in the
//! configured directory. The appender switches files at midnight;
//! [`LogRotation`] deletes old ones.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use b2sync_core::config::{expand_home, LoggingConfig};
use tracing::debug;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_PREFIX: &str = "b2sync";
const LOG_SUFFIX: &str = "log";

/// Installs the global subscriber
///
/// `RUST_LOG` overrides `logging.level`. The returned guard flushes the
/// file writer on drop, so keep it alive until the process exits.
pub fn init(config: &LoggingConfig) -> Result<WorkerGuard> {
    let dir = expand_home(&config.dir);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix(LOG_SUFFIX)
        .build(&dir)
        .context("Failed to create log file appender")?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .try_init()
        .context("Failed to initialize tracing")?;

    Ok(guard)
}

/// Keeps at most `max_files` daily log files
#[derive(Debug, Clone)]
pub struct LogRotation {
    dir: PathBuf,
    max_files: usize,
}

impl LogRotation {
    pub fn new(dir: impl Into<PathBuf>, max_files: usize) -> Self {
        Self {
            dir: dir.into(),
            max_files,
        }
    }

    pub fn from_config(config: &LoggingConfig) -> Self {
        Self::new(expand_home(&config.dir), config.max_files)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Deletes the oldest log files beyond the limit
    ///
    /// Returns how many files were removed. A missing directory counts as
    /// nothing to do. Files that are not ours are never touched.
    pub fn rotate_if_needed(&self) -> io::Result<usize> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let mut logs = Vec::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_log_file(&name) {
                logs.push(name);
            }
        }

        if logs.len() <= self.max_files {
            return Ok(0);
        }

        // Dates in the names sort chronologically.
        logs.sort();
        let excess = logs.len() - self.max_files;
        for name in &logs[..excess] {
            fs::remove_file(self.dir.join(name))?;
            debug!(file = %name, "Removed old log file");
        }

        Ok(excess)
    }
}

fn is_log_file(name: &str) -> bool {
    name.strip_prefix(LOG_PREFIX)
        .and_then(|rest| rest.strip_prefix('.'))
        .and_then(|rest| rest.strip_suffix(LOG_SUFFIX))
        .is_some_and(|date| date.len() > 1 && date.ends_with('.'))
}
