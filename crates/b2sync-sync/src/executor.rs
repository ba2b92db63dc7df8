//! Pair executor
//!
//! Runs the external tool once for one [`SyncPair`] and turns what happened
//! into a [`SyncResult`]:
//!
//! - source missing: failed, tool never invoked
//! - tool could not be spawned: failed, no output
//! - non-zero exit: failed, captured output kept for diagnosis
//! - zero exit: succeeded, file count estimated from the output

use std::{ffi::OsString, io::ErrorKind, sync::Arc, time::Instant};

use b2sync_core::{
    domain::{PairError, SyncPair, SyncResult},
    ports::{ISyncTool, ToolOptions},
};
use tracing::{debug, instrument};

use crate::output::parse_files_count;

/// Invokes the sync tool for individual pairs
#[derive(Clone)]
pub struct PairExecutor {
    tool: Arc<dyn ISyncTool>,
    options: ToolOptions,
}

impl PairExecutor {
    pub fn new(tool: Arc<dyn ISyncTool>, options: ToolOptions) -> Self {
        Self { tool, options }
    }

    /// Argument list for one invocation:
    /// `sync [--keep-days N] <source> <destination>`
    pub fn build_args(pair: &SyncPair, options: &ToolOptions) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["sync".into()];
        if options.keep_days > 0 {
            args.push("--keep-days".into());
            args.push(options.keep_days.to_string().into());
        }
        args.push(pair.source.clone().into_os_string());
        args.push(pair.destination.clone().into());
        args
    }

    /// Syncs one pair and reports the outcome
    ///
    /// Never returns an error: every failure is captured in the result so
    /// the caller can move on to the next pair.
    #[instrument(skip_all, fields(source = %pair.source.display(), destination = %pair.destination))]
    pub async fn run(&self, pair: &SyncPair) -> SyncResult {
        let start = Instant::now();

        if let Err(e) = tokio::fs::metadata(&pair.source).await {
            if e.kind() == ErrorKind::NotFound {
                return SyncResult::failed(
                    pair.clone(),
                    PairError::SourceMissing(pair.source.clone()),
                    start.elapsed(),
                    String::new(),
                );
            }
            // Anything else (e.g. permissions) is left for the tool to report.
            debug!(error = %e, "Could not stat source, invoking tool anyway");
        }

        let args = Self::build_args(pair, &self.options);
        let tool = self.tool.name().to_string();

        match self.tool.run(&args).await {
            Err(e) => SyncResult::failed(
                pair.clone(),
                PairError::Spawn {
                    tool,
                    message: e.to_string(),
                },
                start.elapsed(),
                String::new(),
            ),
            Ok(out) if !out.success => SyncResult::failed(
                pair.clone(),
                PairError::ToolFailed {
                    tool,
                    status: out.status,
                },
                start.elapsed(),
                out.output,
            ),
            Ok(out) => {
                let files = parse_files_count(&out.output);
                SyncResult::succeeded(pair.clone(), files, start.elapsed(), out.output)
            }
        }
    }
}

impl std::fmt::Debug for PairExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairExecutor")
            .field("tool", &self.tool.name())
            .field("options", &self.options)
            .finish()
    }
}
