//! B2Sync Daemon - Background backup service
//!
//! This binary runs as a user service and handles:
//! - Periodic sync cycles of every configured pair to Backblaze B2
//! - Desktop notifications for failures, skips and large transfers
//! - Daily log files with bounded retention
//! - Graceful shutdown on SIGTERM/SIGINT
//!
//! # Architecture
//!
//! After startup checks the daemon enters a loop driven by a
//! `tokio::time::interval`. The first tick fires immediately, so a cycle
//! runs at startup. The loop is controlled by a `CancellationToken` that is
//! triggered on receipt of SIGTERM or SIGINT. A cycle in progress always
//! runs to completion; the signal is acted on between cycles.

mod logging;

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use b2sync_core::{
    config::{Config, SyncConfig},
    ports::INotificationService,
};
use b2sync_notify::DesktopNotifier;
use b2sync_sync::{
    policy::{dispatch, messages},
    NotificationPolicy, SyncOrchestrator,
};
use logging::LogRotation;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

// ============================================================================
// DaemonService
// ============================================================================

/// Main daemon service driving periodic sync cycles
struct DaemonService {
    orchestrator: SyncOrchestrator,
    policy: NotificationPolicy,
    notifier: Arc<dyn INotificationService>,
    rotation: LogRotation,
    frequency: Duration,
    /// Token for signalling graceful shutdown
    shutdown: CancellationToken,
}

impl DaemonService {
    fn new(
        config: &Config,
        orchestrator: SyncOrchestrator,
        notifier: Arc<dyn INotificationService>,
        shutdown: CancellationToken,
    ) -> Self {
        let mut frequency = config.sync.frequency;
        if frequency.is_zero() {
            frequency = SyncConfig::default().frequency;
            warn!(
                fallback_secs = frequency.as_secs(),
                "sync.frequency is zero, using the default"
            );
        }

        Self {
            orchestrator,
            policy: NotificationPolicy::new(config.notifications.threshold),
            notifier,
            rotation: LogRotation::from_config(&config.logging),
            frequency,
            shutdown,
        }
    }

    /// Runs the daemon until shutdown is requested
    ///
    /// 1. Verifies the sync tool is installed (fatal if not)
    /// 2. Announces startup
    /// 3. Runs the sync loop
    /// 4. Announces shutdown
    async fn run(&self) -> Result<()> {
        match self.orchestrator.check_tool() {
            Ok(path) => info!(tool = %path.display(), "Sync tool found"),
            Err(e) => {
                error!(error = %e, "Sync tool is not installed");
                dispatch(self.notifier.as_ref(), &[messages::tool_not_installed()]).await;
                return Err(e.into());
            }
        }

        dispatch(self.notifier.as_ref(), &[messages::started()]).await;

        self.sync_loop().await;

        dispatch(self.notifier.as_ref(), &[messages::stopped()]).await;
        Ok(())
    }

    /// Main loop: one cycle per tick until cancelled
    async fn sync_loop(&self) {
        info!(
            frequency_secs = self.frequency.as_secs(),
            pairs = self.orchestrator.pairs().len(),
            "Starting sync loop"
        );

        let mut interval = tokio::time::interval(self.frequency);
        // A cycle that overruns the period does not cause a burst of catch-up cycles.
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // The first tick fires immediately; that is the startup cycle.
        interval.tick().await;
        self.run_once().await;

        loop {
            // Shutdown wins over a tick that became ready during a long cycle.
            tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown signal received");
                    break;
                }
                _ = interval.tick() => self.run_once().await,
            }
        }

        info!("Sync loop terminated");
    }

    /// Log retention, then one cycle, then its notifications
    async fn run_once(&self) {
        match self.rotation.rotate_if_needed() {
            Ok(0) => {}
            Ok(removed) => info!(removed, "Pruned old log files"),
            Err(e) => warn!(
                error = %e,
                dir = %self.rotation.dir().display(),
                "Log rotation failed"
            ),
        }

        info!("Starting sync cycle");
        let outcome = self.orchestrator.run_cycle().await;

        match outcome.abort_reason() {
            Some(reason) => info!(reason = %reason, "Sync cycle aborted"),
            None => info!(
                pairs = outcome.results().len(),
                failed = outcome.failures().count(),
                files = outcome.successful_files(),
                "Sync cycle completed"
            ),
        }

        self.policy.notify(&outcome, self.notifier.as_ref()).await;
    }
}

// ============================================================================
// Graceful shutdown signal handler
// ============================================================================

/// Waits for SIGTERM or SIGINT and triggers the cancellation token
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    token.cancel();
}

// ============================================================================
// Main entry point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = Config::default_path();
    let config = Config::load_if_present(&config_path)
        .with_context(|| format!("Invalid configuration at {}", config_path.display()))?;

    let _log_guard = logging::init(&config.logging)?;

    info!(config_path = %config_path.display(), "B2Sync daemon starting (b2syncd)");
    for issue in config.validate() {
        warn!(field = %issue.field, "Configuration problem: {}", issue.message);
    }

    let notifier: Arc<dyn INotificationService> = Arc::new(DesktopNotifier::detect().await);

    let shutdown_token = CancellationToken::new();
    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        shutdown_signal(signal_token).await;
    });

    let orchestrator = SyncOrchestrator::from_config(&config);
    let service = DaemonService::new(&config, orchestrator, notifier, shutdown_token);

    let result = service.run().await;

    match &result {
        Ok(()) => info!("B2Sync daemon shut down gracefully"),
        Err(e) => error!(error = %e, "B2Sync daemon exiting with error"),
    }

    result
}

// ============================================================================
// Tests
// ============================================================================
