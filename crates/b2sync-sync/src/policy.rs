//! Notification policy
//!
//! Turns a [`CycleOutcome`] into the notifications the user should see.
//!
//! | Outcome                         | Notifications                          |
//! |---------------------------------|----------------------------------------|
//! | `Aborted(AlreadyRunning)`       | one skip notice, nothing else          |
//! | `Aborted(ToolUnavailable)`      | one "tool not installed" error         |
//! | `Aborted(Lock)`                 | one failure                            |
//! | `Completed` with failed pairs   | one failure per failed pair            |
//! | `Completed`, all ok, ≥ threshold| one success with the total file count  |
//! | `Completed`, all ok, < threshold| nothing                                |
//!
//! The threshold keeps no-op cycles quiet.

use b2sync_core::{
    domain::{CycleError, CycleOutcome},
    ports::{INotificationService, Notification},
};
use tracing::{debug, error};

/// Fixed notification texts
pub mod messages {
    use std::fmt::Display;

    use b2sync_core::ports::Notification;

    const ERROR_TITLE: &str = "B2Sync Error";

    pub fn tool_not_installed() -> Notification {
        Notification::error(
            ERROR_TITLE,
            "Backblaze B2 CLI is not installed. Please install it first.",
        )
    }

    pub fn sync_failed(error: &dyn Display) -> Notification {
        Notification::error(ERROR_TITLE, format!("Sync failed: {error}"))
    }

    pub fn pair_failed(destination: &str, error: &dyn Display) -> Notification {
        Notification::error(
            ERROR_TITLE,
            format!("Sync failed for {destination}: {error}"),
        )
    }

    pub fn sync_skipped() -> Notification {
        Notification::skipped(
            "B2Sync Info",
            "Sync skipped - another sync is already in progress",
        )
    }

    pub fn sync_complete(files: u64) -> Notification {
        Notification::sync(
            "B2Sync Complete",
            format!("Successfully synced {files} files to Backblaze B2"),
        )
    }

    pub fn started() -> Notification {
        Notification::lifecycle(
            "B2Sync Started",
            "B2Sync background service has started successfully",
        )
    }

    pub fn stopped() -> Notification {
        Notification::lifecycle("B2Sync Stopped", "B2Sync background service has been stopped")
    }
}

/// Threshold-gated selection of cycle notifications
#[derive(Debug, Clone, Copy)]
pub struct NotificationPolicy {
    threshold: u64,
}

impl NotificationPolicy {
    pub fn new(threshold: u64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Notifications for one cycle, in the order they should be shown
    pub fn evaluate(&self, outcome: &CycleOutcome) -> Vec<Notification> {
        let results = match outcome {
            CycleOutcome::Aborted(CycleError::AlreadyRunning) => {
                return vec![messages::sync_skipped()];
            }
            CycleOutcome::Aborted(CycleError::ToolUnavailable { .. }) => {
                return vec![messages::tool_not_installed()];
            }
            CycleOutcome::Aborted(err @ CycleError::Lock(_)) => {
                return vec![messages::sync_failed(err)];
            }
            CycleOutcome::Completed(results) => results,
        };

        let failures: Vec<Notification> = results
            .iter()
            .filter(|r| !r.success)
            .map(|r| match &r.error {
                Some(err) => messages::pair_failed(&r.pair.destination, err),
                None => messages::pair_failed(&r.pair.destination, &"unknown error"),
            })
            .collect();
        if !failures.is_empty() {
            return failures;
        }

        let total = outcome.successful_files();
        if total >= self.threshold {
            vec![messages::sync_complete(total)]
        } else {
            debug!(
                files = total,
                threshold = self.threshold,
                "Below notification threshold, staying quiet"
            );
            Vec::new()
        }
    }

    /// Evaluates `outcome` and sends the result through `notifier`
    pub async fn notify(&self, outcome: &CycleOutcome, notifier: &dyn INotificationService) {
        dispatch(notifier, &self.evaluate(outcome)).await;
    }
}

/// Sends notifications one by one; delivery failures are logged and skipped
pub async fn dispatch(notifier: &dyn INotificationService, notifications: &[Notification]) {
    for notification in notifications {
        if let Err(e) = notifier.notify(notification).await {
            error!(
                title = %notification.title,
                error = %e,
                "Failed to deliver notification"
            );
        }
    }
}
