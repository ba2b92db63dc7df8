//! B2Sync Notify - Desktop notification delivery
//!
//! Implements the [`INotificationService`] port for whatever the desktop
//! offers. [`DesktopNotifier::detect`] probes once at startup, in order:
//!
//! 1. freedesktop notifications over the D-Bus session bus
//! 2. `terminal-notifier`
//! 3. `osascript`
//! 4. `notify-send`
//! 5. the log
//!
//! Whatever is picked stays in use for the life of the process.

pub mod command;
pub mod dbus;

use async_trait::async_trait;
use b2sync_core::ports::{INotificationService, Notification};
use tracing::{debug, info, warn};

pub use command::{CommandKind, CommandNotifier};
pub use dbus::DbusNotifier;

/// Notification backend chosen at startup
#[derive(Debug)]
pub enum Backend {
    DBus(DbusNotifier),
    Command(CommandNotifier),
    /// Writes notifications to the log only
    Log,
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::DBus(_) => "dbus",
            Backend::Command(cmd) => cmd.kind().program(),
            Backend::Log => "log",
        }
    }
}

/// [`INotificationService`] backed by the best available desktop mechanism
#[derive(Debug)]
pub struct DesktopNotifier {
    backend: Backend,
}

impl DesktopNotifier {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    /// Notifier that only logs
    pub fn log_only() -> Self {
        Self::new(Backend::Log)
    }

    /// Picks the first working backend
    pub async fn detect() -> Self {
        let backend = match DbusNotifier::connect().await {
            Ok(notifier) => Backend::DBus(notifier),
            Err(e) => {
                debug!(error = %e, "Freedesktop notifications unavailable");
                match CommandNotifier::detect() {
                    Some(cmd) => Backend::Command(cmd),
                    None => {
                        warn!(
                            "No desktop notification mechanism found, notifications will only be logged"
                        );
                        Backend::Log
                    }
                }
            }
        };

        info!(backend = backend.name(), "Notification backend selected");
        Self::new(backend)
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }
}

#[async_trait]
impl INotificationService for DesktopNotifier {
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
        match &self.backend {
            Backend::DBus(dbus) => dbus.send(notification).await?,
            Backend::Command(cmd) => cmd.send(notification).await?,
            Backend::Log => {}
        }

        info!(
            category = %notification.category,
            priority = %notification.priority,
            title = %notification.title,
            body = %notification.body,
            "Notification"
        );
        Ok(())
    }
}
