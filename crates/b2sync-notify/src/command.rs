//! Notifications through a helper command
//!
//! Covers hosts without a freedesktop notification server: macOS
//! (`terminal-notifier`, `osascript`) and minimal Linux desktops that ship
//! `notify-send` without a reachable session bus.

use std::{
    path::{Path, PathBuf},
    process::Stdio,
};

use anyhow::Context;
use b2sync_core::ports::{Notification, NotificationPriority};
use tokio::process::Command;
use tracing::debug;

/// Supported helper programs, in detection order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    TerminalNotifier,
    Osascript,
    NotifySend,
}

impl CommandKind {
    pub const ALL: [CommandKind; 3] = [
        CommandKind::TerminalNotifier,
        CommandKind::Osascript,
        CommandKind::NotifySend,
    ];

    pub fn program(&self) -> &'static str {
        match self {
            CommandKind::TerminalNotifier => "terminal-notifier",
            CommandKind::Osascript => "osascript",
            CommandKind::NotifySend => "notify-send",
        }
    }

    /// Arguments that display `notification` with this helper
    pub fn args(&self, notification: &Notification) -> Vec<String> {
        match self {
            CommandKind::TerminalNotifier => vec![
                "-title".into(),
                notification.title.clone(),
                "-message".into(),
                notification.body.clone(),
                "-group".into(),
                "b2sync".into(),
            ],
            CommandKind::Osascript => vec![
                "-e".into(),
                format!(
                    "display notification \"{}\" with title \"{}\"",
                    applescript_escape(&notification.body),
                    applescript_escape(&notification.title)
                ),
            ],
            CommandKind::NotifySend => {
                let urgency = match notification.priority {
                    NotificationPriority::Low => "low",
                    NotificationPriority::Normal => "normal",
                    NotificationPriority::High => "critical",
                };
                vec![
                    "--app-name=B2Sync".into(),
                    format!("--urgency={urgency}"),
                    notification.title.clone(),
                    notification.body.clone(),
                ]
            }
        }
    }
}

fn applescript_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Runs a notification helper found on `PATH`
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    kind: CommandKind,
    program: PathBuf,
}

impl CommandNotifier {
    pub fn new(kind: CommandKind, program: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            program: program.into(),
        }
    }

    /// First helper from [`CommandKind::ALL`] that is installed
    pub fn detect() -> Option<Self> {
        CommandKind::ALL.into_iter().find_map(|kind| {
            which::which(kind.program())
                .ok()
                .map(|path| Self::new(kind, path))
        })
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub async fn send(&self, notification: &Notification) -> anyhow::Result<()> {
        let output = Command::new(&self.program)
            .args(self.kind.args(notification))
            .stdin(Stdio::null())
            .output()
            .await
            .with_context(|| format!("failed to run {}", self.kind.program()))?;

        if !output.status.success() {
            anyhow::bail!(
                "{} exited with {}: {}",
                self.kind.program(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        debug!(method = self.kind.program(), "Notification sent");
        Ok(())
    }
}
