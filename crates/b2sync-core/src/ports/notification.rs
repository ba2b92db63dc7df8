//! Notification service port (driven/secondary port)
//!
//! This module defines the interface for sending desktop notifications.
//! Implementations may use D-Bus (freedesktop notifications), a platform
//! helper command, or simply log the message.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because notification delivery is adapter-specific.
//! - Notifications are fire-and-forget; the caller does not wait for
//!   user interaction and a delivery failure never fails a sync cycle.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Priority level for a notification
///
/// Maps to urgency levels in notification systems (e.g., libnotify urgency).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    /// Low priority, may not be shown immediately
    Low,
    /// Normal priority, shown in the notification area
    #[default]
    Normal,
    /// High priority, may trigger a banner or sound
    High,
}

impl NotificationPriority {
    /// freedesktop `urgency` hint value
    pub fn urgency(&self) -> u8 {
        match self {
            NotificationPriority::Low => 0,
            NotificationPriority::Normal => 1,
            NotificationPriority::High => 2,
        }
    }
}

impl fmt::Display for NotificationPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotificationPriority::Low => "low",
            NotificationPriority::Normal => "normal",
            NotificationPriority::High => "high",
        };
        write!(f, "{}", s)
    }
}

/// What a notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// A cycle completed above the notification threshold
    Sync,
    /// A cycle or pair failed, or the tool is missing
    Error,
    /// A cycle was skipped because another one is running
    Skipped,
    /// Service start and stop
    Lifecycle,
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotificationCategory::Sync => "sync",
            NotificationCategory::Error => "error",
            NotificationCategory::Skipped => "skipped",
            NotificationCategory::Lifecycle => "lifecycle",
        };
        write!(f, "{}", s)
    }
}

/// A notification to display to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Title of the notification (short, descriptive)
    pub title: String,
    /// Body text with details about the event
    pub body: String,
    /// Priority level affecting how the notification is displayed
    pub priority: NotificationPriority,
    /// Category for grouping and for tests to match on
    pub category: NotificationCategory,
}

impl Notification {
    fn new(
        category: NotificationCategory,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            priority: NotificationPriority::Normal,
            category,
        }
    }

    /// Sets the priority level
    pub fn with_priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Creates a sync-completed notification
    pub fn sync(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(NotificationCategory::Sync, title, body)
    }

    /// Creates an error notification with High priority
    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(NotificationCategory::Error, title, body)
            .with_priority(NotificationPriority::High)
    }

    /// Creates a skipped-cycle notification with Low priority
    pub fn skipped(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(NotificationCategory::Skipped, title, body)
            .with_priority(NotificationPriority::Low)
    }

    /// Creates a service lifecycle notification
    pub fn lifecycle(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(NotificationCategory::Lifecycle, title, body)
    }
}

/// Port trait for desktop notifications
///
/// ## Implementation Notes
///
/// - `notify` sends a one-shot notification (toast/banner).
/// - Implementations should report failures (e.g., missing notification
///   daemon) as errors rather than panicking; callers log and move on.
#[async_trait::async_trait]
pub trait INotificationService: Send + Sync {
    /// Sends a desktop notification to the user
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()>;
}
