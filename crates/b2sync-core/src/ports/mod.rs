//! Port definitions (hexagonal architecture interfaces)
//!
//! Traits the cycle logic depends on, with implementations in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`ISyncTool`] - The external sync command (`b2`)
//! - [`IProcessProbe`] - OS process liveness checks for the lock file
//! - [`INotificationService`] - Desktop notifications

pub mod notification;
pub mod process_probe;
pub mod sync_tool;

pub use notification::{
    INotificationService, Notification, NotificationCategory, NotificationPriority,
};
pub use process_probe::IProcessProbe;
pub use sync_tool::{ISyncTool, ToolOptions, ToolOutput};
