//! freedesktop notifications over the D-Bus session bus

use std::collections::HashMap;

use anyhow::Context;
use b2sync_core::ports::Notification;
use tracing::debug;
use zbus::zvariant::Value;

const APP_NAME: &str = "B2Sync";
const NOTIFICATIONS_NAME: &str = "org.freedesktop.Notifications";
/// Let the server pick the display time
const DEFAULT_TIMEOUT: i32 = -1;

#[zbus::proxy(
    interface = "org.freedesktop.Notifications",
    default_service = "org.freedesktop.Notifications",
    default_path = "/org/freedesktop/Notifications"
)]
trait Notifications {
    fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: &[&str],
        hints: HashMap<&str, Value<'_>>,
        expire_timeout: i32,
    ) -> zbus::Result<u32>;
}

/// Sends notifications through `org.freedesktop.Notifications`
pub struct DbusNotifier {
    proxy: NotificationsProxy<'static>,
}

impl DbusNotifier {
    /// Connects to the session bus and checks a notification server is there
    pub async fn connect() -> anyhow::Result<Self> {
        let connection = zbus::Connection::session()
            .await
            .context("no D-Bus session bus")?;

        let dbus_proxy = zbus::fdo::DBusProxy::new(&connection).await?;
        let has_owner = dbus_proxy
            .name_has_owner(NOTIFICATIONS_NAME.try_into()?)
            .await?;
        if !has_owner {
            anyhow::bail!("{NOTIFICATIONS_NAME} is not owned on the session bus");
        }

        let proxy = NotificationsProxy::new(&connection).await?;
        Ok(Self { proxy })
    }

    pub async fn send(&self, notification: &Notification) -> anyhow::Result<()> {
        let mut hints = HashMap::new();
        hints.insert("urgency", Value::from(notification.priority.urgency()));

        let id = self
            .proxy
            .notify(
                APP_NAME,
                0,
                "",
                &notification.title,
                &notification.body,
                &[],
                hints,
                DEFAULT_TIMEOUT,
            )
            .await
            .context("Notify call failed")?;

        debug!(id, "Notification sent via D-Bus");
        Ok(())
    }
}

impl std::fmt::Debug for DbusNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbusNotifier").finish_non_exhaustive()
    }
}
