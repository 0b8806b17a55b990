//! Console notifier for the terminal client. Logs toasts to tracing output.

use std::sync::Mutex;

use fieldops_application::{Notification, NotificationLevel, Notifier};
use tracing::{debug, error, info, warn};

/// Notifier that writes toasts to tracing and remembers the visible ones.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    displayed: Mutex<Vec<Notification>>,
}

impl ConsoleNotifier {
    /// Creates a console notifier with nothing displayed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the notifications currently displayed.
    #[must_use]
    pub fn displayed(&self) -> Vec<Notification> {
        self.displayed
            .lock()
            .map(|displayed| displayed.clone())
            .unwrap_or_default()
    }
}

impl Notifier for ConsoleNotifier {
    fn dismiss_all(&self) {
        if let Ok(mut displayed) = self.displayed.lock() {
            if !displayed.is_empty() {
                debug!(count = displayed.len(), "dismissed notifications");
            }
            displayed.clear();
        }
    }

    fn show(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Info => info!(text = %notification.message, "notification shown"),
            NotificationLevel::Warning => warn!(text = %notification.message, "notification shown"),
            NotificationLevel::Error => error!(text = %notification.message, "notification shown"),
        }

        if let Ok(mut displayed) = self.displayed.lock() {
            displayed.push(notification);
        }
    }
}
