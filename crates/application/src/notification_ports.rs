/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    /// Informational message.
    Info,
    /// Something was blocked.
    Warning,
    /// Something failed.
    Error,
}

/// One toast shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Message text.
    pub message: String,
}

impl Notification {
    /// Creates an informational notification.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    /// Creates a warning notification.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    /// Creates an error notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Port for the console's toast surface.
pub trait Notifier: Send + Sync {
    /// Dismisses every notification currently displayed.
    fn dismiss_all(&self);

    /// Displays a notification.
    fn show(&self, notification: Notification);
}
