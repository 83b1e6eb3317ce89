//! Notification Actions

use tg_notifier::{NotificationHandle, NotifierCredentials};

/// Actions for chat notifications
#[derive(Debug, Clone)]
pub enum NotificationAction {
    /// The progress message was sent and can now be edited
    Sent {
        attempt: u64,
        handle: NotificationHandle,
    },
    /// The progress message could not be sent
    SendFailed { attempt: u64, error: String },
    /// Send a canned message to check the credentials
    TestConnection(NotifierCredentials),
    /// Outcome of a connection test
    ConnectionTested(Result<bool, String>),
}
