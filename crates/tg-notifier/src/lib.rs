//! Telegram notifications for remote builds
//!
//! The [`NotifierClient`] trait abstracts a chat that receives build status
//! messages. A notification is sent once and then edited in place as the
//! build progresses; [`NotificationHandle`] identifies the sent message.
//!
//! [`TelegramClient`] implements the trait on top of the Telegram Bot API.

pub mod client;
pub mod error;
pub mod telegram_client;

/// Default Telegram Bot API base
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

pub use client::{NotificationHandle, NotifierClient, NotifierCredentials};
pub use error::{NotifierError, Result};
pub use telegram_client::TelegramClient;
