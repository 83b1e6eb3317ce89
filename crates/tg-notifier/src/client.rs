//! Notifier client trait and credential types

use crate::error::{NotifierError, Result};
use async_trait::async_trait;
use std::fmt;

/// Bot token and target chat
///
/// Held in memory only. `Debug` output redacts the token.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct NotifierCredentials {
    /// Bot token (`123456:ABC-DEF...`)
    pub token: String,
    /// Target chat id (numeric, negative for groups) or `@channel` name
    pub chat_id: String,
}

impl fmt::Debug for NotifierCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifierCredentials")
            .field("token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl NotifierCredentials {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            token: token.into().trim().to_string(),
            chat_id: chat_id.into().trim().to_string(),
        }
    }

    /// Check the credentials locally, without contacting Telegram
    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(NotifierError::InvalidCredentials(
                "bot token is empty".to_string(),
            ));
        }
        let well_formed_token = self
            .token
            .split_once(':')
            .is_some_and(|(bot_id, secret)| {
                !bot_id.is_empty()
                    && bot_id.chars().all(|c| c.is_ascii_digit())
                    && !secret.is_empty()
            });
        if !well_formed_token {
            return Err(NotifierError::InvalidCredentials(
                "bot token must look like <bot id>:<secret>".to_string(),
            ));
        }

        if self.chat_id.is_empty() {
            return Err(NotifierError::InvalidCredentials(
                "chat id is empty".to_string(),
            ));
        }
        let numeric = self.chat_id.strip_prefix('-').unwrap_or(&self.chat_id);
        let well_formed_chat = self.chat_id.starts_with('@')
            || (!numeric.is_empty() && numeric.chars().all(|c| c.is_ascii_digit()));
        if !well_formed_chat {
            return Err(NotifierError::InvalidCredentials(format!(
                "chat id '{}' is neither numeric nor an @channel name",
                self.chat_id
            )));
        }

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Identifies a sent notification so it can be edited later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationHandle {
    pub message_id: i64,
}

/// Chat notification client
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; sends and edits run in
/// independent tasks.
#[async_trait]
pub trait NotifierClient: Send + Sync {
    /// Send a new HTML message
    ///
    /// # Returns
    ///
    /// A handle for later edits of the same message.
    async fn send(&self, credentials: &NotifierCredentials, text: &str)
        -> Result<NotificationHandle>;

    /// Replace the text of a previously sent message
    ///
    /// Editing a message to the text it already has succeeds.
    async fn edit(
        &self,
        credentials: &NotifierCredentials,
        handle: &NotificationHandle,
        text: &str,
    ) -> Result<()>;

    /// Send a canned message to check token and chat
    ///
    /// # Returns
    ///
    /// `false` if Telegram rejects the message or the credentials are
    /// malformed; transport failures are errors.
    async fn test_connection(&self, credentials: &NotifierCredentials) -> Result<bool>;
}
