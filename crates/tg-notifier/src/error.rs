//! Notifier error taxonomy

use thiserror::Error;

/// Errors raised by [`crate::NotifierClient`] implementations
///
/// None of these are fatal to a build; callers log them and move on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifierError {
    /// Transport or network failure; never contains the bot token
    #[error("could not reach Telegram: {0}")]
    Connectivity(String),

    /// Telegram answered with an error
    #[error("Telegram rejected the request ({status}): {description}")]
    Rejected { status: u16, description: String },

    /// Token or chat id missing or malformed; no request was made
    #[error("invalid notifier credentials: {0}")]
    InvalidCredentials(String),

    /// A response had an unexpected shape
    #[error("unexpected Telegram response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for NotifierError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL embeds the bot token
        NotifierError::Connectivity(err.without_url().to_string())
    }
}

/// Result alias for notifier operations
pub type Result<T> = std::result::Result<T, NotifierError>;
