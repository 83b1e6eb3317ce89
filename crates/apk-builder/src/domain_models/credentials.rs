//! Session credentials
//!
//! Entered per session and held in memory only.

use std::fmt;
use tg_notifier::NotifierCredentials;

/// GitHub token plus the Telegram bot credentials
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    pub ci_token: String,
    pub notifier: NotifierCredentials,
}

impl Credentials {
    pub fn new(ci_token: impl Into<String>, notifier: NotifierCredentials) -> Self {
        Self {
            ci_token: ci_token.into().trim().to_string(),
            notifier,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("ci_token", &"[REDACTED]")
            .field("notifier", &self.notifier)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = Credentials::new(
            "ghp_topsecret",
            NotifierCredentials::new("123:bot-secret", "42"),
        );
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("ghp_topsecret"));
        assert!(!debug.contains("bot-secret"));
        assert!(debug.contains("42"));
    }
}
