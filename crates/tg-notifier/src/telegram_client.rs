//! Telegram Bot API client
//!
//! Messages are sent with `parse_mode=HTML` and link previews disabled.
//! The bot token is part of every request URL, so transport errors are
//! stripped of their URL before they leave this module.

use crate::client::{NotificationHandle, NotifierClient, NotifierCredentials};
use crate::error::{NotifierError, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::json;

/// Message sent by [`NotifierClient::test_connection`]
pub const TEST_MESSAGE: &str = "✅ <b>APK Builder connected!</b>\nBuild notifications will arrive in this chat.";

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    result: Option<SentMessage>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

/// Telegram implementation of [`NotifierClient`]
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    api_base: String,
}

impl TelegramClient {
    /// Create a client for the given API base (e.g., `https://api.telegram.org`)
    pub fn new(api_base: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), api_base)
    }

    /// Create a client reusing an existing HTTP client
    pub fn with_http_client(http: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    async fn call(
        &self,
        credentials: &NotifierCredentials,
        method: &str,
        payload: serde_json::Value,
    ) -> Result<ApiResponse> {
        credentials.validate()?;

        let url = format!("{}/bot{}/{}", self.api_base, credentials.token, method);
        let response = self.http.post(&url).json(&payload).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed: Option<ApiResponse> = serde_json::from_str(&body).ok();
        match parsed {
            Some(api) if status.is_success() && api.ok => Ok(api),
            Some(api) => Err(NotifierError::Rejected {
                status: status.as_u16(),
                description: api
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            }),
            None if status.is_success() => Err(NotifierError::Parse(format!(
                "{} returned a non-JSON body",
                method
            ))),
            None => Err(NotifierError::Rejected {
                status: status.as_u16(),
                description: body.trim().to_string(),
            }),
        }
    }
}

#[async_trait]
impl NotifierClient for TelegramClient {
    async fn send(
        &self,
        credentials: &NotifierCredentials,
        text: &str,
    ) -> Result<NotificationHandle> {
        let payload = json!({
            "chat_id": credentials.chat_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        });

        let response = self.call(credentials, "sendMessage", payload).await?;
        let message = response
            .result
            .ok_or_else(|| NotifierError::Parse("sendMessage returned no message".to_string()))?;

        debug!("Sent notification {}", message.message_id);
        Ok(NotificationHandle {
            message_id: message.message_id,
        })
    }

    async fn edit(
        &self,
        credentials: &NotifierCredentials,
        handle: &NotificationHandle,
        text: &str,
    ) -> Result<()> {
        let payload = json!({
            "chat_id": credentials.chat_id,
            "message_id": handle.message_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        });

        match self.call(credentials, "editMessageText", payload).await {
            Ok(_) => {
                debug!("Edited notification {}", handle.message_id);
                Ok(())
            }
            Err(NotifierError::Rejected { description, .. })
                if description.contains("message is not modified") =>
            {
                debug!("Notification {} already up to date", handle.message_id);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    async fn test_connection(&self, credentials: &NotifierCredentials) -> Result<bool> {
        match self.send(credentials, TEST_MESSAGE).await {
            Ok(_) => {
                info!("Telegram connection test succeeded");
                Ok(true)
            }
            Err(NotifierError::Rejected {
                status,
                description,
            }) => {
                warn!(
                    "Telegram connection test rejected ({}): {}",
                    status, description
                );
                Ok(false)
            }
            Err(NotifierError::InvalidCredentials(reason)) => {
                warn!("Telegram connection test skipped: {}", reason);
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}
