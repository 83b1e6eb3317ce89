//! External services used by middleware

use apk_builder_config::AppConfig;
use gh_client::{GitHubClientFactory, OctocrabClientFactory};
use std::sync::Arc;
use tg_notifier::{NotifierClient, TelegramClient};

/// Clients and configuration shared by all middleware
#[derive(Clone)]
pub struct Services {
    pub github: Arc<dyn GitHubClientFactory>,
    pub notifier: Arc<dyn NotifierClient>,
    pub config: Arc<AppConfig>,
}

impl Services {
    /// Production services talking to the configured API bases
    pub fn from_config(config: AppConfig) -> Self {
        Self {
            github: Arc::new(OctocrabClientFactory::new(config.github_api_url.clone())),
            notifier: Arc::new(TelegramClient::new(config.telegram_api_url.clone())),
            config: Arc::new(config),
        }
    }
}
