//! Application configuration
//!
//! Configuration loaded from .apk-builder.toml file.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the generated workflow gets the Telegram credentials
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretsMode {
    /// Token and chat id are written into the workflow file
    #[default]
    Inline,
    /// The workflow references `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID` repository secrets
    RepositorySecrets,
}

/// Application configuration loaded from .apk-builder.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// GitHub REST API base URL
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,

    /// Telegram Bot API base URL
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,

    /// Branch the workflow is committed to and dispatched on
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Path of the generated workflow inside the repository
    #[serde(default = "default_workflow_path")]
    pub workflow_path: String,

    /// Commit message used when writing the workflow file
    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Seconds before the first status probe after a dispatch
    #[serde(default = "default_poll_initial_delay_secs")]
    pub poll_initial_delay_secs: u64,

    /// Seconds between status probes
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Build variant preselected in the prompt
    #[serde(default = "default_variant")]
    pub default_variant: String,

    /// Where the workflow reads the notifier credentials from
    #[serde(default)]
    pub notifier_secrets: SecretsMode,
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_workflow_path() -> String {
    ".github/workflows/android-build.yml".to_string()
}

fn default_commit_message() -> String {
    "Add Android build workflow".to_string()
}

fn default_poll_initial_delay_secs() -> u64 {
    5
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_variant() -> String {
    "debug".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            github_api_url: default_github_api_url(),
            telegram_api_url: default_telegram_api_url(),
            branch: default_branch(),
            workflow_path: default_workflow_path(),
            commit_message: default_commit_message(),
            poll_initial_delay_secs: default_poll_initial_delay_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            default_variant: default_variant(),
            notifier_secrets: SecretsMode::default(),
        }
    }
}

impl AppConfig {
    /// Load config from the first config file found, or use defaults
    pub fn load() -> Self {
        if let Some(source) = crate::load_config_file() {
            match toml::from_str(&source.content) {
                Ok(config) => {
                    log::info!("Loaded app config from {}", source.path.display());
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}", source.path.display(), e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }

    /// File name of the workflow, which GitHub accepts as the workflow id
    pub fn workflow_file_name(&self) -> &str {
        self.workflow_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.workflow_path)
    }

    pub fn poll_initial_delay(&self) -> Duration {
        Duration::from_secs(self.poll_initial_delay_secs)
    }

    /// Interval between probes; never below one second
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.github_api_url, "https://api.github.com");
        assert_eq!(config.telegram_api_url, "https://api.telegram.org");
        assert_eq!(config.branch, "main");
        assert_eq!(config.workflow_path, ".github/workflows/android-build.yml");
        assert_eq!(config.poll_initial_delay(), Duration::from_secs(5));
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.notifier_secrets, SecretsMode::Inline);
        assert_eq!(config.workflow_file_name(), "android-build.yml");
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml = r#"
            branch = "develop"
            poll_interval_secs = 30
            notifier_secrets = "repository_secrets"
        "#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.branch, "develop");
        assert_eq!(config.poll_interval(), Duration::from_secs(30));
        assert_eq!(config.notifier_secrets, SecretsMode::RepositorySecrets);
        // Other fields should use defaults
        assert_eq!(config.default_variant, "debug");
        assert_eq!(config.commit_message, "Add Android build workflow");
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config: AppConfig = toml::from_str("poll_interval_secs = 0").unwrap();
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_unknown_secrets_mode_is_rejected() {
        assert!(toml::from_str::<AppConfig>(r#"notifier_secrets = "vault""#).is_err());
    }
}
