//! Interactive prompts
//!
//! Secrets are read with hidden input and kept in memory for the session.

use anyhow::{Context, Result};
use apk_builder_config::AppConfig;
use dialoguer::{Input, Password, Select};
use strum::{EnumIter, IntoEnumIterator};
use tg_notifier::NotifierCredentials;

use crate::actions::BuildRequest;
use crate::domain_models::{BuildTarget, Credentials};

/// Main menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum MenuChoice {
    StartBuild,
    TestNotifier,
    ListRepositories,
    Quit,
}

impl MenuChoice {
    fn label(&self) -> &'static str {
        match self {
            MenuChoice::StartBuild => "🚀 Build APK",
            MenuChoice::TestNotifier => "💬 Test Telegram connection",
            MenuChoice::ListRepositories => "📚 List accessible repositories",
            MenuChoice::Quit => "👋 Quit",
        }
    }
}

pub fn main_menu() -> Result<MenuChoice> {
    let choices: Vec<MenuChoice> = MenuChoice::iter().collect();
    let labels: Vec<&str> = choices.iter().map(MenuChoice::label).collect();

    let selection = Select::new()
        .with_prompt("What do you want to do?")
        .items(&labels)
        .default(0)
        .interact()
        .context("Menu selection failed")?;

    Ok(choices[selection])
}

pub fn ci_token() -> Result<String> {
    Password::new()
        .with_prompt("GitHub token (repo and workflow scope)")
        .interact()
        .context("Reading the GitHub token failed")
}

pub fn notifier_credentials() -> Result<NotifierCredentials> {
    let token = Password::new()
        .with_prompt("Telegram bot token")
        .interact()
        .context("Reading the bot token failed")?;
    let chat_id: String = Input::new()
        .with_prompt("Telegram chat id")
        .interact_text()
        .context("Reading the chat id failed")?;
    Ok(NotifierCredentials::new(token, chat_id))
}

/// Ask for everything a build needs; credentials are reused when given
pub fn build_request(config: &AppConfig, credentials: Option<&Credentials>) -> Result<BuildRequest> {
    let repository: String = Input::new()
        .with_prompt("Repository (owner/repo or GitHub URL)")
        .validate_with(|input: &String| -> Result<(), String> {
            BuildTarget::parse(input, "debug")
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .context("Reading the repository failed")?;

    let variant: String = Input::new()
        .with_prompt("Build variant")
        .default(config.default_variant.clone())
        .interact_text()
        .context("Reading the build variant failed")?;

    let target = BuildTarget::parse(&repository, &variant)?;

    let credentials = match credentials {
        Some(credentials) => credentials.clone(),
        None => Credentials::new(ci_token()?, notifier_credentials()?),
    };

    Ok(BuildRequest {
        target,
        credentials,
    })
}
