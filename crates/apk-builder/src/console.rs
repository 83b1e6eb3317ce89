//! Console output
//!
//! Prints what changed in the state since the last render.

use crate::domain_models::BuildStage;
use gh_client::FileWriteKind;
use crate::state::{AppState, BuildState, RepositoryListState};

/// Remembers what has already been printed
pub struct ConsoleView {
    status_text: String,
    seen_activity: usize,
}

impl ConsoleView {
    pub fn new(state: &AppState) -> Self {
        Self {
            status_text: state.build.status_text.clone(),
            seen_activity: state.activity.recorded(),
        }
    }

    pub fn render(&mut self, state: &AppState) {
        for entry in state.activity.since(self.seen_activity) {
            log::debug!("Activity from {}: {}", entry.source, entry.message);
            println!("   {}", entry.line());
        }
        self.seen_activity = state.activity.recorded();

        if state.build.status_text != self.status_text {
            self.status_text = state.build.status_text.clone();
            if !self.status_text.is_empty() {
                println!("{}", self.status_text);
            }
        }
    }
}

pub fn banner() {
    println!("📱 APK Builder");
    println!("{}", BuildStage::Idle.message());
    println!();
}

pub fn hint(message: &str) {
    println!("👉 {}", message);
}

pub fn log_location(path: &std::path::Path) {
    println!("📝 Logging to {}", path.display());
}

/// Final report of an attempt
pub fn outcome(build: &BuildState) {
    println!();
    if let Some(login) = &build.login {
        let workflow = match build.workflow_write {
            Some(FileWriteKind::Created) => "created",
            Some(FileWriteKind::Updated) => "updated",
            None => "not written",
        };
        println!(
            "👤 {} · 📚 {} repositories · 📝 workflow {}",
            login,
            build.repository_count.unwrap_or_default(),
            workflow
        );
    }
    match build.stage {
        BuildStage::Completed => {
            println!("🎉 {}", build.stage.message());
            if let Some(run) = &build.last_observed_run {
                println!("{}", run.summary());
                println!("🔗 {}", run.html_url);
            }
        }
        BuildStage::Failed => {
            println!("{}", build.stage.message());
            if let Some(failure) = &build.failure {
                println!("{}", failure);
            }
        }
        stage => {
            println!("⏹️ Stopped watching the build while {}", stage);
            if let Some(target) = &build.target {
                println!("Follow it at {}", target.actions_url());
            }
        }
    }
    println!();
}

pub fn repositories(list: &RepositoryListState) {
    match list {
        RepositoryListState::Loaded(repositories) if repositories.is_empty() => {
            println!("No repositories visible to this token.");
        }
        RepositoryListState::Loaded(repositories) => {
            for repository in repositories {
                let visibility = if repository.private { "🔒" } else { "🌐" };
                println!(
                    "  {} {} ({})",
                    visibility,
                    repository.full_name,
                    repository.default_branch.as_deref().unwrap_or("-")
                );
            }
        }
        RepositoryListState::Failed(message) => println!("🚨 Could not list repositories: {}", message),
        RepositoryListState::NotLoaded | RepositoryListState::Loading => {}
    }
    println!();
}

pub fn notifier_test(result: &Option<Result<bool, String>>) {
    match result {
        Some(Ok(true)) => println!("✅ Test message delivered."),
        Some(Ok(false)) => println!("⚠️ Telegram rejected the test message. Check bot token and chat id."),
        Some(Err(message)) => println!("🚨 Could not reach Telegram: {}", message),
        None => {}
    }
    println!();
}
