//! Build Actions
//!
//! Lifecycle of one build attempt. Every result coming back from a spawned
//! stage carries the attempt number, so results of an abandoned attempt can
//! be told apart from the current one.

use crate::domain_models::{BuildStage, BuildTarget, Credentials};
use gh_client::FileWriteKind;

/// What the user asked to build, with the credentials to build it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub target: BuildTarget,
    pub credentials: Credentials,
}

/// Data produced by a setup stage that finished successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    TokenVerified { login: String },
    ReposFetched { count: usize },
    AccessVerified,
    WorkflowReady { kind: FileWriteKind },
    /// Notifications stay disabled for the attempt when `enabled` is false
    NotifierChecked {
        enabled: bool,
        reason: Option<String>,
    },
    /// The newest run that existed before the dispatch, if any
    BuildDispatched { baseline_run_id: Option<u64> },
}

impl StageOutcome {
    /// The stage that produced this outcome
    pub fn stage(&self) -> BuildStage {
        match self {
            StageOutcome::TokenVerified { .. } => BuildStage::CheckingToken,
            StageOutcome::ReposFetched { .. } => BuildStage::FetchingRepos,
            StageOutcome::AccessVerified => BuildStage::VerifyingAccess,
            StageOutcome::WorkflowReady { .. } => BuildStage::SettingUpWorkflow,
            StageOutcome::NotifierChecked { .. } => BuildStage::TestingNotifier,
            StageOutcome::BuildDispatched { .. } => BuildStage::TriggeringBuild,
        }
    }

    /// One-line description for the status bar
    pub fn describe(&self) -> String {
        match self {
            StageOutcome::TokenVerified { login } => format!("Authenticated as {}", login),
            StageOutcome::ReposFetched { count } => format!("Found {} repositories", count),
            StageOutcome::AccessVerified => "Repository access confirmed".to_string(),
            StageOutcome::WorkflowReady {
                kind: FileWriteKind::Created,
            } => "Workflow file created".to_string(),
            StageOutcome::WorkflowReady {
                kind: FileWriteKind::Updated,
            } => "Workflow file updated".to_string(),
            StageOutcome::NotifierChecked { enabled: true, .. } => {
                "Telegram notifications enabled".to_string()
            }
            StageOutcome::NotifierChecked {
                enabled: false,
                reason,
            } => match reason {
                Some(reason) => format!("Telegram notifications disabled: {}", reason),
                None => "Telegram notifications disabled".to_string(),
            },
            StageOutcome::BuildDispatched { .. } => "Build dispatched to GitHub Actions".to_string(),
        }
    }
}

/// Actions for the build attempt
#[derive(Debug, Clone)]
pub enum BuildAction {
    /// User asked for a build; only honored while idle
    Start(BuildRequest),
    /// A new attempt begins
    Started { attempt: u64, request: BuildRequest },
    /// A setup stage finished
    StageSucceeded { attempt: u64, outcome: StageOutcome },
    /// A setup stage failed; `message` carries the next steps
    StageFailed {
        attempt: u64,
        stage: BuildStage,
        message: String,
    },
    /// Ask GitHub to cancel the observed run
    CancelRun,
    /// User has seen the outcome; back to idle
    Acknowledge,
}
