//! Failure messages with next steps
//!
//! Every terminal failure shown to the user names what went wrong and what
//! to check before starting the build again.

use super::{BuildStage, BuildTarget};
use gh_client::{GitHubError, WorkflowRunStatus};

const GENERAL_CHECKS: &str = "Please check:\n\
• GitHub token permissions (need repo and workflow scope)\n\
• Repository exists and is accessible\n\
• All fields are filled correctly\n\
• Internet connection is stable";

/// Message for a repository that the token cannot read
pub fn access_denied(target: &BuildTarget) -> String {
    format!(
        "Cannot access repository {}. Check:\n\
         • Repository exists\n\
         • GitHub token has repo permissions\n\
         • Repository is not private (or token has access)",
        target.full_name()
    )
}

/// Message for a GitHub error raised while a setup stage was running
pub fn stage_failure(stage: BuildStage, err: &GitHubError, target: &BuildTarget) -> String {
    let hint = match (stage, err) {
        (_, GitHubError::Connectivity(_)) => {
            "GitHub could not be reached. Check your internet connection and try again.".to_string()
        }
        (BuildStage::CheckingToken, _) => {
            "The GitHub token was rejected. Create a new token with repo and workflow scope."
                .to_string()
        }
        (BuildStage::SettingUpWorkflow, GitHubError::WorkflowSetup { status: 404, .. }) => format!(
            "The branch does not exist in {} or the token lacks the workflow scope.",
            target.full_name()
        ),
        (BuildStage::SettingUpWorkflow, _) => {
            "The workflow file could not be written. The token needs the workflow scope.".to_string()
        }
        (BuildStage::TriggeringBuild, GitHubError::Dispatch { status: 422, .. }) => {
            "GitHub does not see the workflow_dispatch trigger yet. Wait a moment and start the build again."
                .to_string()
        }
        (BuildStage::TriggeringBuild, _) => format!(
            "The workflow could not be started. Check that Actions are enabled in {}.",
            target.actions_url()
        ),
        _ => GENERAL_CHECKS.to_string(),
    };

    format!("{} failed: {}\n\n{}", stage_name(stage), err, hint)
}

/// Message for a failed status probe
pub fn polling_failure(err: &GitHubError, target: &BuildTarget) -> String {
    format!(
        "Lost track of the build: {}\n\n\
         The build may still be running. Follow it at {} and start a new build once it has finished.",
        err,
        target.actions_url()
    )
}

/// Message for a run that completed without success
pub fn run_failure(run: &WorkflowRunStatus) -> String {
    format!(
        "{}\n\nOpen the run logs for details: {}",
        run.detailed_status(),
        run.html_url
    )
}

fn stage_name(stage: BuildStage) -> &'static str {
    match stage {
        BuildStage::CheckingToken => "Token check",
        BuildStage::FetchingRepos => "Repository listing",
        BuildStage::VerifyingAccess => "Access check",
        BuildStage::SettingUpWorkflow => "Workflow setup",
        BuildStage::TestingNotifier => "Notifier check",
        BuildStage::TriggeringBuild => "Workflow dispatch",
        BuildStage::PollingStatus => "Status polling",
        BuildStage::Idle | BuildStage::Completed | BuildStage::Failed => "Build",
    }
}
