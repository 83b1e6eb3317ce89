//! Build attempt state

use crate::domain_models::{BuildStage, BuildTarget, Credentials};
use gh_client::{FileWriteKind, WorkflowRunStatus};
use tg_notifier::NotificationHandle;

/// State of the current (or last) build attempt
#[derive(Debug, Clone, Default)]
pub struct BuildState {
    /// Incremented for every started attempt
    pub attempt: u64,
    pub stage: BuildStage,
    pub target: Option<BuildTarget>,
    pub credentials: Credentials,
    /// Progress line shown to the user
    pub status_text: String,
    /// Failure message with next steps, set when `stage` is `Failed`
    pub failure: Option<String>,
    pub login: Option<String>,
    pub repository_count: Option<usize>,
    pub workflow_write: Option<FileWriteKind>,
    pub notifications_enabled: bool,
    /// Progress notification that later updates edit
    pub notification_handle: Option<NotificationHandle>,
    /// Newest run that existed before the dispatch; never reported as ours
    pub baseline_run_id: Option<u64>,
    pub last_observed_run: Option<WorkflowRunStatus>,
    pub poller_running: bool,
}

impl BuildState {
    /// Move to `next` if the transition is legal
    ///
    /// Returns `false` and leaves the stage untouched otherwise.
    pub fn transition(&mut self, next: BuildStage) -> bool {
        if !self.stage.can_transition_to(next) {
            log::warn!("Ignoring illegal stage transition {} -> {}", self.stage, next);
            return false;
        }
        log::debug!("Build stage {} -> {}", self.stage, next);
        self.stage = next;
        self.status_text = next.message().to_string();
        true
    }

    /// Whether a stage result belongs to the running attempt and stage
    pub fn accepts(&self, attempt: u64, stage: BuildStage) -> bool {
        self.attempt == attempt && self.stage == stage
    }

    /// Whether a probe result may still change this attempt
    pub fn accepts_probe(&self, attempt: u64) -> bool {
        self.poller_running && self.accepts(attempt, BuildStage::PollingStatus)
    }
}
