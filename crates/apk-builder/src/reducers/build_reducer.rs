//! Build Reducer
//!
//! Drives the build stage machine. Results from spawned work are applied
//! only when they belong to the current attempt and stage; anything else is
//! a leftover from an abandoned attempt or a stopped poller and is dropped.

use crate::actions::{BuildAction, NotificationAction, PollerAction, StageOutcome};
use crate::domain_models::{guidance, BuildStage};
use crate::state::BuildState;

/// Reduce build state for build lifecycle actions
pub fn reduce_build(mut state: BuildState, action: &BuildAction) -> BuildState {
    match action {
        BuildAction::Started { attempt, request } => {
            if state.stage != BuildStage::Idle {
                log::warn!("Ignoring start of attempt {} while {}", attempt, state.stage);
                return state;
            }
            state = BuildState {
                attempt: *attempt,
                target: Some(request.target.clone()),
                credentials: request.credentials.clone(),
                ..BuildState::default()
            };
            state.transition(BuildStage::CheckingToken);
        }
        BuildAction::StageSucceeded { attempt, outcome } => {
            let stage = outcome.stage();
            if !state.accepts(*attempt, stage) {
                log::debug!(
                    "Discarding {} result for attempt {} (current: attempt {}, {})",
                    stage,
                    attempt,
                    state.attempt,
                    state.stage
                );
                return state;
            }
            apply_outcome(&mut state, outcome);
            if let Some(next) = stage.next() {
                state.transition(next);
            }
            if let StageOutcome::BuildDispatched { .. } = outcome {
                state.poller_running = true;
            }
        }
        BuildAction::StageFailed {
            attempt,
            stage,
            message,
        } => {
            if !state.accepts(*attempt, *stage) {
                log::debug!("Discarding {} failure for attempt {}", stage, attempt);
                return state;
            }
            if state.transition(BuildStage::Failed) {
                state.failure = Some(message.clone());
            }
        }
        BuildAction::Acknowledge => {
            if state.stage.is_terminal() {
                state = BuildState {
                    attempt: state.attempt,
                    ..BuildState::default()
                };
                state.status_text = BuildStage::Idle.message().to_string();
            }
        }
        // Handled by middleware
        BuildAction::Start(_) | BuildAction::CancelRun => {}
    }
    state
}

fn apply_outcome(state: &mut BuildState, outcome: &StageOutcome) {
    match outcome {
        StageOutcome::TokenVerified { login } => state.login = Some(login.clone()),
        StageOutcome::ReposFetched { count } => state.repository_count = Some(*count),
        StageOutcome::AccessVerified => {}
        StageOutcome::WorkflowReady { kind } => state.workflow_write = Some(*kind),
        StageOutcome::NotifierChecked { enabled, .. } => state.notifications_enabled = *enabled,
        StageOutcome::BuildDispatched { baseline_run_id } => {
            state.baseline_run_id = *baseline_run_id
        }
    }
}

/// Reduce build state for poller actions
pub fn reduce_poller(mut state: BuildState, action: &PollerAction) -> BuildState {
    match action {
        PollerAction::Probed { attempt, result } => {
            if !state.accepts_probe(*attempt) {
                log::debug!("Discarding late probe result for attempt {}", attempt);
                return state;
            }
            match result {
                Ok(None) => {}
                Ok(Some(run)) if run.is_terminal() => {
                    state.poller_running = false;
                    state.notification_handle = None;
                    let next = if run.is_successful() {
                        BuildStage::Completed
                    } else {
                        BuildStage::Failed
                    };
                    if state.transition(next) {
                        state.status_text = run.detailed_status();
                        if next == BuildStage::Failed {
                            state.failure = Some(guidance::run_failure(run));
                        }
                    }
                    state.last_observed_run = Some(run.clone());
                }
                Ok(Some(run)) => {
                    state.status_text = run.summary();
                    state.last_observed_run = Some(run.clone());
                }
                Err(err) => {
                    state.poller_running = false;
                    state.notification_handle = None;
                    if state.transition(BuildStage::Failed) {
                        state.failure = Some(match &state.target {
                            Some(target) => guidance::polling_failure(err, target),
                            None => err.to_string(),
                        });
                    }
                }
            }
        }
        PollerAction::Stop => {
            if state.poller_running {
                log::info!("Status polling stopped in {}", state.stage);
            }
            state.poller_running = false;
        }
    }
    state
}

/// Reduce build state for notification actions
pub fn reduce_notification(mut state: BuildState, action: &NotificationAction) -> BuildState {
    match action {
        NotificationAction::Sent { attempt, handle } => {
            if state.accepts(*attempt, BuildStage::PollingStatus) {
                state.notification_handle = Some(*handle);
            }
        }
        NotificationAction::SendFailed { attempt, error } => {
            log::warn!("Notification for attempt {} failed: {}", attempt, error);
        }
        NotificationAction::TestConnection(_) | NotificationAction::ConnectionTested(_) => {}
    }
    state
}
