//! Poller Middleware
//!
//! Owns the status polling task of a build attempt. The task starts once
//! the workflow dispatch succeeded and probes the latest run: first after
//! the initial delay, then on every interval. It stops on its own after a
//! terminal run or a failed probe, and is cancelled on `Stop`, `Quit`, a new
//! attempt or when the middleware is dropped.

use std::sync::Arc;
use std::time::Duration;

use crate::actions::{Action, BuildAction, GlobalAction, PollerAction, StageOutcome};
use crate::dispatcher::Dispatcher;
use crate::domain_models::{BuildStage, BuildTarget};
use crate::middleware::Middleware;
use crate::services::Services;
use crate::state::AppState;
use gh_client::GitHubClient;
use tokio_util::sync::CancellationToken;

/// Inputs of one polling task
struct PollContext {
    attempt: u64,
    client: Arc<dyn GitHubClient>,
    target: BuildTarget,
    branch: String,
    baseline_run_id: Option<u64>,
    initial_delay: Duration,
    interval: Duration,
}

struct ActivePoll {
    attempt: u64,
    token: CancellationToken,
}

/// Poller middleware - runs at most one polling task at a time
pub struct PollerMiddleware {
    services: Services,
    active: Option<ActivePoll>,
}

impl PollerMiddleware {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            active: None,
        }
    }

    fn start(
        &mut self,
        attempt: u64,
        baseline_run_id: Option<u64>,
        state: &AppState,
        dispatcher: &Dispatcher,
    ) {
        self.stop();

        let Some(target) = state.build.target.clone() else {
            log::error!("PollerMiddleware: attempt {} has no build target", attempt);
            return;
        };
        let client = match self.services.github.client(&state.build.credentials.ci_token) {
            Ok(client) => client,
            Err(err) => {
                dispatcher.dispatch(Action::Poller(PollerAction::Probed {
                    attempt,
                    result: Err(err),
                }));
                return;
            }
        };

        let config = &self.services.config;
        let context = PollContext {
            attempt,
            client,
            target,
            branch: config.branch.clone(),
            baseline_run_id,
            initial_delay: config.poll_initial_delay(),
            interval: config.poll_interval(),
        };

        log::info!(
            "PollerMiddleware: polling {} every {:?} (first probe in {:?})",
            context.target.full_name(),
            context.interval,
            context.initial_delay
        );
        let token = CancellationToken::new();
        tokio::spawn(poll(context, token.clone(), dispatcher.clone()));
        self.active = Some(ActivePoll { attempt, token });
    }

    fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            log::debug!("PollerMiddleware: stopping poller of attempt {}", active.attempt);
            active.token.cancel();
        }
    }
}

impl Drop for PollerMiddleware {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Middleware for PollerMiddleware {
    fn handle(&mut self, action: &Action, state: &AppState, dispatcher: &Dispatcher) -> bool {
        match action {
            Action::Build(BuildAction::StageSucceeded {
                attempt,
                outcome: StageOutcome::BuildDispatched { baseline_run_id },
            }) => {
                if state.build.accepts(*attempt, BuildStage::TriggeringBuild) {
                    self.start(*attempt, *baseline_run_id, state, dispatcher);
                }
            }

            Action::Poller(PollerAction::Probed { attempt, result }) => {
                let finished = match result {
                    Ok(Some(run)) => run.is_terminal(),
                    Ok(None) => false,
                    Err(_) => true,
                };
                if finished && self.active.as_ref().is_some_and(|a| a.attempt == *attempt) {
                    self.active = None;
                }
            }

            Action::Poller(PollerAction::Stop)
            | Action::Global(GlobalAction::Quit)
            | Action::Build(BuildAction::Started { .. })
            | Action::Build(BuildAction::Acknowledge) => self.stop(),

            _ => {}
        }
        true
    }
}

/// The polling task
///
/// Sequential by construction: the next probe is only scheduled after the
/// previous one returned. Nothing is dispatched once `token` is cancelled.
async fn poll(context: PollContext, token: CancellationToken, dispatcher: Dispatcher) {
    let PollContext {
        attempt,
        client,
        target,
        branch,
        baseline_run_id,
        initial_delay,
        interval,
    } = context;

    tokio::select! {
        _ = token.cancelled() => return,
        _ = tokio::time::sleep(initial_delay) => {}
    }

    loop {
        let result = tokio::select! {
            _ = token.cancelled() => return,
            result = client.fetch_latest_run(&target.owner, &target.repo, &branch) => result,
        };
        if token.is_cancelled() {
            log::debug!("PollerMiddleware: dropping probe result of cancelled poller");
            return;
        }

        // The baseline run predates our dispatch
        let result = result.map(|run| run.filter(|run| Some(run.run_id) != baseline_run_id));
        let finished = match &result {
            Ok(Some(run)) => run.is_terminal(),
            Ok(None) => false,
            Err(err) => {
                log::error!("PollerMiddleware: status probe failed: {}", err);
                true
            }
        };

        dispatcher.dispatch(Action::Poller(PollerAction::Probed { attempt, result }));
        if finished {
            log::info!("PollerMiddleware: poller of attempt {} finished", attempt);
            return;
        }

        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }
    }
}
