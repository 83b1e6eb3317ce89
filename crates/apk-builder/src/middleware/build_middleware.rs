//! Build Middleware
//!
//! Runs the setup stages of a build attempt:
//! - Translating `Start` into a numbered `Started` while idle
//! - Spawning the GitHub work of each stage once its predecessor succeeded
//! - Requesting remote cancellation of the observed run on `CancelRun`
//!
//! Stage work never touches state; it reports `StageSucceeded` or
//! `StageFailed` tagged with the attempt it was started for.

use std::sync::Arc;

use crate::actions::{Action, ActivityAction, BuildAction, BuildRequest, StageOutcome};
use crate::dispatcher::Dispatcher;
use crate::domain_models::{guidance, BuildStage, BuildTarget};
use crate::middleware::Middleware;
use crate::services::Services;
use crate::state::AppState;
use crate::workflow_template::{self, WorkflowParams};
use apk_builder_config::AppConfig;
use gh_client::{DispatchRequest, GitHubClient, GitHubError, WorkflowFile};
use tg_notifier::NotifierCredentials;

/// Everything the stages of one attempt need
#[derive(Clone)]
struct BuildSession {
    attempt: u64,
    target: BuildTarget,
    notifier: NotifierCredentials,
    client: Arc<dyn GitHubClient>,
    config: Arc<AppConfig>,
}

/// Build middleware - drives the setup stages of an attempt
pub struct BuildMiddleware {
    services: Services,
    session: Option<BuildSession>,
}

impl BuildMiddleware {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            session: None,
        }
    }

    fn begin(&mut self, attempt: u64, request: &BuildRequest, dispatcher: &Dispatcher) {
        let client = match self.services.github.client(&request.credentials.ci_token) {
            Ok(client) => client,
            Err(err) => {
                log::error!("BuildMiddleware: failed to create GitHub client: {}", err);
                self.session = None;
                dispatcher.dispatch(Action::Build(BuildAction::StageFailed {
                    attempt,
                    stage: BuildStage::CheckingToken,
                    message: guidance::stage_failure(
                        BuildStage::CheckingToken,
                        &err,
                        &request.target,
                    ),
                }));
                return;
            }
        };

        log::info!(
            "BuildMiddleware: starting attempt {} for {}",
            attempt,
            request.target
        );
        let session = BuildSession {
            attempt,
            target: request.target.clone(),
            notifier: request.credentials.notifier.clone(),
            client,
            config: self.services.config.clone(),
        };
        spawn_stage(session.clone(), BuildStage::CheckingToken, dispatcher.clone());
        self.session = Some(session);
    }

    fn cancel_run(&self, state: &AppState, dispatcher: &Dispatcher) {
        if state.build.stage != BuildStage::PollingStatus {
            log::debug!("BuildMiddleware: nothing to cancel in {}", state.build.stage);
            return;
        }
        let (Some(session), Some(run)) = (&self.session, &state.build.last_observed_run) else {
            dispatcher.dispatch(Action::Activity(ActivityAction::warning(
                "No run to cancel yet; GitHub has not reported the run",
                "CancelRun",
            )));
            return;
        };

        let client = session.client.clone();
        let target = session.target.clone();
        let run_id = run.run_id;
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move {
            let action = match client.cancel_run(&target.owner, &target.repo, run_id).await {
                Ok(()) => {
                    log::info!("BuildMiddleware: cancellation of run {} requested", run_id);
                    ActivityAction::info(
                        format!("Cancellation of run {} requested", run_id),
                        "CancelRun",
                    )
                }
                Err(err) => {
                    log::error!("BuildMiddleware: cancelling run {} failed: {}", run_id, err);
                    ActivityAction::error(
                        format!("Could not cancel run {}: {}", run_id, err),
                        "CancelRun",
                    )
                }
            };
            dispatcher.dispatch(Action::Activity(action));
        });
    }
}

impl Middleware for BuildMiddleware {
    fn handle(&mut self, action: &Action, state: &AppState, dispatcher: &Dispatcher) -> bool {
        let Action::Build(build_action) = action else {
            return true;
        };

        match build_action {
            BuildAction::Start(request) => {
                if state.build.stage != BuildStage::Idle {
                    log::warn!(
                        "BuildMiddleware: ignoring start of {} while {}",
                        request.target,
                        state.build.stage
                    );
                    dispatcher.dispatch(Action::Activity(ActivityAction::warning(
                        "A build is already in progress",
                        "Start",
                    )));
                } else {
                    dispatcher.dispatch(Action::Build(BuildAction::Started {
                        attempt: state.build.attempt + 1,
                        request: request.clone(),
                    }));
                }
                false
            }

            BuildAction::Started { attempt, request } => {
                if state.build.stage != BuildStage::Idle {
                    return false;
                }
                self.begin(*attempt, request, dispatcher);
                true
            }

            BuildAction::StageSucceeded { attempt, outcome } => {
                let stage = outcome.stage();
                if !state.build.accepts(*attempt, stage) {
                    return true;
                }

                let feedback = match outcome {
                    StageOutcome::NotifierChecked { enabled: false, .. } => {
                        ActivityAction::warning(outcome.describe(), stage.to_string())
                    }
                    _ => ActivityAction::success(outcome.describe(), stage.to_string()),
                };
                dispatcher.dispatch(Action::Activity(feedback));

                // Polling is owned by the poller middleware
                if let Some(next) = stage.next().filter(|next| *next != BuildStage::PollingStatus) {
                    if let Some(session) = self.session.as_ref().filter(|s| s.attempt == *attempt) {
                        spawn_stage(session.clone(), next, dispatcher.clone());
                    }
                }
                true
            }

            BuildAction::StageFailed {
                attempt,
                stage,
                message,
            } => {
                if state.build.accepts(*attempt, *stage) {
                    log::error!("BuildMiddleware: {} failed: {}", stage, message);
                    dispatcher.dispatch(Action::Activity(ActivityAction::error(
                        format!("{} failed", stage),
                        stage.to_string(),
                    )));
                }
                true
            }

            BuildAction::CancelRun => {
                self.cancel_run(state, dispatcher);
                true
            }

            BuildAction::Acknowledge => {
                if state.build.stage.is_terminal() {
                    self.session = None;
                }
                true
            }
        }
    }
}

fn spawn_stage(session: BuildSession, stage: BuildStage, dispatcher: Dispatcher) {
    log::debug!(
        "BuildMiddleware: running {} for attempt {}",
        stage,
        session.attempt
    );
    tokio::spawn(async move {
        let attempt = session.attempt;
        let action = match run_stage(&session, stage).await {
            Ok(outcome) => BuildAction::StageSucceeded { attempt, outcome },
            Err(message) => BuildAction::StageFailed {
                attempt,
                stage,
                message,
            },
        };
        dispatcher.dispatch(Action::Build(action));
    });
}

/// The work of a single setup stage
///
/// Errors are the user-facing failure message.
async fn run_stage(session: &BuildSession, stage: BuildStage) -> Result<StageOutcome, String> {
    let target = &session.target;
    let config = &session.config;
    let client = &session.client;
    let fail = |err: GitHubError| guidance::stage_failure(stage, &err, target);

    match stage {
        BuildStage::CheckingToken => {
            let user = client.authenticated_user().await.map_err(fail)?;
            Ok(StageOutcome::TokenVerified { login: user.login })
        }

        BuildStage::FetchingRepos => {
            let repositories = client.list_repositories().await.map_err(fail)?;
            Ok(StageOutcome::ReposFetched {
                count: repositories.len(),
            })
        }

        BuildStage::VerifyingAccess => {
            if client
                .verify_access(&target.owner, &target.repo)
                .await
                .map_err(fail)?
            {
                Ok(StageOutcome::AccessVerified)
            } else {
                Err(guidance::access_denied(target))
            }
        }

        BuildStage::SettingUpWorkflow => {
            let content = workflow_template::render(&WorkflowParams {
                variant: &target.variant,
                branch: &config.branch,
                notifier: &session.notifier,
                secrets: config.notifier_secrets,
            })
            .map_err(|err| format!("Workflow setup failed: {:#}", err))?;

            let file = WorkflowFile {
                path: config.workflow_path.clone(),
                content,
                branch: config.branch.clone(),
                message: config.commit_message.clone(),
            };
            let write = client
                .upsert_workflow_file(&target.owner, &target.repo, &file)
                .await
                .map_err(fail)?;
            Ok(StageOutcome::WorkflowReady { kind: write.kind })
        }

        BuildStage::TestingNotifier => Ok(match session.notifier.validate() {
            Ok(()) => StageOutcome::NotifierChecked {
                enabled: true,
                reason: None,
            },
            Err(err) => StageOutcome::NotifierChecked {
                enabled: false,
                reason: Some(err.to_string()),
            },
        }),

        BuildStage::TriggeringBuild => {
            // The poller ignores this run; it must be known before dispatching
            let baseline_run_id = client
                .fetch_latest_run(&target.owner, &target.repo, &config.branch)
                .await
                .map_err(fail)?
                .map(|run| run.run_id);
            log::debug!("BuildMiddleware: baseline run {:?}", baseline_run_id);

            let request = DispatchRequest {
                workflow: config.workflow_file_name().to_string(),
                git_ref: config.branch.clone(),
                variant: target.variant.clone(),
            };
            client
                .dispatch_build(&target.owner, &target.repo, &request)
                .await
                .map_err(fail)?;
            Ok(StageOutcome::BuildDispatched { baseline_run_id })
        }

        BuildStage::Idle | BuildStage::PollingStatus | BuildStage::Completed | BuildStage::Failed => {
            Err(format!("{} has no setup work", stage))
        }
    }
}
