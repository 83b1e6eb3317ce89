//! Notification Middleware
//!
//! Keeps the chat informed about a build attempt:
//! - One progress message, sent after the dispatch and edited as the run moves on
//! - One final message when the run ends or polling fails
//! - Connection tests on request
//!
//! Sends and edits are spawned and may complete in any order. While the
//! first send is in flight, newer progress text is parked and applied as an
//! edit once the message handle arrives. Failures are logged and never
//! change the build stage.

use std::sync::Arc;

use crate::actions::{
    Action, ActivityAction, BuildAction, NotificationAction, PollerAction, StageOutcome,
};
use crate::dispatcher::Dispatcher;
use crate::domain_models::{BuildStage, BuildTarget};
use crate::middleware::Middleware;
use crate::services::Services;
use crate::state::AppState;
use gh_client::workflow_run::escape_html;
use gh_client::GitHubError;
use tg_notifier::{NotificationHandle, NotifierClient, NotifierCredentials};

/// Progress message bookkeeping for one attempt
#[derive(Debug, Default)]
struct Tracker {
    attempt: u64,
    send_in_flight: bool,
    pending_text: Option<String>,
    last_text: Option<String>,
    finalized: bool,
}

/// Notification middleware - mirrors build progress into the chat
pub struct NotificationMiddleware {
    services: Services,
    tracker: Option<Tracker>,
}

impl NotificationMiddleware {
    pub fn new(services: Services) -> Self {
        Self {
            services,
            tracker: None,
        }
    }
}

impl Middleware for NotificationMiddleware {
    fn handle(&mut self, action: &Action, state: &AppState, dispatcher: &Dispatcher) -> bool {
        let notifier = self.services.notifier.clone();
        let credentials = state.build.credentials.notifier.clone();

        match action {
            Action::Build(BuildAction::StageSucceeded {
                attempt,
                outcome: StageOutcome::BuildDispatched { .. },
            }) => {
                if !state.build.accepts(*attempt, BuildStage::TriggeringBuild) {
                    return true;
                }
                if !state.build.notifications_enabled {
                    log::info!(
                        "NotificationMiddleware: notifications disabled for attempt {}",
                        attempt
                    );
                    self.tracker = None;
                    return true;
                }
                let Some(target) = &state.build.target else {
                    return true;
                };

                let text = dispatched_text(target);
                self.tracker = Some(Tracker {
                    attempt: *attempt,
                    send_in_flight: true,
                    last_text: Some(text.clone()),
                    ..Tracker::default()
                });
                spawn_progress_send(notifier, credentials, *attempt, text, dispatcher.clone());
            }

            Action::Poller(PollerAction::Probed { attempt, result }) => {
                if !state.build.accepts_probe(*attempt) {
                    return true;
                }
                let Some(tracker) = self
                    .tracker
                    .as_mut()
                    .filter(|t| t.attempt == *attempt && !t.finalized)
                else {
                    return true;
                };
                let Some(target) = &state.build.target else {
                    return true;
                };
                let repo = target.full_name();

                match result {
                    Ok(None) => {}
                    Ok(Some(run)) if run.is_terminal() => {
                        tracker.finalized = true;
                        tracker.pending_text = None;
                        spawn_final_send(notifier, credentials, run.notification_text(&repo));
                    }
                    Ok(Some(run)) => {
                        let text = run.notification_text(&repo);
                        if tracker.last_text.as_deref() == Some(text.as_str()) {
                            return true;
                        }
                        tracker.last_text = Some(text.clone());

                        if let Some(handle) = state.build.notification_handle {
                            spawn_edit(notifier, credentials, handle, text);
                        } else if tracker.send_in_flight {
                            tracker.pending_text = Some(text);
                        } else {
                            tracker.send_in_flight = true;
                            spawn_progress_send(
                                notifier,
                                credentials,
                                *attempt,
                                text,
                                dispatcher.clone(),
                            );
                        }
                    }
                    Err(err) => {
                        tracker.finalized = true;
                        tracker.pending_text = None;
                        spawn_final_send(notifier, credentials, polling_failed_text(target, err));
                    }
                }
            }

            Action::Notification(NotificationAction::Sent { attempt, handle }) => {
                if let Some(tracker) = self.tracker.as_mut().filter(|t| t.attempt == *attempt) {
                    tracker.send_in_flight = false;
                    if let Some(text) = tracker.pending_text.take().filter(|_| !tracker.finalized) {
                        spawn_edit(notifier, credentials, *handle, text);
                    }
                }
            }

            Action::Notification(NotificationAction::SendFailed { attempt, error }) => {
                if let Some(tracker) = self.tracker.as_mut().filter(|t| t.attempt == *attempt) {
                    tracker.send_in_flight = false;
                    if let Some(text) = tracker.pending_text.take().filter(|_| !tracker.finalized) {
                        tracker.send_in_flight = true;
                        spawn_progress_send(notifier, credentials, *attempt, text, dispatcher.clone());
                    }
                }
                dispatcher.dispatch(Action::Activity(ActivityAction::warning(
                    format!("Telegram notification failed: {}", error),
                    "Notification",
                )));
            }

            Action::Notification(NotificationAction::TestConnection(credentials)) => {
                let credentials = credentials.clone();
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move {
                    let result = notifier
                        .test_connection(&credentials)
                        .await
                        .map_err(|err| err.to_string());
                    dispatcher.dispatch(Action::Notification(NotificationAction::ConnectionTested(
                        result,
                    )));
                });
            }

            Action::Build(BuildAction::Started { .. }) | Action::Build(BuildAction::Acknowledge) => {
                self.tracker = None;
            }

            _ => {}
        }
        true
    }
}

fn dispatched_text(target: &BuildTarget) -> String {
    format!(
        "<b>{}</b>\n📦 Repository: <code>{}</code>\n🔧 Variant: <code>{}</code>\n\nWorkflow dispatched, waiting for GitHub to start the run...",
        BuildStage::PollingStatus.notification_status().label(),
        escape_html(&target.full_name()),
        escape_html(&target.variant)
    )
}

fn polling_failed_text(target: &BuildTarget, err: &GitHubError) -> String {
    format!(
        "<b>{}</b>\n📦 Repository: <code>{}</code>\n\nLost track of the build: {}\n\n<a href=\"{}\">🔗 Open GitHub Actions</a>",
        BuildStage::Failed.notification_status().label(),
        escape_html(&target.full_name()),
        escape_html(&err.to_string()),
        escape_html(&target.actions_url())
    )
}

/// Send the progress message and report its handle
fn spawn_progress_send(
    notifier: Arc<dyn NotifierClient>,
    credentials: NotifierCredentials,
    attempt: u64,
    text: String,
    dispatcher: Dispatcher,
) {
    tokio::spawn(async move {
        let action = match notifier.send(&credentials, &text).await {
            Ok(handle) => NotificationAction::Sent { attempt, handle },
            Err(err) => {
                log::warn!("NotificationMiddleware: progress message failed: {}", err);
                NotificationAction::SendFailed {
                    attempt,
                    error: err.to_string(),
                }
            }
        };
        dispatcher.dispatch(Action::Notification(action));
    });
}

fn spawn_edit(
    notifier: Arc<dyn NotifierClient>,
    credentials: NotifierCredentials,
    handle: NotificationHandle,
    text: String,
) {
    tokio::spawn(async move {
        if let Err(err) = notifier.edit(&credentials, &handle, &text).await {
            log::warn!(
                "NotificationMiddleware: editing message {} failed: {}",
                handle.message_id,
                err
            );
        }
    });
}

fn spawn_final_send(
    notifier: Arc<dyn NotifierClient>,
    credentials: NotifierCredentials,
    text: String,
) {
    tokio::spawn(async move {
        match notifier.send(&credentials, &text).await {
            Ok(handle) => log::info!(
                "NotificationMiddleware: final message {} sent",
                handle.message_id
            ),
            Err(err) => log::warn!("NotificationMiddleware: final message failed: {}", err),
        }
    });
}
