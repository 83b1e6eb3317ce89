//! Interactive session
//!
//! Wires the store to its middleware and drives it from the console menu.

use anyhow::{Context, Result};

use crate::actions::{
    Action, BuildAction, BuildRequest, GlobalAction, NotificationAction, PollerAction,
    RepositoryAction,
};
use crate::console::{self, ConsoleView};
use crate::domain_models::Credentials;
use crate::middleware::{
    build_middleware::BuildMiddleware, logging::LoggingMiddleware,
    notification_middleware::NotificationMiddleware, poller_middleware::PollerMiddleware,
    repository_middleware::RepositoryMiddleware,
};
use crate::prompt::{self, MenuChoice};
use crate::services::Services;
use crate::state::AppState;
use crate::store::Store;

/// Create a store with the full middleware chain
pub fn build_store(services: Services) -> Store {
    let mut store = Store::new(AppState::default());

    // Add middleware in order (they execute in this order)
    store.add_middleware(Box::new(LoggingMiddleware::new()));
    store.add_middleware(Box::new(BuildMiddleware::new(services.clone())));
    store.add_middleware(Box::new(PollerMiddleware::new(services.clone())));
    store.add_middleware(Box::new(NotificationMiddleware::new(services.clone())));
    store.add_middleware(Box::new(RepositoryMiddleware::new(services)));

    store
}

/// Run the menu loop until the user quits
pub async fn run(services: Services) -> Result<()> {
    let mut store = build_store(services.clone());
    let mut credentials: Option<Credentials> = None;

    console::banner();
    while store.state().running {
        match prompt::main_menu()? {
            MenuChoice::StartBuild => {
                let request = prompt::build_request(&services.config, credentials.as_ref())?;
                credentials = Some(request.credentials.clone());
                drive_build(&mut store, request).await?;
            }
            MenuChoice::TestNotifier => {
                let notifier = match &credentials {
                    Some(credentials) => credentials.notifier.clone(),
                    None => prompt::notifier_credentials()?,
                };
                store.dispatch(Action::Notification(NotificationAction::TestConnection(
                    notifier,
                )));
                store.run_until(|state| state.notifier_test.is_some()).await;
                console::notifier_test(&store.state().notifier_test);
            }
            MenuChoice::ListRepositories => {
                let ci_token = match &credentials {
                    Some(credentials) => credentials.ci_token.clone(),
                    None => prompt::ci_token()?,
                };
                store.dispatch(Action::Repository(RepositoryAction::Load { ci_token }));
                store.run_until(|state| state.repositories.is_settled()).await;
                console::repositories(&store.state().repositories);
            }
            MenuChoice::Quit => store.dispatch(Action::Global(GlobalAction::Quit)),
        }
    }

    Ok(())
}

/// Follow one build attempt until it ends
///
/// The first Ctrl-C asks GitHub to cancel the run; the second stops
/// watching and ends the session.
async fn drive_build(store: &mut Store, request: BuildRequest) -> Result<()> {
    let mut view = ConsoleView::new(store.state());
    let mut interrupts = 0;

    store.dispatch(Action::Build(BuildAction::Start(request)));
    console::hint("Press Ctrl-C to cancel the run on GitHub.");

    loop {
        let build = &store.state().build;
        if build.stage.is_terminal() && !build.poller_running {
            break;
        }

        tokio::select! {
            action = store.next_action() => match action {
                Some(action) => store.dispatch(action),
                None => break,
            },
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                interrupts += 1;
                if interrupts == 1 {
                    console::hint("Cancelling the run. Press Ctrl-C again to stop watching.");
                    store.dispatch(Action::Build(BuildAction::CancelRun));
                } else {
                    store.dispatch(Action::Poller(PollerAction::Stop));
                    store.dispatch(Action::Global(GlobalAction::Quit));
                    view.render(store.state());
                    break;
                }
            }
        }
        view.render(store.state());
    }

    console::outcome(&store.state().build);
    store.dispatch(Action::Build(BuildAction::Acknowledge));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_models::BuildStage;
    use crate::testing::{
        build_request, drive_until, run, run_failed, services, settle, start, FakeGitHub,
        FakeNotifier,
    };
    use gh_client::{GitHubError, RunStatus};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::time::Duration;
    use tg_notifier::NotifierCredentials;

    fn store_with(github: &Arc<FakeGitHub>, notifier: &Arc<FakeNotifier>) -> Store {
        build_store(services(github.clone(), notifier.clone()))
    }

    fn terminal(state: &AppState) -> bool {
        state.build.stage.is_terminal()
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_build_sends_progress_then_final_message() {
        let github = Arc::new(FakeGitHub::new().with_runs(vec![
            Ok(None), // baseline before the dispatch
            Ok(None),
            Ok(None),
            Ok(None),
            Ok(Some(run(7, RunStatus::InProgress, None))),
            Ok(Some(run(7, RunStatus::InProgress, None))),
            Ok(Some(run(7, RunStatus::Completed, Some("success")))),
        ]));
        let notifier = Arc::new(FakeNotifier::default());
        let mut store = store_with(&github, &notifier);

        store.dispatch(start());
        drive_until(&mut store, terminal).await;
        settle(&mut store).await;

        let build = &store.state().build;
        assert_eq!(build.stage, BuildStage::Completed);
        assert_eq!(build.login.as_deref(), Some("octocat"));
        assert_eq!(build.repository_count, Some(2));
        assert!(!build.poller_running);
        assert_eq!(build.last_observed_run.as_ref().unwrap().run_id, 7);

        assert_eq!(github.calls("fetch_latest_run"), 7);
        assert_eq!(github.calls("upsert_workflow_file"), 1);
        let dispatches = github.dispatches();
        assert_eq!(dispatches.len(), 1);
        assert_eq!(dispatches[0].workflow, "android-build.yml");
        assert_eq!(dispatches[0].git_ref, "main");
        assert_eq!(dispatches[0].variant, "release");
        assert!(github.files()[0].content.contains("./gradlew assembleRelease"));

        let sends = notifier.sends();
        assert_eq!(sends.len(), 2);
        assert!(sends[0].contains("Build In Progress"));
        assert!(sends[1].contains("BUILD SUCCESS!"));

        let edits = notifier.edits();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].0, 1);
        assert!(edits[0].1.contains("BUILD STATUS UPDATE"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_run_sends_one_final_message_and_stops_polling() {
        let github = Arc::new(FakeGitHub::new().with_runs(vec![
            Ok(None),
            Ok(Some(run(8, RunStatus::InProgress, None))),
            Ok(Some(run_failed(8))),
        ]));
        let notifier = Arc::new(FakeNotifier::default());
        let mut store = store_with(&github, &notifier);

        store.dispatch(start());
        drive_until(&mut store, terminal).await;
        settle(&mut store).await;

        let build = &store.state().build;
        assert_eq!(build.stage, BuildStage::Failed);
        assert!(!build.poller_running);
        assert!(build
            .failure
            .as_ref()
            .unwrap()
            .contains("https://github.com/acme/app/actions/runs/8"));

        let sends = notifier.sends();
        assert_eq!(sends.len(), 2);
        assert!(sends[1].contains("BUILD FAILED!"));

        let probes = github.calls("fetch_latest_run");
        tokio::time::sleep(Duration::from_secs(120)).await;
        settle(&mut store).await;
        assert_eq!(github.calls("fetch_latest_run"), probes);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreadable_baseline_fails_before_dispatch() {
        let github = Arc::new(FakeGitHub::new().with_runs(vec![
            Err(GitHubError::Connectivity("connection reset".to_string())),
            Ok(Some(run_failed(3))),
            Ok(Some(run(4, RunStatus::InProgress, None))),
            Ok(Some(run(4, RunStatus::Completed, Some("success")))),
        ]));
        let notifier = Arc::new(FakeNotifier::default());
        let mut store = store_with(&github, &notifier);

        store.dispatch(start());
        drive_until(&mut store, terminal).await;
        settle(&mut store).await;

        let build = &store.state().build;
        assert_eq!(build.stage, BuildStage::Failed);
        assert!(build.last_observed_run.is_none());
        assert!(!build.poller_running);
        let failure = build.failure.as_ref().unwrap();
        assert!(failure.contains("connection reset"), "{}", failure);
        assert!(failure.contains("GitHub could not be reached"), "{}", failure);

        assert_eq!(github.calls("dispatch_build"), 0);
        assert_eq!(github.calls("fetch_latest_run"), 1);
        assert!(notifier.sends().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_access_denied_makes_no_workflow_or_dispatch_calls() {
        let github = Arc::new(FakeGitHub::new().deny_access());
        let notifier = Arc::new(FakeNotifier::default());
        let mut store = store_with(&github, &notifier);

        store.dispatch(start());
        drive_until(&mut store, terminal).await;
        settle(&mut store).await;

        let build = &store.state().build;
        assert_eq!(build.stage, BuildStage::Failed);
        assert!(build
            .failure
            .as_ref()
            .unwrap()
            .starts_with("Cannot access repository acme/app"));
        assert_eq!(github.calls("upsert_workflow_file"), 0);
        assert_eq!(github.calls("dispatch_build"), 0);
        assert_eq!(github.calls("fetch_latest_run"), 0);
        assert!(notifier.sends().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_dispatch_fails_without_polling() {
        let github = Arc::new(FakeGitHub::new().reject_dispatch(GitHubError::Dispatch {
            status: 422,
            body: "Unexpected inputs provided".to_string(),
        }));
        let notifier = Arc::new(FakeNotifier::default());
        let mut store = store_with(&github, &notifier);

        store.dispatch(start());
        drive_until(&mut store, terminal).await;
        tokio::time::sleep(Duration::from_secs(60)).await;
        settle(&mut store).await;

        let build = &store.state().build;
        assert_eq!(build.stage, BuildStage::Failed);
        assert!(build
            .failure
            .as_ref()
            .unwrap()
            .starts_with("Workflow dispatch failed"));
        // Only the baseline lookup
        assert_eq!(github.calls("fetch_latest_run"), 1);
        assert!(notifier.sends().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_baseline_run_is_not_mistaken_for_the_new_one() {
        let github = Arc::new(FakeGitHub::new().with_runs(vec![
            Ok(Some(run_failed(3))),
            Ok(Some(run_failed(3))),
            Ok(Some(run(4, RunStatus::Queued, None))),
            Ok(Some(run(4, RunStatus::Completed, Some("success")))),
        ]));
        let notifier = Arc::new(FakeNotifier::default());
        let mut store = store_with(&github, &notifier);

        store.dispatch(start());
        drive_until(&mut store, terminal).await;

        let build = &store.state().build;
        assert_eq!(build.stage, BuildStage::Completed);
        assert_eq!(build.baseline_run_id, Some(3));
        assert_eq!(build.last_observed_run.as_ref().unwrap().run_id, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_polling_without_changing_stage() {
        let github = Arc::new(FakeGitHub::new().with_runs(vec![
            Ok(None),
            Ok(Some(run(5, RunStatus::InProgress, None))),
        ]));
        let notifier = Arc::new(FakeNotifier::default());
        let mut store = store_with(&github, &notifier);

        store.dispatch(start());
        drive_until(&mut store, |state| state.build.last_observed_run.is_some()).await;
        store.dispatch(Action::Poller(PollerAction::Stop));

        let probes = github.calls("fetch_latest_run");
        tokio::time::sleep(Duration::from_secs(120)).await;
        settle(&mut store).await;

        assert_eq!(github.calls("fetch_latest_run"), probes);
        let build = &store.state().build;
        assert_eq!(build.stage, BuildStage::PollingStatus);
        assert!(!build.poller_running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_run_ends_in_cancelled_failure() {
        let github = Arc::new(FakeGitHub::new().with_runs(vec![
            Ok(None),
            Ok(Some(run(6, RunStatus::InProgress, None))),
        ]));
        let notifier = Arc::new(FakeNotifier::default());
        let mut store = store_with(&github, &notifier);

        store.dispatch(start());
        drive_until(&mut store, |state| state.build.last_observed_run.is_some()).await;
        store.dispatch(Action::Build(BuildAction::CancelRun));
        drive_until(&mut store, terminal).await;
        settle(&mut store).await;

        assert_eq!(github.calls("cancel_run"), 1);
        assert_eq!(store.state().build.stage, BuildStage::Failed);
        assert!(notifier.sends().last().unwrap().contains("BUILD CANCELLED"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_text_is_parked_while_first_send_is_in_flight() {
        let github = Arc::new(FakeGitHub::new().with_runs(vec![
            Ok(None),
            Ok(Some(run(9, RunStatus::Queued, None))),
            Ok(Some(run(9, RunStatus::InProgress, None))),
            Ok(Some(run(9, RunStatus::InProgress, None))),
            Ok(Some(run(9, RunStatus::Completed, Some("success")))),
        ]));
        let notifier = Arc::new(FakeNotifier::with_first_send_delay(Duration::from_secs(30)));
        let mut store = store_with(&github, &notifier);

        store.dispatch(start());
        drive_until(&mut store, terminal).await;
        settle(&mut store).await;

        let sends = notifier.sends();
        assert_eq!(sends.len(), 2);
        assert!(sends[1].contains("BUILD SUCCESS!"));

        // Only the newest parked text is applied
        let edits = notifier.edits();
        assert_eq!(edits.len(), 1);
        assert!(edits[0].1.contains("in_progress"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_notifier_credentials_disable_notifications() {
        let github = Arc::new(FakeGitHub::new().with_runs(vec![
            Ok(None),
            Ok(Some(run(2, RunStatus::Completed, Some("success")))),
        ]));
        let notifier = Arc::new(FakeNotifier::default());
        let mut store = store_with(&github, &notifier);

        store.dispatch(Action::Build(BuildAction::Start(build_request(
            NotifierCredentials::new("not-a-token", "42"),
        ))));
        drive_until(&mut store, terminal).await;
        settle(&mut store).await;

        let state = store.state();
        assert_eq!(state.build.stage, BuildStage::Completed);
        assert!(!state.build.notifications_enabled);
        assert!(state
            .activity
            .since(0)
            .any(|entry| entry.message.starts_with("Telegram notifications disabled")));
        assert!(notifier.sends().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_start_while_busy_is_rejected() {
        let github = Arc::new(FakeGitHub::new().deny_access());
        let notifier = Arc::new(FakeNotifier::default());
        let mut store = store_with(&github, &notifier);

        store.dispatch(start());
        store.dispatch(start());
        drive_until(&mut store, terminal).await;
        settle(&mut store).await;

        assert_eq!(store.state().build.attempt, 1);
        assert_eq!(github.calls("authenticated_user"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acknowledge_allows_a_new_attempt() {
        let github = Arc::new(FakeGitHub::new().deny_access());
        let notifier = Arc::new(FakeNotifier::default());
        let mut store = store_with(&github, &notifier);

        store.dispatch(start());
        drive_until(&mut store, terminal).await;
        store.dispatch(Action::Build(BuildAction::Acknowledge));
        assert_eq!(store.state().build.stage, BuildStage::Idle);

        store.dispatch(start());
        drive_until(&mut store, terminal).await;
        assert_eq!(store.state().build.attempt, 2);
        assert_eq!(github.calls("verify_access"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repository_listing_and_connection_test() {
        let github = Arc::new(FakeGitHub::new());
        let notifier = Arc::new(FakeNotifier::default());
        let mut store = store_with(&github, &notifier);

        store.dispatch(Action::Repository(RepositoryAction::Load {
            ci_token: "ghp_token".to_string(),
        }));
        drive_until(&mut store, |state| state.repositories.is_settled()).await;
        match &store.state().repositories {
            crate::state::RepositoryListState::Loaded(repositories) => {
                assert_eq!(repositories.len(), 2)
            }
            other => panic!("unexpected repository state: {:?}", other),
        }

        store.dispatch(Action::Notification(NotificationAction::TestConnection(
            NotifierCredentials::new("123:abc", "@channel"),
        )));
        drive_until(&mut store, |state| state.notifier_test.is_some()).await;
        assert_eq!(store.state().notifier_test, Some(Ok(true)));
    }
}
