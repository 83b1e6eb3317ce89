use crate::actions::{Action, GlobalAction, NotificationAction};
use crate::reducers::{activity_reducer, build_reducer, repository_reducer};
use crate::state::AppState;

/// Root reducer; routes each action to the slice it concerns
pub fn reduce(mut state: AppState, action: &Action) -> AppState {
    match action {
        Action::Global(GlobalAction::Quit) => {
            state.running = false;
            state.build.poller_running = false;
        }
        Action::Build(action) => {
            state.build = build_reducer::reduce_build(state.build, action);
        }
        Action::Poller(action) => {
            state.build = build_reducer::reduce_poller(state.build, action);
        }
        Action::Notification(NotificationAction::TestConnection(_)) => {
            state.notifier_test = None;
        }
        Action::Notification(NotificationAction::ConnectionTested(result)) => {
            state.notifier_test = Some(result.clone());
        }
        Action::Notification(action) => {
            state.build = build_reducer::reduce_notification(state.build, action);
        }
        Action::Repository(action) => {
            state.repositories = repository_reducer::reduce_repositories(state.repositories, action);
        }
        Action::Activity(action) => {
            state.activity = activity_reducer::reduce_activity(state.activity, action);
        }
    }
    state
}
