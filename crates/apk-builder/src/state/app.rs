//! Application State

use super::{ActivityLog, BuildState, RepositoryListState};

/// Application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub running: bool,
    pub build: BuildState,
    pub activity: ActivityLog,
    pub repositories: RepositoryListState,
    /// Last notifier connection test; `None` while none has finished
    pub notifier_test: Option<Result<bool, String>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            running: true,
            build: BuildState::default(),
            activity: ActivityLog::default(),
            repositories: RepositoryListState::default(),
            notifier_test: None,
        }
    }
}
