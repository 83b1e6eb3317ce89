use crate::actions::RepositoryAction;
use crate::state::RepositoryListState;

/// Reduce repository list state
pub fn reduce_repositories(
    state: RepositoryListState,
    action: &RepositoryAction,
) -> RepositoryListState {
    match action {
        RepositoryAction::Load { .. } => RepositoryListState::Loading,
        RepositoryAction::Loaded(repositories) => {
            RepositoryListState::Loaded(repositories.clone())
        }
        RepositoryAction::LoadFailed(message) => {
            if state != RepositoryListState::Loading {
                log::debug!("Repository load failed outside of a load: {}", message);
            }
            RepositoryListState::Failed(message.clone())
        }
    }
}
