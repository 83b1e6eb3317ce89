//! Repository list state

use gh_client::Repository;

/// Repositories visible to the entered token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RepositoryListState {
    #[default]
    NotLoaded,
    Loading,
    Loaded(Vec<Repository>),
    Failed(String),
}

impl RepositoryListState {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Loaded(_) | Self::Failed(_))
    }
}
