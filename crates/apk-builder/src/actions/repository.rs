//! Repository Actions

use gh_client::Repository;
use std::fmt;

/// Actions for listing the repositories a token can see
#[derive(Clone)]
pub enum RepositoryAction {
    /// Load the repository list for a token
    Load { ci_token: String },
    Loaded(Vec<Repository>),
    LoadFailed(String),
}

impl fmt::Debug for RepositoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryAction::Load { .. } => f
                .debug_struct("Load")
                .field("ci_token", &"[REDACTED]")
                .finish(),
            RepositoryAction::Loaded(repositories) => f
                .debug_tuple("Loaded")
                .field(&format!("{} repositories", repositories.len()))
                .finish(),
            RepositoryAction::LoadFailed(message) => {
                f.debug_tuple("LoadFailed").field(message).finish()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let action = RepositoryAction::Load {
            ci_token: "ghp_topsecret".to_string(),
        };
        assert!(!format!("{:?}", action).contains("ghp_topsecret"));
    }
}
