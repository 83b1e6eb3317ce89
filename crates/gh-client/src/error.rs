//! Error taxonomy for GitHub API operations

use thiserror::Error;

/// Errors raised by [`crate::GitHubClient`] implementations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GitHubError {
    /// Transport or network failure (no HTTP response)
    #[error("could not reach GitHub: {0}")]
    Connectivity(String),

    /// Non-success status on a read (token, repository or run lookup)
    #[error("GitHub denied the request ({status}): {message}")]
    AccessDenied { status: u16, message: String },

    /// The workflow file write was rejected
    #[error("GitHub rejected the workflow file ({status}): {body}")]
    WorkflowSetup { status: u16, body: String },

    /// The workflow dispatch was rejected
    #[error("GitHub rejected the workflow dispatch ({status}): {body}")]
    Dispatch { status: u16, body: String },

    /// The run cancellation was rejected
    #[error("GitHub rejected the run cancellation ({status}): {body}")]
    CancelRejected { status: u16, body: String },

    /// A response had an unexpected shape
    #[error("unexpected GitHub response: {0}")]
    Parse(String),
}

impl GitHubError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            GitHubError::AccessDenied { status, .. }
            | GitHubError::WorkflowSetup { status, .. }
            | GitHubError::Dispatch { status, .. }
            | GitHubError::CancelRejected { status, .. } => Some(*status),
            GitHubError::Connectivity(_) | GitHubError::Parse(_) => None,
        }
    }

    /// Whether the error is a transport failure rather than a GitHub response
    pub fn is_connectivity(&self) -> bool {
        matches!(self, GitHubError::Connectivity(_))
    }
}

impl From<octocrab::Error> for GitHubError {
    fn from(err: octocrab::Error) -> Self {
        GitHubError::Connectivity(err.to_string())
    }
}

/// Result alias for GitHub operations
pub type Result<T> = std::result::Result<T, GitHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accessor() {
        let err = GitHubError::Dispatch {
            status: 422,
            body: "Unexpected inputs provided".to_string(),
        };
        assert_eq!(err.status(), Some(422));
        assert!(!err.is_connectivity());

        let err = GitHubError::Connectivity("connection refused".to_string());
        assert_eq!(err.status(), None);
        assert!(err.is_connectivity());
    }

    #[test]
    fn test_display_includes_body() {
        let err = GitHubError::WorkflowSetup {
            status: 409,
            body: "sha does not match".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "GitHub rejected the workflow file (409): sha does not match"
        );
    }
}
