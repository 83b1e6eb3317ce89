//! Poller Actions

use gh_client::{GitHubError, WorkflowRunStatus};

/// Actions for run status polling
#[derive(Debug, Clone)]
pub enum PollerAction {
    /// Result of one status probe; `Ok(None)` means no new run is visible yet
    Probed {
        attempt: u64,
        result: Result<Option<WorkflowRunStatus>, GitHubError>,
    },
    /// Stop polling without changing the build stage
    Stop,
}
