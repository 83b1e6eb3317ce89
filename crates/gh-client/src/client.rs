//! GitHub client trait
//!
//! This module defines the core `GitHubClient` trait that all client
//! implementations must satisfy. The application only ever talks to
//! GitHub through this trait, which keeps the build pipeline testable
//! with in-memory fakes.

use crate::error::Result;
use crate::types::{AuthenticatedUser, DispatchRequest, FileWrite, Repository, WorkflowFile};
use crate::workflow_run::WorkflowRunStatus;
use async_trait::async_trait;

/// GitHub API client trait
///
/// Covers everything needed to set up and run a GitHub Actions build:
/// token checks, repository access, workflow file management, dispatch
/// and run status polling.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks and threads.
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::GitHubClient;
///
/// async fn is_running(client: &dyn GitHubClient) -> gh_client::Result<bool> {
///     let run = client.fetch_latest_run("acme", "app", "main").await?;
///     Ok(run.is_some_and(|run| run.is_active()))
/// }
/// ```
#[async_trait]
pub trait GitHubClient: Send + Sync {
    /// Fetch the user the token authenticates as
    ///
    /// # Returns
    ///
    /// The authenticated user, or `AccessDenied` if the token is rejected.
    async fn authenticated_user(&self) -> Result<AuthenticatedUser>;

    /// List repositories the token can see (first page of 100)
    async fn list_repositories(&self) -> Result<Vec<Repository>>;

    /// Check whether the token can read a repository
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner (user or organization)
    /// * `repo` - Repository name
    ///
    /// # Returns
    ///
    /// `true` on 200, `false` on any other status. Transport failures
    /// are reported as `Connectivity` errors.
    async fn verify_access(&self, owner: &str, repo: &str) -> Result<bool>;

    /// Fetch the blob SHA of a file on a branch
    ///
    /// # Returns
    ///
    /// `None` if the file does not exist yet.
    async fn fetch_file_sha(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Result<Option<String>>;

    /// Create the workflow file, or replace it if it already exists
    ///
    /// Reads the current revision first so that repeated calls with the
    /// same content succeed.
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `file` - Path, content, branch and commit message
    ///
    /// # Returns
    ///
    /// Whether the file was created or updated, or `WorkflowSetup` with
    /// the HTTP status and body when GitHub rejects the write.
    async fn upsert_workflow_file(
        &self,
        owner: &str,
        repo: &str,
        file: &WorkflowFile,
    ) -> Result<FileWrite>;

    /// Trigger a `workflow_dispatch` run
    ///
    /// The dispatch is asynchronous on GitHub's side: success only means the
    /// request was accepted, the run shows up later.
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `request` - Workflow file, ref and build variant
    async fn dispatch_build(&self, owner: &str, repo: &str, request: &DispatchRequest)
        -> Result<()>;

    /// Fetch the most recent `workflow_dispatch` run on a branch
    ///
    /// # Returns
    ///
    /// `None` when no run exists yet, which is a normal outcome right
    /// after a dispatch.
    async fn fetch_latest_run(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Option<WorkflowRunStatus>>;

    /// Request cancellation of a workflow run
    ///
    /// GitHub answers 202 and cancels asynchronously; the run later reports
    /// a `cancelled` conclusion.
    async fn cancel_run(&self, owner: &str, repo: &str, run_id: u64) -> Result<()>;
}
