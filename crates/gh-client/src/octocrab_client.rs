//! Octocrab-based GitHub API client
//!
//! Direct implementation of the `GitHubClient` trait using the octocrab library.
//! Requests go through octocrab's raw HTTP helpers so that every status code
//! and body reaches the error taxonomy unchanged.

use crate::client::GitHubClient;
use crate::error::{GitHubError, Result};
use crate::payload::{self, Payload};
use crate::types::{
    AuthenticatedUser, DispatchRequest, FileWrite, FileWriteKind, Repository, WorkflowFile,
};
use crate::workflow_run::WorkflowRunStatus;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, info};
use octocrab::Octocrab;
use serde_json::json;
use std::sync::Arc;

/// Direct GitHub API client using octocrab
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self { octocrab }
    }

    /// Get a reference to the underlying octocrab instance
    pub fn octocrab(&self) -> &Octocrab {
        &self.octocrab
    }

    async fn get(&self, route: &str) -> Result<(u16, String)> {
        let response = self.octocrab._get(route).await?;
        let status = response.status().as_u16();
        let body = self.octocrab.body_to_string(response).await?;
        Ok((status, body))
    }

    async fn post(&self, route: &str, body: &serde_json::Value) -> Result<(u16, String)> {
        let response = self.octocrab._post(route, Some(body)).await?;
        let status = response.status().as_u16();
        let body = self.octocrab.body_to_string(response).await?;
        Ok((status, body))
    }

    async fn put(&self, route: &str, body: &serde_json::Value) -> Result<(u16, String)> {
        let response = self.octocrab._put(route, Some(body)).await?;
        let status = response.status().as_u16();
        let body = self.octocrab.body_to_string(response).await?;
        Ok((status, body))
    }
}

fn access_denied(status: u16, body: &str) -> GitHubError {
    GitHubError::AccessDenied {
        status,
        message: payload::error_message(body),
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

#[async_trait]
impl GitHubClient for OctocrabClient {
    async fn authenticated_user(&self) -> Result<AuthenticatedUser> {
        debug!("Fetching authenticated user");

        let (status, body) = self.get("/user").await?;
        if status != 200 {
            return Err(access_denied(status, &body));
        }

        payload::decode(&body)
    }

    async fn list_repositories(&self) -> Result<Vec<Repository>> {
        debug!("Fetching repositories of the authenticated user");

        let (status, body) = self.get("/user/repos?per_page=100&sort=updated").await?;
        if status != 200 {
            return Err(access_denied(status, &body));
        }

        let repositories: Vec<Repository> = payload::decode(&body)?;
        debug!("Fetched {} repositories", repositories.len());
        Ok(repositories)
    }

    async fn verify_access(&self, owner: &str, repo: &str) -> Result<bool> {
        debug!("Verifying access to {}/{}", owner, repo);

        let route = format!("/repos/{}/{}", owner, repo);
        let (status, _) = self.get(&route).await?;
        if status != 200 {
            info!("Access check for {}/{} answered {}", owner, repo, status);
        }
        Ok(status == 200)
    }

    async fn fetch_file_sha(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Result<Option<String>> {
        let route = format!("/repos/{}/{}/contents/{}?ref={}", owner, repo, path, branch);
        let (status, body) = self.get(&route).await?;

        match status {
            200 => {
                let content = Payload::classify(&body)?.into_content()?;
                debug!("Found {} at revision {}", content.path, content.sha);
                Ok(Some(content.sha))
            }
            404 => Ok(None),
            _ => Err(access_denied(status, &body)),
        }
    }

    async fn upsert_workflow_file(
        &self,
        owner: &str,
        repo: &str,
        file: &WorkflowFile,
    ) -> Result<FileWrite> {
        let existing_sha = self
            .fetch_file_sha(owner, repo, &file.path, &file.branch)
            .await
            .map_err(|err| match err {
                GitHubError::AccessDenied { status, message } => GitHubError::WorkflowSetup {
                    status,
                    body: message,
                },
                other => other,
            })?;

        debug!(
            "Writing {} to {}/{}@{} (existing: {})",
            file.path,
            owner,
            repo,
            file.branch,
            existing_sha.is_some()
        );

        let mut request = json!({
            "message": file.message,
            "content": STANDARD.encode(file.content.as_bytes()),
            "branch": file.branch,
        });
        if let Some(sha) = &existing_sha {
            request["sha"] = json!(sha);
        }

        let route = format!("/repos/{}/{}/contents/{}", owner, repo, file.path);
        let (status, body) = self.put(&route, &request).await?;

        let kind = match status {
            200 => FileWriteKind::Updated,
            201 => FileWriteKind::Created,
            _ => return Err(GitHubError::WorkflowSetup { status, body }),
        };

        let sha = Payload::classify(&body)
            .and_then(Payload::into_file_commit)
            .ok()
            .and_then(|commit| commit.content)
            .map(|content| content.sha);

        info!("Workflow file {} {:?} in {}/{}", file.path, kind, owner, repo);
        Ok(FileWrite { kind, sha })
    }

    async fn dispatch_build(
        &self,
        owner: &str,
        repo: &str,
        request: &DispatchRequest,
    ) -> Result<()> {
        debug!(
            "Dispatching {} on {}/{}@{} ({})",
            request.workflow, owner, repo, request.git_ref, request.variant
        );

        let route = format!(
            "/repos/{}/{}/actions/workflows/{}/dispatches",
            owner, repo, request.workflow
        );
        let body = json!({
            "ref": request.git_ref,
            "inputs": { "build_type": request.variant },
        });

        let (status, body) = self.post(&route, &body).await?;
        if !is_success(status) {
            return Err(GitHubError::Dispatch { status, body });
        }

        info!("Dispatched {} on {}/{}", request.workflow, owner, repo);
        Ok(())
    }

    async fn fetch_latest_run(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Option<WorkflowRunStatus>> {
        let route = format!(
            "/repos/{}/{}/actions/runs?branch={}&event=workflow_dispatch&per_page=1",
            owner, repo, branch
        );
        let (status, body) = self.get(&route).await?;
        if status != 200 {
            return Err(access_denied(status, &body));
        }

        let list = Payload::classify(&body)?.into_run_list()?;
        debug!(
            "Latest runs for {}/{}@{}: {} in total",
            owner, repo, branch, list.total_count
        );

        list.workflow_runs
            .into_iter()
            .next()
            .map(WorkflowRunStatus::try_from)
            .transpose()
    }

    async fn cancel_run(&self, owner: &str, repo: &str, run_id: u64) -> Result<()> {
        debug!("Cancelling run {} in {}/{}", run_id, owner, repo);

        let route = format!("/repos/{}/{}/actions/runs/{}/cancel", owner, repo, run_id);
        let (status, body) = self.post(&route, &json!({})).await?;
        if !is_success(status) {
            return Err(GitHubError::CancelRejected { status, body });
        }

        info!("Cancellation of run {} accepted ({})", run_id, status);
        Ok(())
    }
}
