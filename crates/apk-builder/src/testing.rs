//! Test doubles for the GitHub and Telegram clients
//!
//! The fakes record every call and answer from scripted responses, so whole
//! build attempts can run through the store with tokio's paused clock.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use apk_builder_config::AppConfig;
use async_trait::async_trait;
use gh_client::{
    AuthenticatedUser, DispatchRequest, FileWrite, FileWriteKind, GitHubClient,
    GitHubClientFactory, GitHubError, Repository, RunConclusion, RunStatus, WorkflowFile,
    WorkflowRunStatus,
};
use tg_notifier::{NotificationHandle, NotifierClient, NotifierCredentials};

use crate::actions::{Action, BuildAction, BuildRequest};
use crate::domain_models::{BuildTarget, Credentials};
use crate::services::Services;
use crate::state::AppState;
use crate::store::Store;

type RunResult = gh_client::Result<Option<WorkflowRunStatus>>;

pub fn run(run_id: u64, status: RunStatus, conclusion: Option<&str>) -> WorkflowRunStatus {
    WorkflowRunStatus {
        run_id,
        run_number: run_id,
        workflow_name: Some("Android Build".to_string()),
        status,
        conclusion: conclusion.map(RunConclusion::from_api),
        html_url: format!("https://github.com/acme/app/actions/runs/{}", run_id),
        branch: "main".to_string(),
        event: Some("workflow_dispatch".to_string()),
        created_at: "2024-03-05T14:30:00Z".to_string(),
        updated_at: "2024-03-05T14:34:12Z".to_string(),
    }
}

pub fn run_failed(run_id: u64) -> WorkflowRunStatus {
    run(run_id, RunStatus::Completed, Some("failure"))
}

/// Scripted GitHub client
pub struct FakeGitHub {
    access: bool,
    dispatch_error: Option<GitHubError>,
    /// Answers to `fetch_latest_run`; the last one repeats
    runs: Mutex<VecDeque<RunResult>>,
    calls: Mutex<Vec<&'static str>>,
    dispatches: Mutex<Vec<DispatchRequest>>,
    files: Mutex<Vec<WorkflowFile>>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self {
            access: true,
            dispatch_error: None,
            runs: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            dispatches: Mutex::new(Vec::new()),
            files: Mutex::new(Vec::new()),
        }
    }

    pub fn deny_access(mut self) -> Self {
        self.access = false;
        self
    }

    pub fn reject_dispatch(mut self, error: GitHubError) -> Self {
        self.dispatch_error = Some(error);
        self
    }

    pub fn with_runs(self, runs: Vec<RunResult>) -> Self {
        *self.runs.lock().unwrap() = runs.into();
        self
    }

    pub fn calls(&self, name: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call == name)
            .count()
    }

    pub fn dispatches(&self) -> Vec<DispatchRequest> {
        self.dispatches.lock().unwrap().clone()
    }

    pub fn files(&self) -> Vec<WorkflowFile> {
        self.files.lock().unwrap().clone()
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

#[async_trait]
impl GitHubClient for FakeGitHub {
    async fn authenticated_user(&self) -> gh_client::Result<AuthenticatedUser> {
        self.record("authenticated_user");
        Ok(AuthenticatedUser {
            login: "octocat".to_string(),
        })
    }

    async fn list_repositories(&self) -> gh_client::Result<Vec<Repository>> {
        self.record("list_repositories");
        Ok(vec![
            Repository {
                full_name: "acme/app".to_string(),
                private: true,
                default_branch: Some("main".to_string()),
            },
            Repository {
                full_name: "acme/site".to_string(),
                private: false,
                default_branch: None,
            },
        ])
    }

    async fn verify_access(&self, _owner: &str, _repo: &str) -> gh_client::Result<bool> {
        self.record("verify_access");
        Ok(self.access)
    }

    async fn fetch_file_sha(
        &self,
        _owner: &str,
        _repo: &str,
        _path: &str,
        _branch: &str,
    ) -> gh_client::Result<Option<String>> {
        self.record("fetch_file_sha");
        Ok(None)
    }

    async fn upsert_workflow_file(
        &self,
        _owner: &str,
        _repo: &str,
        file: &WorkflowFile,
    ) -> gh_client::Result<FileWrite> {
        self.record("upsert_workflow_file");
        self.files.lock().unwrap().push(file.clone());
        Ok(FileWrite {
            kind: FileWriteKind::Created,
            sha: Some("abc123".to_string()),
        })
    }

    async fn dispatch_build(
        &self,
        _owner: &str,
        _repo: &str,
        request: &DispatchRequest,
    ) -> gh_client::Result<()> {
        self.record("dispatch_build");
        self.dispatches.lock().unwrap().push(request.clone());
        match &self.dispatch_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn fetch_latest_run(
        &self,
        _owner: &str,
        _repo: &str,
        _branch: &str,
    ) -> gh_client::Result<Option<WorkflowRunStatus>> {
        self.record("fetch_latest_run");
        let mut runs = self.runs.lock().unwrap();
        if runs.len() > 1 {
            runs.pop_front().unwrap()
        } else {
            runs.front().cloned().unwrap_or(Ok(None))
        }
    }

    async fn cancel_run(&self, _owner: &str, _repo: &str, run_id: u64) -> gh_client::Result<()> {
        self.record("cancel_run");
        *self.runs.lock().unwrap() =
            VecDeque::from([Ok(Some(run(run_id, RunStatus::Completed, Some("cancelled"))))]);
        Ok(())
    }
}

/// Hands out the same fake for every token
pub struct FakeFactory {
    client: Arc<FakeGitHub>,
}

impl GitHubClientFactory for FakeFactory {
    fn client(&self, _token: &str) -> gh_client::Result<Arc<dyn GitHubClient>> {
        let client: Arc<dyn GitHubClient> = self.client.clone();
        Ok(client)
    }
}

/// Recording chat notifier
#[derive(Default)]
pub struct FakeNotifier {
    /// Delay of the very first send, to keep it in flight for a while
    first_send_delay: Option<Duration>,
    sends: Mutex<Vec<String>>,
    edits: Mutex<Vec<(i64, String)>>,
}

impl FakeNotifier {
    pub fn with_first_send_delay(delay: Duration) -> Self {
        Self {
            first_send_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn sends(&self) -> Vec<String> {
        self.sends.lock().unwrap().clone()
    }

    pub fn edits(&self) -> Vec<(i64, String)> {
        self.edits.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotifierClient for FakeNotifier {
    async fn send(
        &self,
        _credentials: &NotifierCredentials,
        text: &str,
    ) -> tg_notifier::Result<NotificationHandle> {
        let first = self.sends.lock().unwrap().is_empty();
        if let Some(delay) = self.first_send_delay.filter(|_| first) {
            tokio::time::sleep(delay).await;
        }
        let mut sends = self.sends.lock().unwrap();
        sends.push(text.to_string());
        Ok(NotificationHandle {
            message_id: sends.len() as i64,
        })
    }

    async fn edit(
        &self,
        _credentials: &NotifierCredentials,
        handle: &NotificationHandle,
        text: &str,
    ) -> tg_notifier::Result<()> {
        self.edits
            .lock()
            .unwrap()
            .push((handle.message_id, text.to_string()));
        Ok(())
    }

    async fn test_connection(&self, credentials: &NotifierCredentials) -> tg_notifier::Result<bool> {
        Ok(credentials.is_valid())
    }
}

pub fn services(github: Arc<FakeGitHub>, notifier: Arc<FakeNotifier>) -> Services {
    Services {
        github: Arc::new(FakeFactory { client: github }),
        notifier,
        config: Arc::new(AppConfig::default()),
    }
}

pub fn build_request(notifier: NotifierCredentials) -> BuildRequest {
    BuildRequest {
        target: BuildTarget::new("acme", "app", "release").unwrap(),
        credentials: Credentials::new("ghp_token", notifier),
    }
}

pub fn start() -> Action {
    Action::Build(BuildAction::Start(build_request(NotifierCredentials::new(
        "123456:bot-secret",
        "-100200",
    ))))
}

/// Process actions until `done` holds; fails the test after an hour of virtual time
pub async fn drive_until(store: &mut Store, done: impl Fn(&AppState) -> bool) {
    tokio::time::timeout(Duration::from_secs(3600), store.run_until(done))
        .await
        .expect("scenario did not reach the expected state");
}

/// Process whatever is still queued or about to be queued
pub async fn settle(store: &mut Store) {
    while let Ok(Some(action)) =
        tokio::time::timeout(Duration::from_millis(100), store.next_action()).await
    {
        store.dispatch(action);
    }
}
