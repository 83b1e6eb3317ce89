//! Tagged decoding of GitHub response bodies
//!
//! Response bodies are first classified by the keys present in the JSON
//! object and only then decoded into the matching shape. A body that fits
//! none of the known shapes is a [`GitHubError::Parse`].

use crate::error::{GitHubError, Result};
use crate::workflow_run::{RunConclusion, RunStatus, WorkflowRunStatus};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// A single workflow run as returned by the Actions API
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RunPayload {
    pub id: u64,
    pub run_number: u64,
    #[serde(default)]
    pub name: Option<String>,
    pub status: String,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub head_branch: Option<String>,
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RunListPayload {
    #[serde(default)]
    pub total_count: u64,
    pub workflow_runs: Vec<RunPayload>,
}

/// A repository content object (`GET /repos/{o}/{r}/contents/{path}`)
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContentPayload {
    pub sha: String,
    pub path: String,
}

/// Response of a contents write: the written file plus the commit
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FileCommitPayload {
    pub content: Option<ContentPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorPayload {
    pub message: String,
}

/// The response shapes this client understands
#[derive(Debug, Clone)]
pub(crate) enum Payload {
    RunList(RunListPayload),
    Run(RunPayload),
    Content(ContentPayload),
    FileCommit(FileCommitPayload),
    Error(ErrorPayload),
}

impl Payload {
    /// Classify a response body by its shape, then decode it
    pub fn classify(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| GitHubError::Parse(format!("invalid JSON: {}", e)))?;

        let Some(object) = value.as_object() else {
            return Err(GitHubError::Parse("expected a JSON object".to_string()));
        };

        if object.contains_key("workflow_runs") {
            Ok(Payload::RunList(from_value(value)?))
        } else if object.contains_key("commit") && object.contains_key("content") {
            Ok(Payload::FileCommit(from_value(value)?))
        } else if object.contains_key("sha") && object.contains_key("path") {
            Ok(Payload::Content(from_value(value)?))
        } else if object.contains_key("run_number") && object.contains_key("status") {
            Ok(Payload::Run(from_value(value)?))
        } else if object.contains_key("message") {
            Ok(Payload::Error(from_value(value)?))
        } else {
            Err(GitHubError::Parse("unrecognized payload shape".to_string()))
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Payload::RunList(_) => "run list",
            Payload::Run(_) => "workflow run",
            Payload::Content(_) => "content object",
            Payload::FileCommit(_) => "file commit",
            Payload::Error(_) => "error message",
        }
    }

    fn unexpected(self, wanted: &str) -> GitHubError {
        match self {
            Payload::Error(error) => GitHubError::Parse(format!(
                "expected {} but GitHub answered: {}",
                wanted, error.message
            )),
            other => GitHubError::Parse(format!("expected {} but got {}", wanted, other.describe())),
        }
    }

    pub fn into_run_list(self) -> Result<RunListPayload> {
        match self {
            Payload::RunList(list) => Ok(list),
            other => Err(other.unexpected("run list")),
        }
    }

    pub fn into_content(self) -> Result<ContentPayload> {
        match self {
            Payload::Content(content) => Ok(content),
            other => Err(other.unexpected("content object")),
        }
    }

    pub fn into_file_commit(self) -> Result<FileCommitPayload> {
        match self {
            Payload::FileCommit(commit) => Ok(commit),
            other => Err(other.unexpected("file commit")),
        }
    }
}

/// Best-effort extraction of the `message` of an error body
pub(crate) fn error_message(body: &str) -> String {
    match Payload::classify(body) {
        Ok(Payload::Error(error)) => error.message,
        _ => body.trim().to_string(),
    }
}

/// Decode a body whose shape is fixed by the endpoint (e.g., `/user`)
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| GitHubError::Parse(e.to_string()))
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| GitHubError::Parse(e.to_string()))
}

impl TryFrom<RunPayload> for WorkflowRunStatus {
    type Error = GitHubError;

    fn try_from(run: RunPayload) -> Result<Self> {
        let status = RunStatus::from_api(&run.status).ok_or_else(|| {
            GitHubError::Parse(format!("unknown workflow run status '{}'", run.status))
        })?;

        // A conclusion is only meaningful once the run has completed
        let conclusion = match status {
            RunStatus::Completed => run.conclusion.as_deref().map(RunConclusion::from_api),
            RunStatus::Queued | RunStatus::InProgress => None,
        };

        Ok(WorkflowRunStatus {
            run_id: run.id,
            run_number: run.run_number,
            workflow_name: run.name,
            status,
            conclusion,
            html_url: run.html_url,
            branch: run.head_branch.unwrap_or_default(),
            event: run.event,
            created_at: run.created_at,
            updated_at: run.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RUN_LIST: &str = r#"{
        "total_count": 1,
        "workflow_runs": [{
            "id": 30433642,
            "name": "Android CI",
            "head_branch": "main",
            "run_number": 562,
            "event": "workflow_dispatch",
            "status": "in_progress",
            "conclusion": "success",
            "html_url": "https://github.com/acme/app/actions/runs/30433642",
            "created_at": "2024-03-05T14:30:00Z",
            "updated_at": "2024-03-05T14:31:00Z"
        }]
    }"#;

    #[test]
    fn test_classify_run_list() {
        let list = Payload::classify(RUN_LIST).unwrap().into_run_list().unwrap();
        assert_eq!(list.total_count, 1);
        assert_eq!(list.workflow_runs.len(), 1);
        assert_eq!(list.workflow_runs[0].id, 30433642);
    }

    #[test]
    fn test_conclusion_dropped_for_active_run() {
        let list = Payload::classify(RUN_LIST).unwrap().into_run_list().unwrap();
        let status = WorkflowRunStatus::try_from(list.workflow_runs[0].clone()).unwrap();
        assert_eq!(status.status, RunStatus::InProgress);
        assert_eq!(status.conclusion, None);
        assert_eq!(status.branch, "main");
    }

    #[test]
    fn test_completed_run_keeps_conclusion() {
        let body = r#"{"id": 1, "run_number": 2, "status": "completed", "conclusion": "cancelled"}"#;
        let Payload::Run(run) = Payload::classify(body).unwrap() else {
            panic!("expected a single run");
        };
        let status = WorkflowRunStatus::try_from(run).unwrap();
        assert_eq!(status.conclusion, Some(RunConclusion::Cancelled));
        assert!(status.is_terminal());
        assert!(!status.is_successful());
    }

    #[test]
    fn test_unknown_status_is_a_parse_error() {
        let body = r#"{"id": 1, "run_number": 2, "status": "sleeping"}"#;
        let Payload::Run(run) = Payload::classify(body).unwrap() else {
            panic!("expected a single run");
        };
        assert!(matches!(
            WorkflowRunStatus::try_from(run),
            Err(GitHubError::Parse(_))
        ));
    }

    #[test]
    fn test_classify_content_and_file_commit() {
        let content = Payload::classify(r#"{"sha": "abc", "path": "a.yml", "type": "file"}"#)
            .unwrap()
            .into_content()
            .unwrap();
        assert_eq!(content.sha, "abc");

        let commit = Payload::classify(
            r#"{"content": {"sha": "def", "path": "a.yml"}, "commit": {"sha": "123"}}"#,
        )
        .unwrap()
        .into_file_commit()
        .unwrap();
        assert_eq!(commit.content.unwrap().sha, "def");
    }

    #[test]
    fn test_error_shape_is_reported_when_other_shape_expected() {
        let err = Payload::classify(r#"{"message": "Not Found", "documentation_url": "x"}"#)
            .unwrap()
            .into_run_list()
            .unwrap_err();
        assert_eq!(
            err,
            GitHubError::Parse("expected run list but GitHub answered: Not Found".to_string())
        );
    }

    #[test]
    fn test_unknown_shapes_are_rejected() {
        assert!(matches!(
            Payload::classify(r#"{"hello": "world"}"#),
            Err(GitHubError::Parse(_))
        ));
        assert!(matches!(Payload::classify("[1, 2]"), Err(GitHubError::Parse(_))));
        assert!(matches!(Payload::classify("<html>"), Err(GitHubError::Parse(_))));
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        assert_eq!(error_message(r#"{"message": "Bad credentials"}"#), "Bad credentials");
        assert_eq!(error_message("  gateway timeout \n"), "gateway timeout");
    }
}
