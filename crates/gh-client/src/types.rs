//! GitHub API data transfer objects
//!
//! These types represent the data this crate exchanges with the GitHub API.
//! They are intentionally separate from application domain models
//! to keep this crate pure and reusable.

use serde::{Deserialize, Serialize};

/// The user a token authenticates as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// GitHub login (e.g., "octocat")
    pub login: String,
}

/// A repository visible to the authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Full name in `owner/repo` form
    pub full_name: String,

    /// Whether the repository is private
    #[serde(default)]
    pub private: bool,

    /// Default branch (e.g., "main")
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// A workflow definition to be committed into a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowFile {
    /// Path inside the repository (e.g., ".github/workflows/android-build.yml")
    pub path: String,
    /// Plain-text YAML content (encoded to base64 on the wire)
    pub content: String,
    /// Branch the file is committed to
    pub branch: String,
    /// Commit message
    pub message: String,
}

impl WorkflowFile {
    /// File name component of the path, used as the workflow id for dispatches
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Whether a workflow file write created a new file or replaced one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileWriteKind {
    /// 201 Created
    Created,
    /// 200 OK
    Updated,
}

/// Result of a successful workflow file write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWrite {
    /// Created or updated
    pub kind: FileWriteKind,
    /// Revision marker (blob SHA) of the written file, when reported
    pub sha: Option<String>,
}

/// Parameters of a workflow dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    /// Workflow file name or id (e.g., "android-build.yml")
    pub workflow: String,
    /// Git ref to run on (e.g., "main")
    pub git_ref: String,
    /// Build variant passed as the `build_type` input
    pub variant: String,
}
