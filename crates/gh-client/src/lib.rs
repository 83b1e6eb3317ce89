//! GitHub Actions client for remote Android builds
//!
//! This crate provides a trait-based GitHub API client covering the calls a
//! remote build needs: token check, repository access, workflow file
//! management, workflow dispatch and run status polling.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              GitHubClient trait                  │
//! │  - verify_access()                               │
//! │  - upsert_workflow_file()                        │
//! │  - dispatch_build()                              │
//! │  - fetch_latest_run()                            │
//! └─────────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!              ┌─────────────────┐       ┌──────────────────────┐
//!              │ OctocrabClient  │◄──────│ OctocrabClientFactory│
//!              │ (direct API)    │       │ (one client per token)│
//!              └─────────────────┘       └──────────────────────┘
//! ```
//!
//! Responses are decoded into [`WorkflowRunStatus`], which classifies a run
//! (active, terminal, successful) and renders it for the console and for
//! chat notifications.
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_client::{GitHubClient, GitHubClientFactory, OctocrabClientFactory};
//!
//! # async fn example() -> gh_client::Result<()> {
//! let factory = OctocrabClientFactory::new("https://api.github.com");
//! let client = factory.client("ghp_token")?;
//!
//! if let Some(run) = client.fetch_latest_run("acme", "app", "main").await? {
//!     println!("{}", run.summary());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod client_factory;
pub mod error;
pub mod octocrab_client;
mod payload;
pub mod types;
pub mod workflow_run;

/// Default GitHub REST API base
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

pub use client::GitHubClient;
pub use client_factory::{GitHubClientFactory, OctocrabClientFactory};
pub use error::{GitHubError, Result};
pub use octocrab_client::OctocrabClient;
pub use types::{
    AuthenticatedUser, DispatchRequest, FileWrite, FileWriteKind, Repository, WorkflowFile,
};
pub use workflow_run::{format_timestamp, RunConclusion, RunStatus, WorkflowRunStatus};
