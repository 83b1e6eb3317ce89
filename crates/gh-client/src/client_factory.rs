//! GitHub client construction
//!
//! Tokens are entered per session, so clients are built on demand for a
//! given token instead of being resolved from the environment.

use crate::client::GitHubClient;
use crate::error::{GitHubError, Result};
use crate::OctocrabClient;
use http::header::ACCEPT;
use log::info;
use octocrab::Octocrab;
use std::sync::Arc;

/// Media type GitHub recommends for REST requests
pub const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// REST API version pinned on every request
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// Builds GitHub clients for a token
///
/// The application holds a factory rather than a client because the token
/// is only known once the user has entered it.
pub trait GitHubClientFactory: Send + Sync {
    /// Create a client authenticating with `token`
    fn client(&self, token: &str) -> Result<Arc<dyn GitHubClient>>;
}

/// Factory producing [`OctocrabClient`]s against a configurable API base
#[derive(Debug, Clone)]
pub struct OctocrabClientFactory {
    api_base: String,
}

impl OctocrabClientFactory {
    /// Create a factory for the given API base (e.g., `https://api.github.com`)
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }

    /// API base URL clients are created for
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

impl GitHubClientFactory for OctocrabClientFactory {
    fn client(&self, token: &str) -> Result<Arc<dyn GitHubClient>> {
        info!("Creating GitHub client for {}", self.api_base);
        let octocrab = build_octocrab(&self.api_base, token)?;
        Ok(Arc::new(OctocrabClient::new(Arc::new(octocrab))))
    }
}

/// Build an octocrab instance with bearer auth and the REST headers GitHub expects
///
/// octocrab itself pins `X-GitHub-Api-Version` to [`GITHUB_API_VERSION`] on
/// every request it builds, so only the media type is added here.
pub(crate) fn build_octocrab(api_base: &str, token: &str) -> Result<Octocrab> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .base_uri(api_base)
        .map_err(|e| GitHubError::Connectivity(format!("invalid API base '{}': {}", api_base, e)))?
        .add_header(ACCEPT, GITHUB_MEDIA_TYPE.to_string())
        .build()
        .map_err(|e| GitHubError::Connectivity(format!("failed to build GitHub client: {}", e)))
}
