//! Build target model
//!
//! What is being built: repository owner, repository name and build variant.
//! Created once per build attempt from user input and never changed afterwards.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildTargetError {
    #[error("'{0}' is not a GitHub repository (use owner/repo or a github.com URL)")]
    InvalidRepository(String),
    #[error("build variant must not be empty")]
    EmptyVariant,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildTarget {
    pub owner: String,
    pub repo: String,
    /// Gradle build variant, lowercased (e.g., "debug", "release")
    pub variant: String,
}

impl BuildTarget {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        variant: impl Into<String>,
    ) -> Result<Self, BuildTargetError> {
        let variant = variant.into().trim().to_lowercase();
        if variant.is_empty() {
            return Err(BuildTargetError::EmptyVariant);
        }
        Ok(Self {
            owner: owner.into(),
            repo: repo.into(),
            variant,
        })
    }

    /// Parse a repository reference and combine it with a variant
    ///
    /// Accepts `https://github.com/owner/repo`, `git@github.com:owner/repo.git`
    /// and `owner/repo`.
    pub fn parse(repository: &str, variant: &str) -> Result<Self, BuildTargetError> {
        let (owner, repo) = parse_repository(repository)?;
        Self::new(owner, repo, variant)
    }

    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub fn web_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }

    pub fn actions_url(&self) -> String {
        format!("{}/actions", self.web_url())
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.owner, self.repo, self.variant)
    }
}

fn parse_repository(input: &str) -> Result<(String, String), BuildTargetError> {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    static SHORTHAND_REGEX: OnceLock<Regex> = OnceLock::new();

    let input = input.trim();
    let url = URL_REGEX.get_or_init(|| {
        // Matches https://github.com/owner/repo(.git) and git@github.com:owner/repo(.git)
        Regex::new(r"github\.com[/:]([^/\s]+)/([^/\s]+?)(?:\.git)?/?$").unwrap()
    });
    let shorthand = SHORTHAND_REGEX
        .get_or_init(|| Regex::new(r"^([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)$").unwrap());

    let captures = url
        .captures(input)
        .or_else(|| shorthand.captures(input))
        .ok_or_else(|| BuildTargetError::InvalidRepository(input.to_string()))?;

    let owner = captures[1].to_string();
    let repo = captures[2].trim_end_matches(".git").to_string();
    if repo.is_empty() {
        return Err(BuildTargetError::InvalidRepository(input.to_string()));
    }
    Ok((owner, repo))
}
