//! Workflow run status model
//!
//! A `WorkflowRunStatus` is a normalized snapshot of the latest run of the
//! build workflow. It is rebuilt from every poll response and never mutated.
//! Besides the classification used by the poller it knows how to render
//! itself for the operator console and for chat notifications.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use std::fmt;

/// Lifecycle status of a workflow run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStatus {
    /// Waiting for a runner (GitHub also reports `waiting`, `requested` and `pending`)
    Queued,
    /// Running on a runner
    InProgress,
    /// Finished; a conclusion is available
    Completed,
}

impl RunStatus {
    /// Map a GitHub API status string
    pub fn from_api(value: &str) -> Option<Self> {
        match value {
            "queued" | "waiting" | "requested" | "pending" => Some(RunStatus::Queued),
            "in_progress" => Some(RunStatus::InProgress),
            "completed" => Some(RunStatus::Completed),
            _ => None,
        }
    }

    /// API spelling of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conclusion of a completed workflow run
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RunConclusion {
    Success,
    Failure,
    Cancelled,
    Neutral,
    Skipped,
    TimedOut,
    ActionRequired,
    Stale,
    StartupFailure,
    /// A conclusion this client does not know yet
    Other(String),
}

impl RunConclusion {
    /// Map a GitHub API conclusion string
    pub fn from_api(value: &str) -> Self {
        match value {
            "success" => RunConclusion::Success,
            "failure" => RunConclusion::Failure,
            "cancelled" => RunConclusion::Cancelled,
            "neutral" => RunConclusion::Neutral,
            "skipped" => RunConclusion::Skipped,
            "timed_out" => RunConclusion::TimedOut,
            "action_required" => RunConclusion::ActionRequired,
            "stale" => RunConclusion::Stale,
            "startup_failure" => RunConclusion::StartupFailure,
            other => RunConclusion::Other(other.to_string()),
        }
    }

    /// API spelling of the conclusion
    pub fn as_str(&self) -> &str {
        match self {
            RunConclusion::Success => "success",
            RunConclusion::Failure => "failure",
            RunConclusion::Cancelled => "cancelled",
            RunConclusion::Neutral => "neutral",
            RunConclusion::Skipped => "skipped",
            RunConclusion::TimedOut => "timed_out",
            RunConclusion::ActionRequired => "action_required",
            RunConclusion::Stale => "stale",
            RunConclusion::StartupFailure => "startup_failure",
            RunConclusion::Other(value) => value,
        }
    }
}

impl fmt::Display for RunConclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a GitHub Actions workflow run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRunStatus {
    /// Workflow run ID
    pub run_id: u64,
    /// Sequential run number within the workflow
    pub run_number: u64,
    /// Name of the workflow
    pub workflow_name: Option<String>,
    /// Lifecycle status
    pub status: RunStatus,
    /// Conclusion; only ever set when `status` is `Completed`
    pub conclusion: Option<RunConclusion>,
    /// URL of the run page
    pub html_url: String,
    /// Branch the run executes on
    pub branch: String,
    /// Triggering event (e.g., "workflow_dispatch")
    pub event: Option<String>,
    /// ISO-8601 creation timestamp as reported by GitHub
    pub created_at: String,
    /// ISO-8601 last update timestamp as reported by GitHub
    pub updated_at: String,
}

impl WorkflowRunStatus {
    /// Queued or in progress
    pub fn is_active(&self) -> bool {
        matches!(self.status, RunStatus::Queued | RunStatus::InProgress)
    }

    /// Completed, whatever the conclusion
    pub fn is_terminal(&self) -> bool {
        self.status == RunStatus::Completed
    }

    /// Completed with a `success` conclusion
    pub fn is_successful(&self) -> bool {
        self.is_terminal() && self.conclusion == Some(RunConclusion::Success)
    }

    /// Marker distinguishing queued, running, succeeded, failed and cancelled runs
    pub fn emoji(&self) -> &'static str {
        match (self.status, &self.conclusion) {
            (RunStatus::Queued, _) => "⏱️",
            (RunStatus::InProgress, _) => "🏗️",
            (RunStatus::Completed, Some(RunConclusion::Success)) => "✅",
            (RunStatus::Completed, Some(RunConclusion::Failure)) => "❌",
            (RunStatus::Completed, Some(RunConclusion::Cancelled)) => "🚫",
            (RunStatus::Completed, _) => "⚠️",
        }
    }

    fn conclusion_label(&self) -> &str {
        self.conclusion
            .as_ref()
            .map(RunConclusion::as_str)
            .unwrap_or("unknown")
    }

    /// Short operator-facing summary: status, run number, branch and last update
    pub fn summary(&self) -> String {
        let headline = match (self.status, &self.conclusion) {
            (RunStatus::Completed, Some(RunConclusion::Success)) => "Build Successful!".to_string(),
            (RunStatus::Completed, Some(RunConclusion::Failure)) => "Build Failed!".to_string(),
            (RunStatus::Completed, _) => format!("Build Concluded: {}", self.conclusion_label()),
            (status, _) => format!("Current Status: {}", status),
        };

        format!(
            "{}\n  {} Run #{} on branch {}\n  📅 Updated: {}",
            headline,
            self.emoji(),
            self.run_number,
            self.branch,
            format_timestamp(&self.updated_at)
        )
    }

    /// Explanation of what the run is doing, for the status line
    pub fn detailed_status(&self) -> String {
        match (self.status, &self.conclusion) {
            (RunStatus::Queued, _) => {
                "⏳ Build is queued\nWaiting for an available runner...".to_string()
            }
            (RunStatus::InProgress, _) => {
                "🏗️ Build is running\nCompiling and packaging the APK...".to_string()
            }
            (RunStatus::Completed, Some(RunConclusion::Success)) => {
                "✅ Build completed successfully!\nThe APK is on its way to Telegram.".to_string()
            }
            (RunStatus::Completed, Some(RunConclusion::Failure)) => {
                "❌ Build failed\nCheck the run logs on GitHub for details.".to_string()
            }
            (RunStatus::Completed, Some(RunConclusion::Cancelled)) => {
                "🚫 Build cancelled".to_string()
            }
            (RunStatus::Completed, _) => {
                format!("📋 Build completed with conclusion: {}", self.conclusion_label())
            }
        }
    }

    /// Time between creation and last update, when both timestamps parse
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        let created = parse_instant(&self.created_at)?;
        let updated = parse_instant(&self.updated_at)?;
        let elapsed = updated.signed_duration_since(created);
        (elapsed >= chrono::Duration::zero()).then_some(elapsed)
    }

    /// HTML message for the chat notifier
    pub fn notification_text(&self, repo_full_name: &str) -> String {
        let headline = match (self.status, &self.conclusion) {
            (RunStatus::Completed, Some(RunConclusion::Success)) => "BUILD SUCCESS!".to_string(),
            (RunStatus::Completed, Some(RunConclusion::Failure)) => "BUILD FAILED!".to_string(),
            (RunStatus::Completed, Some(RunConclusion::Cancelled)) => "BUILD CANCELLED".to_string(),
            (RunStatus::Completed, _) => format!(
                "BUILD CONCLUDED: {}",
                escape_html(&self.conclusion_label().to_uppercase())
            ),
            _ => "BUILD STATUS UPDATE".to_string(),
        };

        let mut text = format!(
            "<b>{}</b>\n{} Repository: <code>{}</code>\n  • Run ID: {}\n  • Status: {}\n  • Branch: <code>{}</code>\n  • Created: {}\n",
            headline,
            self.emoji(),
            escape_html(repo_full_name),
            self.run_id,
            self.status,
            escape_html(&self.branch),
            format_timestamp(&self.created_at)
        );

        if let Some(elapsed) = self.elapsed().filter(|_| self.is_terminal()) {
            text.push_str(&format!("  • Duration: {}\n", format_elapsed(elapsed)));
        }

        if !self.html_url.is_empty() {
            text.push_str(&format!(
                "\n<a href=\"{}\">🔗 View Full Workflow Details</a>",
                escape_html(&self.html_url)
            ));
        }

        text
    }
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()
}

/// A point in time; timestamps without an offset are read as UTC
fn parse_instant(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .or_else(|| parse_timestamp(value).map(|naive| naive.and_utc().fixed_offset()))
}

/// Format an ISO-8601 timestamp as `MMM DD, HH:MM` in its own offset
///
/// Input that does not parse is returned unchanged.
pub fn format_timestamp(value: &str) -> String {
    match parse_timestamp(value) {
        Some(timestamp) => timestamp.format("%b %d, %H:%M").to_string(),
        None => value.to_string(),
    }
}

/// Format a duration as `1h 02m 03s`, `4m 05s` or `9s`
pub fn format_elapsed(elapsed: chrono::Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}h {:02}m {:02}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Escape text for Telegram's HTML parse mode
pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
