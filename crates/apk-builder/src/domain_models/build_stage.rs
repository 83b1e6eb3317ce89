//! Build stage model
//!
//! The stages a build attempt moves through, from the token check to the
//! terminal outcome, and the only transitions allowed between them.

use strum::{Display, EnumIter};

/// Where the overall build process is
///
/// Stages are ordered: each active stage is followed by its successor,
/// `PollingStatus` ends in `Completed` or `Failed`, and the terminal
/// stages only go back to `Idle` on acknowledgement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Display)]
pub enum BuildStage {
    #[default]
    Idle,
    CheckingToken,
    FetchingRepos,
    VerifyingAccess,
    SettingUpWorkflow,
    TestingNotifier,
    TriggeringBuild,
    PollingStatus,
    Completed,
    Failed,
}

/// Coarse status used when composing chat notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum NotificationStatus {
    Setup,
    InProgress,
    Finished,
    Failed,
}

impl NotificationStatus {
    /// Headline label shown in chat messages
    pub fn label(&self) -> &'static str {
        match self {
            NotificationStatus::Setup => "🔧 Build Setup",
            NotificationStatus::InProgress => "⚙️ Build In Progress",
            NotificationStatus::Finished => "✅ Build Finished",
            NotificationStatus::Failed => "❌ Build Failed",
        }
    }
}

impl BuildStage {
    /// Progress message shown while in this stage
    pub fn message(&self) -> &'static str {
        match self {
            BuildStage::Idle => "🚀 Ready to build projects!",
            BuildStage::CheckingToken => "🔑 Verifying GitHub token...",
            BuildStage::FetchingRepos => "📥 Fetching repository list...",
            BuildStage::VerifyingAccess => "🔍 Checking repository access...",
            BuildStage::SettingUpWorkflow => "📝 Creating CI/CD workflow file...",
            BuildStage::TestingNotifier => "💬 Testing Telegram connection...",
            BuildStage::TriggeringBuild => "🚀 Triggering GitHub Actions workflow...",
            BuildStage::PollingStatus => "⏳ Build started. Polling status...",
            BuildStage::Completed => "✅ Build process finished.",
            BuildStage::Failed => "❌ Build process failed.",
        }
    }

    pub fn notification_status(&self) -> NotificationStatus {
        match self {
            BuildStage::Idle
            | BuildStage::CheckingToken
            | BuildStage::FetchingRepos
            | BuildStage::VerifyingAccess
            | BuildStage::SettingUpWorkflow
            | BuildStage::TestingNotifier => NotificationStatus::Setup,
            BuildStage::TriggeringBuild | BuildStage::PollingStatus => {
                NotificationStatus::InProgress
            }
            BuildStage::Completed => NotificationStatus::Finished,
            BuildStage::Failed => NotificationStatus::Failed,
        }
    }

    /// Successor on the happy path; `None` for `PollingStatus` and the terminal stages
    pub fn next(&self) -> Option<BuildStage> {
        match self {
            BuildStage::Idle => Some(BuildStage::CheckingToken),
            BuildStage::CheckingToken => Some(BuildStage::FetchingRepos),
            BuildStage::FetchingRepos => Some(BuildStage::VerifyingAccess),
            BuildStage::VerifyingAccess => Some(BuildStage::SettingUpWorkflow),
            BuildStage::SettingUpWorkflow => Some(BuildStage::TestingNotifier),
            BuildStage::TestingNotifier => Some(BuildStage::TriggeringBuild),
            BuildStage::TriggeringBuild => Some(BuildStage::PollingStatus),
            BuildStage::PollingStatus | BuildStage::Completed | BuildStage::Failed => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BuildStage::Completed | BuildStage::Failed)
    }

    /// Between `CheckingToken` and `PollingStatus`, inclusive
    pub fn is_active(&self) -> bool {
        !self.is_terminal() && *self != BuildStage::Idle
    }

    /// Whether moving from `self` to `to` is a legal transition
    pub fn can_transition_to(&self, to: BuildStage) -> bool {
        match (self, to) {
            (BuildStage::Completed | BuildStage::Failed, BuildStage::Idle) => true,
            (BuildStage::PollingStatus, BuildStage::Completed) => true,
            (from, BuildStage::Failed) if from.is_active() => true,
            (from, to) => from.next() == Some(to),
        }
    }
}
