//! Actions module
//!
//! All actions in the application, tagged by domain. Middleware reacts to
//! them first; whatever is not consumed reaches the reducer.

pub mod activity;
pub mod build;
pub mod global;
pub mod notification;
pub mod poller;
pub mod repository;

pub use activity::ActivityAction;
pub use build::{BuildAction, BuildRequest, StageOutcome};
pub use global::GlobalAction;
pub use notification::NotificationAction;
pub use poller::PollerAction;
pub use repository::RepositoryAction;

/// Root action enum - tagged by domain
#[derive(Debug, Clone)]
pub enum Action {
    /// Build attempt lifecycle
    Build(BuildAction),
    /// Run status polling
    Poller(PollerAction),
    /// Chat notifications
    Notification(NotificationAction),
    /// Repository listing
    Repository(RepositoryAction),
    /// User feedback lines
    Activity(ActivityAction),
    /// Application-wide actions
    Global(GlobalAction),
}
