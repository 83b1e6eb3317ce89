//! Application State Module
//!
//! Contains all state types used by the application, organized by feature.

mod activity;
mod app;
mod build;
mod repositories;

pub use activity::{ActivityEntry, ActivityKind, ActivityLog};
pub use app::AppState;
pub use build::BuildState;
pub use repositories::RepositoryListState;
