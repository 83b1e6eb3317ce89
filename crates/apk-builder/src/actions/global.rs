//! Global Actions
//!
//! Actions that affect the whole application rather than one domain.

/// Application-wide actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobalAction {
    /// End the session; stops any running poller
    Quit,
}
