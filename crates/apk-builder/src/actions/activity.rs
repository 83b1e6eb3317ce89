//! Activity log actions

use crate::state::ActivityKind;

/// Records a line of user feedback, tagged with what produced it
#[derive(Debug, Clone)]
pub enum ActivityAction {
    Record {
        kind: ActivityKind,
        message: String,
        source: String,
    },
}

impl ActivityAction {
    fn record(kind: ActivityKind, message: impl Into<String>, source: impl Into<String>) -> Self {
        Self::Record {
            kind,
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn success(message: impl Into<String>, source: impl Into<String>) -> Self {
        Self::record(ActivityKind::Success, message, source)
    }

    pub fn error(message: impl Into<String>, source: impl Into<String>) -> Self {
        Self::record(ActivityKind::Error, message, source)
    }

    pub fn warning(message: impl Into<String>, source: impl Into<String>) -> Self {
        Self::record(ActivityKind::Warning, message, source)
    }

    pub fn info(message: impl Into<String>, source: impl Into<String>) -> Self {
        Self::record(ActivityKind::Info, message, source)
    }
}
