//! Activity Log State
//!
//! Bounded history of feedback lines. `recorded` keeps counting past the
//! bound so a reader can ask for everything after a position it remembers.

use chrono::{DateTime, Local};
use std::collections::VecDeque;

const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ActivityKind {
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Success => "✅",
            Self::Error => "🚨",
            Self::Warning => "⚠️",
            Self::Info => "ℹ️",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub at: DateTime<Local>,
    pub kind: ActivityKind,
    pub message: String,
    /// Stage or operation that produced the entry
    pub source: String,
}

impl ActivityEntry {
    pub fn new(kind: ActivityKind, message: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            at: Local::now(),
            kind,
            message: message.into(),
            source: source.into(),
        }
    }

    /// `14:30:00 ✅ message`
    pub fn line(&self) -> String {
        format!(
            "{} {} {}",
            self.at.format("%H:%M:%S"),
            self.kind.emoji(),
            self.message
        )
    }
}

#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
    recorded: usize,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ActivityLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity: capacity.max(1),
            recorded: 0,
        }
    }

    pub fn record(&mut self, entry: ActivityEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        self.recorded += 1;
    }

    /// Entries ever recorded, including evicted ones
    pub fn recorded(&self) -> usize {
        self.recorded
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries recorded after position `seen`; evicted ones are skipped
    pub fn since(&self, seen: usize) -> impl Iterator<Item = &ActivityEntry> {
        let unseen = self.recorded.saturating_sub(seen).min(self.entries.len());
        self.entries.iter().skip(self.entries.len() - unseen)
    }

    pub fn errors(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.kind == ActivityKind::Error)
            .count()
    }
}
