//! Backlog entry value object.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::{MessageKind, classify};

/// Render format for entry timestamps in logs and proposal records.
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// A single formatted channel line held in the backlog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogEntry {
    text: String,
    timestamp: DateTime<Utc>,
    vote_count: u32,
    legislated: bool,
    eligible: bool,
}

impl BacklogEntry {
    /// Create an entry; the timestamp is truncated to whole seconds.
    ///
    /// Only lines that classify as proposals are eligible vote targets.
    pub fn new(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        let text = text.into();
        let eligible = classify(&text).is_proposal();
        Self {
            text,
            timestamp: timestamp.trunc_subsecs(0),
            vote_count: 0,
            legislated: false,
            eligible,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Tally recorded when this entry was processed (informational)
    pub fn vote_count(&self) -> u32 {
        self.vote_count
    }

    pub fn is_legislated(&self) -> bool {
        self.legislated
    }

    pub fn is_eligible(&self) -> bool {
        self.eligible
    }

    /// Eligible and not yet legislated
    pub fn can_legislate(&self) -> bool {
        self.eligible && !self.legislated
    }

    pub fn kind(&self) -> MessageKind {
        classify(&self.text)
    }

    /// `HH:MM:SS <text>`, the line format of channel logs and proposal context
    pub fn render(&self) -> String {
        format!("{} {}", self.timestamp.format(TIMESTAMP_FORMAT), self.text)
    }

    pub(crate) fn mark_legislated(&mut self) {
        self.legislated = true;
    }

    pub(crate) fn set_vote_count(&mut self, count: u32) {
        self.vote_count = count;
    }
}
