//! Legislation rules from TOML (`[legislation]` section)

use eunomia_domain::{ConfigIssue, ConfigIssueCode, DEFAULT_BACKLOG_CAPACITY, LegislationRules};
use eunomia_domain::legislation::rules::{DEFAULT_CONTEXT_WINDOW, DEFAULT_VOTE_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Raw legislation configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLegislationConfig {
    /// Votes needed to legislate a proposal
    pub vote_threshold: u32,
    /// Number of recent lines kept for dereferencing
    pub backlog_capacity: usize,
    /// Lines of context recorded with each legislated proposal
    pub context_window: usize,
    /// Post `Proposal accepted: <text>` to the channel after legislation
    pub announce: bool,
}

impl Default for FileLegislationConfig {
    fn default() -> Self {
        Self {
            vote_threshold: DEFAULT_VOTE_THRESHOLD,
            backlog_capacity: DEFAULT_BACKLOG_CAPACITY,
            context_window: DEFAULT_CONTEXT_WINDOW,
            announce: false,
        }
    }
}

impl FileLegislationConfig {
    /// Convert to [`LegislationRules`], reporting every out-of-range field.
    ///
    /// Returns `None` when any field is invalid.
    pub fn to_rules(&self) -> (Option<LegislationRules>, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let fields = [
            ("legislation.vote_threshold", self.vote_threshold as i64),
            ("legislation.backlog_capacity", self.backlog_capacity as i64),
            ("legislation.context_window", self.context_window as i64),
        ];
        for (field, value) in fields {
            if value == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::OutOfRange {
                        field: field.to_string(),
                        value,
                    },
                    format!("{}: must be at least 1", field),
                ));
            }
        }

        if self.context_window > self.backlog_capacity && self.backlog_capacity > 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "legislation.context_window".to_string(),
                    value: self.context_window as i64,
                },
                format!(
                    "legislation.context_window: {} exceeds backlog_capacity {}, records will hold at most {} lines",
                    self.context_window, self.backlog_capacity, self.backlog_capacity
                ),
            ));
        }

        let rules =
            LegislationRules::new(self.vote_threshold, self.backlog_capacity, self.context_window)
                .ok();
        (rules, issues)
    }
}
