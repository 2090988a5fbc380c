//! Legislation rules.

use serde::{Deserialize, Serialize};

use crate::backlog::DEFAULT_BACKLOG_CAPACITY;
use crate::core::error::DomainError;

/// Votes needed to legislate a proposal
pub const DEFAULT_VOTE_THRESHOLD: u32 = 3;

/// Lines of context persisted with a legislated proposal
pub const DEFAULT_CONTEXT_WINDOW: usize = 25;

/// Immutable rule set for one channel.
///
/// Replaced as a whole between messages, never mutated during a scan.
///
/// # Example
///
/// ```
/// use eunomia_domain::LegislationRules;
///
/// let rules = LegislationRules::default();
/// assert_eq!(rules.vote_threshold, 3);
/// assert!(rules.is_reached(3));
/// assert!(!rules.is_reached(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegislationRules {
    pub vote_threshold: u32,
    pub backlog_capacity: usize,
    pub context_window: usize,
}

impl LegislationRules {
    /// Build rules, rejecting zero values.
    pub fn new(
        vote_threshold: u32,
        backlog_capacity: usize,
        context_window: usize,
    ) -> Result<Self, DomainError> {
        if vote_threshold == 0 {
            return Err(DomainError::InvalidRules(
                "vote_threshold must be at least 1".to_string(),
            ));
        }
        if backlog_capacity == 0 {
            return Err(DomainError::InvalidRules(
                "backlog_capacity must be at least 1".to_string(),
            ));
        }
        if context_window == 0 {
            return Err(DomainError::InvalidRules(
                "context_window must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            vote_threshold,
            backlog_capacity,
            context_window,
        })
    }

    pub fn is_reached(&self, votes: u32) -> bool {
        votes >= self.vote_threshold
    }
}

impl Default for LegislationRules {
    fn default() -> Self {
        Self {
            vote_threshold: DEFAULT_VOTE_THRESHOLD,
            backlog_capacity: DEFAULT_BACKLOG_CAPACITY,
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }
}

impl std::fmt::Display for LegislationRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} votes, backlog {}, context {}",
            self.vote_threshold, self.backlog_capacity, self.context_window
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let rules = LegislationRules::default();
        assert_eq!(rules.vote_threshold, 3);
        assert_eq!(rules.backlog_capacity, 50);
        assert_eq!(rules.context_window, 25);
    }

    #[test]
    fn test_new_rejects_zero() {
        assert!(LegislationRules::new(0, 50, 25).is_err());
        assert!(LegislationRules::new(3, 0, 25).is_err());
        assert!(LegislationRules::new(3, 50, 0).is_err());
        assert_eq!(
            LegislationRules::new(2, 10, 5).unwrap(),
            LegislationRules {
                vote_threshold: 2,
                backlog_capacity: 10,
                context_window: 5
            }
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            LegislationRules::default().to_string(),
            "3 votes, backlog 50, context 25"
        );
    }
}
