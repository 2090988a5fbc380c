//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// None of these are fatal: the caller logs them and drops the voting effect
/// of the message being processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("back-reference ~{back_reference} from backlog position {position} points before the start of the backlog")]
    DereferenceOutOfRange { position: usize, back_reference: usize },

    #[error("backlog position {index} is out of range (backlog length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no message #{back_reference} from {nick} in the backlog")]
    UnknownAuthor { nick: String, back_reference: usize },

    #[error("invalid legislation rules: {0}")]
    InvalidRules(String),
}

impl DomainError {
    /// Whether this error came from resolving a vote to its proposal
    pub fn is_dereference_failure(&self) -> bool {
        matches!(
            self,
            DomainError::DereferenceOutOfRange { .. }
                | DomainError::IndexOutOfRange { .. }
                | DomainError::UnknownAuthor { .. }
        )
    }
}
