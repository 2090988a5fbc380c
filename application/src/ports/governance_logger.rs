//! Port for structured governance event logging.
//!
//! Separate from `tracing` diagnostics: this port captures the legislative
//! history of a channel (legislation, filibusters, failures, reloads) in a
//! machine-readable form such as JSONL.

use serde_json::Value;

/// A structured governance event.
pub struct GovernanceEvent {
    /// Event type identifier (e.g. "proposal_legislated", "filibuster").
    pub event_type: &'static str,
    /// Event-specific fields.
    pub payload: Value,
}

impl GovernanceEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for recording governance events.
///
/// Non-fallible: logging failures never disturb voting.
pub trait GovernanceLogger: Send + Sync {
    fn log(&self, event: GovernanceEvent);
}

/// No-op implementation for tests and when the event log is disabled.
pub struct NoGovernanceLogger;

impl GovernanceLogger for NoGovernanceLogger {
    fn log(&self, _event: GovernanceEvent) {}
}
