//! Persistence ports for channel history and legislation records.
//!
//! Writes are synchronous: one event is processed to completion before the
//! next is read, so a record is on disk before the engine sees another line.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors from the persistence adapters
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid record: {0}")]
    Invalid(String),
}

/// Append-only store of legislation records.
pub trait ProposalRecorder: Send + Sync {
    /// Append the rendered lines of one record.
    fn append_proposal_record(
        &self,
        channel: &str,
        lines: &[String],
        at: DateTime<Utc>,
    ) -> Result<(), RecordError>;
}

/// Plain-text history of everything that entered the backlog.
pub trait ChannelLog: Send + Sync {
    fn append_line(&self, channel: &str, line: &str, at: DateTime<Utc>)
    -> Result<(), RecordError>;

    fn begin(&self, channel: &str, at: DateTime<Utc>) -> Result<(), RecordError>;

    fn end(&self, channel: &str, at: DateTime<Utc>) -> Result<(), RecordError>;
}

/// Channel log that discards everything.
pub struct NoChannelLog;

impl ChannelLog for NoChannelLog {
    fn append_line(&self, _: &str, _: &str, _: DateTime<Utc>) -> Result<(), RecordError> {
        Ok(())
    }

    fn begin(&self, _: &str, _: DateTime<Utc>) -> Result<(), RecordError> {
        Ok(())
    }

    fn end(&self, _: &str, _: DateTime<Utc>) -> Result<(), RecordError> {
        Ok(())
    }
}
