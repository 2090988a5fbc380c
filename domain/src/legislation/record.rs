//! Persisted proposal record.
//!
//! A record is rendered as plain lines:
//!
//! ```text
//! [<alice> we should meet on fridays]
//! 18:02:11 <carol> what about the schedule
//! 18:02:40 <alice> we should meet on fridays
//! <blank>
//! ```

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backlog::BacklogEntry;
use crate::backlog::entry::TIMESTAMP_FORMAT;

/// Errors reading a record back from its rendered lines
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordParseError {
    #[error("record is empty")]
    Empty,

    #[error("missing [proposal] header, got: {0}")]
    MissingHeader(String),

    #[error("malformed context line: {0}")]
    MalformedContext(String),
}

/// One context line: wall-clock second and display text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextLine {
    pub time: NaiveTime,
    pub text: String,
}

impl ContextLine {
    pub fn render(&self) -> String {
        format!("{} {}", self.time.format(TIMESTAMP_FORMAT), self.text)
    }

    pub fn parse(line: &str) -> Result<Self, RecordParseError> {
        let malformed = || RecordParseError::MalformedContext(line.to_string());
        let (time, text) = line.split_once(' ').ok_or_else(malformed)?;
        let time = NaiveTime::parse_from_str(time, TIMESTAMP_FORMAT).map_err(|_| malformed())?;
        Ok(Self {
            time,
            text: text.to_string(),
        })
    }
}

impl From<&BacklogEntry> for ContextLine {
    fn from(entry: &BacklogEntry) -> Self {
        Self {
            time: entry.timestamp().time(),
            text: entry.text().to_string(),
        }
    }
}

/// A legislated proposal with its surrounding context, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub proposal: String,
    pub context: Vec<ContextLine>,
}

impl ProposalRecord {
    pub fn new(proposal: impl Into<String>, context: Vec<ContextLine>) -> Self {
        Self {
            proposal: proposal.into(),
            context,
        }
    }

    /// Header, context lines, then a blank separator.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.context.len() + 2);
        lines.push(format!("[{}]", self.proposal));
        lines.extend(self.context.iter().map(ContextLine::render));
        lines.push(String::new());
        lines
    }

    /// Read one record back from its rendered form.
    pub fn parse(text: &str) -> Result<Self, RecordParseError> {
        let mut lines = text.lines().skip_while(|line| line.is_empty());
        let header = lines.next().ok_or(RecordParseError::Empty)?;
        let proposal = header
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| RecordParseError::MissingHeader(header.to_string()))?;

        let context = lines
            .take_while(|line| !line.is_empty())
            .map(ContextLine::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(proposal, context))
    }

    /// Read every record in a proposal log.
    pub fn parse_all(text: &str) -> Result<Vec<Self>, RecordParseError> {
        text.split("\n\n")
            .filter(|chunk| !chunk.trim().is_empty())
            .map(Self::parse)
            .collect()
    }
}
