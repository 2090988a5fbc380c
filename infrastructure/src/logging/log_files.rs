//! Date-partitioned plain-text logs.
//!
//! ```text
//! <root>/channel/<channel>/<YYYY-MM-DD>.log            every backlog line
//! <root>/proposal/<channel>/<YYYY-MM-DD>_<HH:MM:SS>.log one legislation record
//! ```
//!
//! Files are opened in append mode per write and directories are created on
//! demand, so a date change rolls over to a new file without bookkeeping.

use chrono::{DateTime, Utc};
use eunomia_application::{ChannelLog, ProposalRecorder, RecordError};
use eunomia_domain::backlog::entry::TIMESTAMP_FORMAT;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Channel names as directory names; path separators are replaced.
fn channel_dir(root: &Path, kind: &str, channel: &str) -> PathBuf {
    let safe: String = channel
        .chars()
        .map(|c| if matches!(c, '/' | '\\') || c.is_control() { '_' } else { c })
        .collect();
    let safe = if safe.is_empty() || safe == "." || safe == ".." {
        "_".to_string()
    } else {
        safe
    };
    root.join(kind).join(safe)
}

fn append_lines<'a>(path: &Path, lines: impl IntoIterator<Item = &'a str>) -> Result<(), RecordError> {
    let io_error = |source| RecordError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_error)?;

    let mut buffer = String::new();
    for line in lines {
        buffer.push_str(line);
        buffer.push('\n');
    }
    file.write_all(buffer.as_bytes()).map_err(io_error)
}

/// One file per channel per day.
pub struct ChannelFileLog {
    root: PathBuf,
}

impl ChannelFileLog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, channel: &str, at: DateTime<Utc>) -> PathBuf {
        channel_dir(&self.root, "channel", channel).join(format!("{}.log", at.format("%Y-%m-%d")))
    }

    fn write(&self, channel: &str, text: &str, at: DateTime<Utc>) -> Result<(), RecordError> {
        let line = format!("{} {}", at.format(TIMESTAMP_FORMAT), text);
        append_lines(&self.path_for(channel, at), [line.as_str()])
    }
}

impl ChannelLog for ChannelFileLog {
    fn append_line(&self, channel: &str, line: &str, at: DateTime<Utc>) -> Result<(), RecordError> {
        self.write(channel, line, at)
    }

    fn begin(&self, channel: &str, at: DateTime<Utc>) -> Result<(), RecordError> {
        self.write(channel, "--- log begin ---", at)
    }

    fn end(&self, channel: &str, at: DateTime<Utc>) -> Result<(), RecordError> {
        self.write(channel, "--- log end ---", at)
    }
}

/// One file per legislation event, named by its date and time.
pub struct ProposalFileLog {
    root: PathBuf,
}

impl ProposalFileLog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, channel: &str, at: DateTime<Utc>) -> PathBuf {
        channel_dir(&self.root, "proposal", channel)
            .join(format!("{}.log", at.format("%Y-%m-%d_%H:%M:%S")))
    }
}

impl ProposalRecorder for ProposalFileLog {
    fn append_proposal_record(
        &self,
        channel: &str,
        lines: &[String],
        at: DateTime<Utc>,
    ) -> Result<(), RecordError> {
        if lines.is_empty() {
            return Err(RecordError::Invalid("empty proposal record".to_string()));
        }
        append_lines(&self.path_for(channel, at), lines.iter().map(String::as_str))
    }
}
