//! IRC line codec (RFC 1459 message framing).
//!
//! ```text
//! [:prefix SPACE] command {SPACE param} [SPACE :trailing] CRLF
//! ```

use super::error::{IrcError, Result};

/// Maximum line length including CRLF
pub const MAX_LINE_LEN: usize = 512;

const CTCP_DELIM: char = '\u{1}';

/// One parsed protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrcMessage {
    pub prefix: Option<String>,
    pub command: String,
    pub params: Vec<String>,
}

impl IrcMessage {
    pub fn new(command: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            prefix: None,
            command: command.into(),
            params,
        }
    }

    /// Parse a line without its line terminator.
    pub fn parse(line: &str) -> Result<Self> {
        let parse_error = |error: &str| IrcError::ParseError {
            error: error.to_string(),
            raw: line.to_string(),
        };

        let mut rest = line.trim_end_matches(['\r', '\n']);

        let prefix = match rest.strip_prefix(':') {
            Some(stripped) => {
                let (prefix, tail) = stripped
                    .split_once(' ')
                    .ok_or_else(|| parse_error("prefix without command"))?;
                rest = tail.trim_start_matches(' ');
                Some(prefix.to_string())
            }
            None => None,
        };

        let (head, trailing) = match rest.split_once(" :") {
            Some((head, trailing)) => (head, Some(trailing)),
            None => (rest, None),
        };
        // A lone trailing parameter directly after the command
        let (head, trailing) = match head.strip_prefix(':') {
            Some(t) if trailing.is_none() => ("", Some(t)),
            _ => (head, trailing),
        };

        let mut words = head.split(' ').filter(|w| !w.is_empty());
        let command = words
            .next()
            .ok_or_else(|| parse_error("missing command"))?
            .to_ascii_uppercase();
        let mut params: Vec<String> = words.map(str::to_string).collect();
        if let Some(trailing) = trailing {
            params.push(trailing.to_string());
        }

        Ok(Self {
            prefix,
            command,
            params,
        })
    }

    /// Nickname part of the prefix (`nick!user@host`).
    pub fn source_nick(&self) -> Option<&str> {
        let prefix = self.prefix.as_deref()?;
        Some(prefix.split(['!', '@']).next().unwrap_or(prefix))
    }

    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// Serialize to a line without CRLF.
    ///
    /// The last parameter is always sent as trailing. Overlong lines are cut
    /// at a character boundary.
    pub fn to_line(&self) -> String {
        let mut line = String::new();
        if let Some(prefix) = &self.prefix {
            line.push(':');
            line.push_str(prefix);
            line.push(' ');
        }
        line.push_str(&self.command);
        if let Some((last, init)) = self.params.split_last() {
            for param in init {
                line.push(' ');
                line.push_str(param);
            }
            line.push_str(" :");
            line.push_str(last);
        }

        let line: String = line.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
        cut_to(line, MAX_LINE_LEN - 2)
    }
}

fn cut_to(mut s: String, max: usize) -> String {
    if s.len() > max {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s.truncate(end);
    }
    s
}

/// Split `\x01COMMAND args\x01` into command and arguments.
pub fn parse_ctcp(text: &str) -> Option<(&str, &str)> {
    let inner = text.strip_prefix(CTCP_DELIM)?;
    let inner = inner.strip_suffix(CTCP_DELIM).unwrap_or(inner);
    Some(match inner.split_once(' ') {
        Some((command, args)) => (command, args),
        None => (inner, ""),
    })
}

pub fn ctcp(command: &str, args: &str) -> String {
    if args.is_empty() {
        format!("{CTCP_DELIM}{command}{CTCP_DELIM}")
    } else {
        format!("{CTCP_DELIM}{command} {args}{CTCP_DELIM}")
    }
}

/// Whether a target names a channel rather than a user
pub fn is_channel(target: &str) -> bool {
    target.starts_with(['#', '&', '+', '!'])
}
