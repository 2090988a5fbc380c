//! Classification of formatted backlog lines.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::core::nick::nick_eq;

/// `D:` / `:D:` optionally addressed to a nick.
static FILIBUSTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:<[^>]+> )?(?:\S+[:,] )?:?D:").expect("filibuster pattern is valid")
});

/// Join, part and quit system lines.
static IGNORED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*\*\* (?:Joins|Parts|Quits)").expect("ignored pattern is valid")
});

static VOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:<[^>]+> )?(?:(?P<nick>\S+)[:,] )?:D(?:(?P<carets>\^+)|~(?P<ints>\d+)|~(?P<expr>.+))?$",
    )
    .expect("vote pattern is valid")
});

/// A parsed vote: who it targets and how far back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSpec {
    /// Explicit target nick (`nick: :D`); `None` targets the nearest message
    pub target_nick: Option<String>,
    /// Number of eligible matching messages to skip before the target
    pub back_reference: usize,
    /// Unevaluated `~expr` suffix, carried through for diagnostics
    pub expression: Option<String>,
}

impl VoteSpec {
    /// A bare `:D`
    pub fn plain() -> Self {
        Self {
            target_nick: None,
            back_reference: 0,
            expression: None,
        }
    }

    /// An implicit vote reaching `back_reference` messages back
    pub fn implicit(back_reference: usize) -> Self {
        Self {
            back_reference,
            ..Self::plain()
        }
    }

    /// A vote naming `nick`
    pub fn explicit(nick: impl Into<String>, back_reference: usize) -> Self {
        Self {
            target_nick: Some(nick.into()),
            back_reference,
            expression: None,
        }
    }

    pub fn is_explicit(&self) -> bool {
        self.target_nick.is_some()
    }
}

/// The role a backlog line plays in legislation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageKind {
    /// Explicit refusal to propose; resets the tally
    Filibuster,
    /// Join/part/quit line; invisible to vote resolution
    Ignored,
    /// A vote for some earlier message
    Vote(VoteSpec),
    /// Anything else
    Proposal,
}

impl MessageKind {
    pub fn is_proposal(&self) -> bool {
        matches!(self, MessageKind::Proposal)
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, MessageKind::Ignored)
    }

    pub fn is_vote(&self) -> bool {
        matches!(self, MessageKind::Vote(_))
    }
}

/// Classify a formatted backlog line.
pub fn classify(text: &str) -> MessageKind {
    if FILIBUSTER.is_match(text) {
        return MessageKind::Filibuster;
    }
    if IGNORED.is_match(text) {
        return MessageKind::Ignored;
    }
    match VOTE.captures(text) {
        Some(caps) => {
            let target_nick = caps.name("nick").map(|m| m.as_str().to_string());
            let expression = caps.name("expr").map(|m| m.as_str().to_string());
            // Digit strings too long for usize cannot reach any backlog entry
            let back_reference = if let Some(ints) = caps.name("ints") {
                ints.as_str().parse().unwrap_or(usize::MAX)
            } else if let Some(carets) = caps.name("carets") {
                carets.as_str().len()
            } else {
                0
            };
            MessageKind::Vote(VoteSpec {
                target_nick,
                back_reference,
                expression,
            })
        }
        None => MessageKind::Proposal,
    }
}

/// Author of a chat line (`<nick> text` or `* nick text`).
///
/// System lines (`*** ...`) have no author.
pub fn author_of(text: &str) -> Option<&str> {
    if let Some(rest) = text.strip_prefix('<') {
        let end = rest.find('>')?;
        return Some(&rest[..end]);
    }
    if text.starts_with("***") {
        return None;
    }
    let rest = text.strip_prefix("* ")?;
    rest.split(' ').next().filter(|nick| !nick.is_empty())
}

/// Whether `text` was written by `nick`.
pub fn is_authored_by(text: &str, nick: &str) -> bool {
    author_of(text).is_some_and(|author| nick_eq(author, nick))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_vote() {
        assert_eq!(classify("<bob> :D"), MessageKind::Vote(VoteSpec::plain()));
        assert_eq!(classify(":D"), MessageKind::Vote(VoteSpec::plain()));
    }

    #[test]
    fn test_caret_vote_counts_carets() {
        assert_eq!(
            classify("<bob> :D^^^"),
            MessageKind::Vote(VoteSpec::implicit(3))
        );
    }

    #[test]
    fn test_tilde_digits_vote() {
        assert_eq!(
            classify("<bob> :D~12"),
            MessageKind::Vote(VoteSpec::implicit(12))
        );
    }

    #[test]
    fn test_expression_vote_is_not_evaluated() {
        let kind = classify("<bob> :D~2+1");
        assert_eq!(
            kind,
            MessageKind::Vote(VoteSpec {
                target_nick: None,
                back_reference: 0,
                expression: Some("2+1".to_string()),
            })
        );
    }

    #[test]
    fn test_explicit_vote_with_colon_and_comma() {
        assert_eq!(
            classify("<bob> alice: :D"),
            MessageKind::Vote(VoteSpec::explicit("alice", 0))
        );
        assert_eq!(
            classify("<bob> alice, :D~2"),
            MessageKind::Vote(VoteSpec::explicit("alice", 2))
        );
        assert_eq!(
            classify("<bob> alice: :D^"),
            MessageKind::Vote(VoteSpec::explicit("alice", 1))
        );
    }

    #[test]
    fn test_filibuster_forms() {
        assert_eq!(classify("<bob> D:"), MessageKind::Filibuster);
        assert_eq!(classify("<bob> :D:"), MessageKind::Filibuster);
        assert_eq!(classify("<bob> alice: D:"), MessageKind::Filibuster);
        assert_eq!(classify("<bob> alice, :D:"), MessageKind::Filibuster);
    }

    #[test]
    fn test_ignored_system_lines() {
        assert_eq!(classify("*** Joins: bob"), MessageKind::Ignored);
        assert_eq!(classify("*** Parts: bob (bye)"), MessageKind::Ignored);
        assert_eq!(classify("*** Quits: bob (Ping timeout)"), MessageKind::Ignored);
    }

    #[test]
    fn test_everything_else_is_a_proposal() {
        assert_eq!(classify("<alice> we should meet on fridays"), MessageKind::Proposal);
        assert_eq!(classify("* alice waves"), MessageKind::Proposal);
        assert_eq!(classify("*** Topic: \"hi\" by alice"), MessageKind::Proposal);
        assert_eq!(classify("<bob> :D what a day"), MessageKind::Proposal);
        assert_eq!(classify("<bob> :Dx"), MessageKind::Proposal);
        assert_eq!(classify(""), MessageKind::Proposal);
    }

    #[test]
    fn test_author_of() {
        assert_eq!(author_of("<alice> hello"), Some("alice"));
        assert_eq!(author_of("* alice waves"), Some("alice"));
        assert_eq!(author_of("*** Joins: alice"), None);
        assert_eq!(author_of("plain"), None);
        assert_eq!(author_of("<broken"), None);
    }

    #[test]
    fn test_is_authored_by_folds_case() {
        assert!(is_authored_by("<Alice> hi", "alice"));
        assert!(is_authored_by("* ALICE waves", "alice"));
        assert!(!is_authored_by("<alicex> hi", "alice"));
    }
}
