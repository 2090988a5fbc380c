//! Domain layer for eunomia
//!
//! This crate contains the governance rules of a channel: how lines are
//! classified, how votes are dereferenced back to proposals, and when a
//! proposal becomes legislation. It has no dependencies on infrastructure
//! or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Backlog
//!
//! A bounded window of the most recent channel lines, oldest first. Every
//! line carries the vote count the engine recorded for it.
//!
//! ## Dereferencing
//!
//! Votes point backward. `:D` supports the line above it, `:D^^` skips
//! lines, `nick: :D` supports the most recent proposal by `nick`. Votes for
//! votes are followed until a proposal is reached.
//!
//! ## Legislation
//!
//! When a proposal collects enough votes it is legislated exactly once and
//! emitted as a [`ProposalRecord`] with its surrounding context.

pub mod backlog;
pub mod chat;
pub mod classify;
pub mod config;
pub mod core;
pub mod legislation;

// Re-export commonly used types
pub use backlog::{Backlog, BacklogEntry, DEFAULT_BACKLOG_CAPACITY};
pub use chat::ChatEvent;
pub use classify::{MessageKind, VoteSpec, author_of, classify};
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::{error::DomainError, nick::nick_eq};
pub use legislation::{
    Chamber, ContextLine, DereferenceEngine, EngineState, LegislationRules, Legislator,
    ProposalRecord, RecordParseError, ScanOutcome,
};
