//! Vote dereferencing and legislation
//!
//! ```text
//! new line ──► Backlog::append ──► DereferenceEngine::process ──► Legislator::legislate
//!                    │                      │                            │
//!                    └─ eviction shifts ────┘                            └─► ProposalRecord
//!                       EngineState                                         (persisted by caller)
//! ```
//!
//! [`Chamber`] bundles one channel's backlog, engine state and rules.

pub mod chamber;
pub mod engine;
pub mod legislator;
pub mod record;
pub mod rules;
pub mod state;

pub use chamber::Chamber;
pub use engine::{DereferenceEngine, ScanOutcome};
pub use legislator::Legislator;
pub use record::{ContextLine, ProposalRecord, RecordParseError};
pub use rules::LegislationRules;
pub use state::EngineState;
