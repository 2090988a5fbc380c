//! Acceptance of a proposal that reached the vote threshold.

use super::record::{ContextLine, ProposalRecord};
use super::state::EngineState;
use crate::backlog::Backlog;
use crate::core::error::DomainError;

/// Packages a legislated proposal with its context window.
///
/// Does not check the tally; the engine decides when to call it.
#[derive(Debug, Clone, Copy)]
pub struct Legislator {
    context_window: usize,
}

impl Legislator {
    pub fn new(context_window: usize) -> Self {
        Self { context_window }
    }

    /// Mark the entry at `index` legislated and build its record.
    ///
    /// The engine state is reset before anything else so that a failure here
    /// or in persistence never leaves a tally that could legislate the same
    /// proposal twice.
    pub fn legislate(
        &self,
        backlog: &mut Backlog,
        state: &mut EngineState,
        index: usize,
    ) -> Result<ProposalRecord, DomainError> {
        state.reset();

        let context = backlog
            .slice(index, self.context_window)?
            .into_iter()
            .map(ContextLine::from)
            .collect();

        let entry = backlog.at_mut(index)?;
        entry.mark_legislated();

        Ok(ProposalRecord::new(entry.text(), context))
    }
}
