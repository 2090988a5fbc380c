//! Running tally for one channel.

use serde::{Deserialize, Serialize};

/// The dereferencing engine's mutable state.
///
/// One instance per monitored channel; reset after every legislation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    votecount: u32,
    active_proposal: Option<usize>,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn votecount(&self) -> u32 {
        self.votecount
    }

    /// Backlog position of the proposal accumulating votes
    pub fn active_proposal(&self) -> Option<usize> {
        self.active_proposal
    }

    pub(crate) fn set_votecount(&mut self, votecount: u32) {
        self.votecount = votecount;
    }

    pub(crate) fn set_active_proposal(&mut self, index: usize) {
        self.active_proposal = Some(index);
    }

    pub(crate) fn reset_tally(&mut self) {
        self.votecount = 0;
    }

    /// Back to `votecount = 0, active_proposal = none`
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Keep `active_proposal` pointing at the same entry after `evicted`
    /// head entries were dropped from the backlog. Clears it if the entry
    /// itself was evicted.
    pub fn shift_for_eviction(&mut self, evicted: usize) {
        if evicted == 0 {
            return;
        }
        self.active_proposal = self
            .active_proposal
            .and_then(|index| index.checked_sub(evicted));
    }
}
