//! Vote dereferencing engine.
//!
//! Each new backlog line triggers one backward scan starting at the newest
//! entry. The scan recounts the chain of implicit votes above the proposal
//! they point at, so the tally is rebuilt from the backlog on every message
//! rather than incremented blindly.
//!
//! Scan rules, applied at each position:
//!
//! - ignored lines are stepped over without effect
//! - a filibuster resets the tally and ends the scan
//! - a proposal with no votes above it is ordinary chatter and leaves the
//!   state untouched
//! - a proposal reached through votes ends the scan and becomes the active
//!   proposal; it is legislated if those votes reach the threshold
//! - an implicit vote counts one and moves to its target (`N + 1` visible
//!   lines up; the nearest one for a bare `:D`)
//! - an explicit vote ends the scan wherever it is met, whether it is the new
//!   line or the end of a chain of implicit votes. It resolves to the `N`-th
//!   message the named nick wrote at or before the vote. The new line adds
//!   one to the tally of the active proposal when that is the target; any
//!   other target becomes the active proposal with a fresh tally of one.
//!
//! Walking off the start of the backlog discards the chain.
//!
//! Runs of plain `:D` always attach to whatever stands directly above them,
//! so interleaved proposals voted with bare `:D` can be misattributed.

use serde::Serialize;

use super::legislator::Legislator;
use super::record::ProposalRecord;
use super::rules::LegislationRules;
use super::state::EngineState;
use crate::backlog::Backlog;
use crate::classify::MessageKind;
use crate::classify::kind::is_authored_by;
use crate::core::error::DomainError;

/// Result of processing one new backlog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// A line that votes on nothing; the pending tally is kept
    Idle,
    /// The chain resolved; `votecount` votes stand for `active_proposal`
    Tally {
        votecount: u32,
        active_proposal: Option<usize>,
    },
    /// A filibuster reset the tally
    Filibustered,
    /// The scan ran off the start of the backlog without resolving
    Exhausted,
    /// The chain points at a proposal that was already legislated or evicted
    Spent,
    /// The threshold was reached
    Legislated { record: ProposalRecord, votes: u32 },
}

impl ScanOutcome {
    /// Tally to record on the processed entry
    pub fn votecount(&self) -> u32 {
        match self {
            ScanOutcome::Tally { votecount, .. } => *votecount,
            ScanOutcome::Legislated { votes, .. } => *votes,
            _ => 0,
        }
    }

    pub fn record(&self) -> Option<&ProposalRecord> {
        match self {
            ScanOutcome::Legislated { record, .. } => Some(record),
            _ => None,
        }
    }
}

/// Backward-scanning resolver over one channel's backlog.
pub struct DereferenceEngine<'a> {
    backlog: &'a mut Backlog,
    state: &'a mut EngineState,
    rules: &'a LegislationRules,
}

impl<'a> DereferenceEngine<'a> {
    pub fn new(
        backlog: &'a mut Backlog,
        state: &'a mut EngineState,
        rules: &'a LegislationRules,
    ) -> Self {
        Self {
            backlog,
            state,
            rules,
        }
    }

    /// Process the newest backlog entry.
    ///
    /// On error the engine state is left untouched.
    pub fn process(&mut self) -> Result<ScanOutcome, DomainError> {
        let Some(start) = self.backlog.newest_index() else {
            return Ok(ScanOutcome::Exhausted);
        };

        let mut pos = start;
        let mut walked: u32 = 0;

        loop {
            let kind = self.backlog.at(pos)?.kind();
            match kind {
                MessageKind::Ignored => match pos.checked_sub(1) {
                    Some(prev) => pos = prev,
                    None => break,
                },
                MessageKind::Filibuster => {
                    self.state.reset_tally();
                    return Ok(ScanOutcome::Filibustered);
                }
                MessageKind::Proposal => return self.resolve_proposal(pos, walked),
                MessageKind::Vote(spec) => match spec.target_nick {
                    None => {
                        walked = walked.saturating_add(1);
                        if spec.back_reference == 0 {
                            match pos.checked_sub(1) {
                                Some(prev) => pos = prev,
                                None => break,
                            }
                        } else {
                            pos = self.step_back(pos, spec.back_reference)?;
                        }
                    }
                    Some(nick) => return self.resolve_explicit(pos, &nick, spec.back_reference),
                },
            }
        }

        self.state.reset_tally();
        Ok(ScanOutcome::Exhausted)
    }

    fn resolve_proposal(&mut self, pos: usize, walked: u32) -> Result<ScanOutcome, DomainError> {
        if walked == 0 {
            return Ok(ScanOutcome::Idle);
        }
        if !self.backlog.at(pos)?.can_legislate() {
            self.state.reset_tally();
            return Ok(ScanOutcome::Spent);
        }
        self.state.set_active_proposal(pos);
        self.settle(pos, walked)
    }

    /// Resolve the explicit vote at `pos` to the message it names.
    fn resolve_explicit(
        &mut self,
        pos: usize,
        nick: &str,
        back_reference: usize,
    ) -> Result<ScanOutcome, DomainError> {
        let target = self.find_authored(pos, nick, back_reference)?;
        if !self.backlog.at(target)?.can_legislate() {
            self.state.reset_tally();
            return Ok(ScanOutcome::Spent);
        }

        let votecount = if self.state.active_proposal() == Some(target) {
            self.state.votecount().saturating_add(1)
        } else {
            self.state.set_active_proposal(target);
            1
        };
        self.settle(target, votecount)
    }

    /// Store the tally for `target` and legislate if it is high enough.
    fn settle(&mut self, target: usize, votecount: u32) -> Result<ScanOutcome, DomainError> {
        if self.rules.is_reached(votecount) {
            let record = Legislator::new(self.rules.context_window).legislate(
                self.backlog,
                self.state,
                target,
            )?;
            return Ok(ScanOutcome::Legislated {
                record,
                votes: votecount,
            });
        }
        self.state.set_votecount(votecount);
        Ok(ScanOutcome::Tally {
            votecount,
            active_proposal: self.state.active_proposal(),
        })
    }

    /// Position `skip + 1` visible lines above `from`, ignoring join/part/quit.
    fn step_back(&self, from: usize, skip: usize) -> Result<usize, DomainError> {
        let out_of_range = DomainError::DereferenceOutOfRange {
            position: from,
            back_reference: skip,
        };
        let mut remaining = skip;
        let mut pos = from;
        loop {
            pos = pos.checked_sub(1).ok_or_else(|| out_of_range.clone())?;
            if self.backlog.at(pos)?.kind().is_ignored() {
                continue;
            }
            if remaining == 0 {
                return Ok(pos);
            }
            remaining -= 1;
        }
    }

    /// The `back_reference`-th newest eligible message written by `nick`,
    /// counting from `from` towards the start of the backlog.
    fn find_authored(
        &self,
        from: usize,
        nick: &str,
        back_reference: usize,
    ) -> Result<usize, DomainError> {
        self.backlog
            .iter_rev()
            .skip_while(|(index, _)| *index > from)
            .filter(|(_, entry)| entry.is_eligible() && is_authored_by(entry.text(), nick))
            .nth(back_reference)
            .map(|(index, _)| index)
            .ok_or_else(|| DomainError::UnknownAuthor {
                nick: nick.to_string(),
                back_reference,
            })
    }
}
