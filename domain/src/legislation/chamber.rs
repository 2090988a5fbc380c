//! Per-channel legislation aggregate.

use chrono::{DateTime, Utc};

use super::engine::{DereferenceEngine, ScanOutcome};
use super::rules::LegislationRules;
use super::state::EngineState;
use crate::backlog::{Backlog, BacklogEntry};
use crate::core::error::DomainError;

/// One channel's backlog, engine state and rules.
///
/// Every line is taken through [`receive`](Self::receive) exactly once.
#[derive(Debug, Clone)]
pub struct Chamber {
    channel: String,
    backlog: Backlog,
    state: EngineState,
    rules: LegislationRules,
}

impl Chamber {
    pub fn new(channel: impl Into<String>, rules: LegislationRules) -> Self {
        Self {
            channel: channel.into(),
            backlog: Backlog::new(rules.backlog_capacity),
            state: EngineState::new(),
            rules,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn backlog(&self) -> &Backlog {
        &self.backlog
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn rules(&self) -> &LegislationRules {
        &self.rules
    }

    /// The entry currently accumulating votes, if it is still in the backlog
    pub fn active_proposal(&self) -> Option<&BacklogEntry> {
        self.state
            .active_proposal()
            .and_then(|index| self.backlog.at(index).ok())
    }

    /// Append a formatted line and run the dereferencing engine on it.
    pub fn receive_line(
        &mut self,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<ScanOutcome, DomainError> {
        self.receive(BacklogEntry::new(text, timestamp))
    }

    /// Append an entry and run the dereferencing engine on it.
    ///
    /// The resulting tally is recorded on the entry. On error the entry stays
    /// in the backlog with a zero tally and the engine state is unchanged.
    pub fn receive(&mut self, entry: BacklogEntry) -> Result<ScanOutcome, DomainError> {
        let evicted = self.backlog.append(entry);
        self.state.shift_for_eviction(evicted);

        let outcome =
            DereferenceEngine::new(&mut self.backlog, &mut self.state, &self.rules).process()?;

        if let Some(newest) = self.backlog.newest_index() {
            self.backlog
                .at_mut(newest)?
                .set_vote_count(outcome.votecount());
        }
        Ok(outcome)
    }

    /// Swap in a new rule set between messages.
    ///
    /// A smaller backlog capacity evicts the oldest entries right away.
    pub fn replace_rules(&mut self, rules: LegislationRules) {
        let evicted = self.backlog.set_capacity(rules.backlog_capacity);
        self.state.shift_for_eviction(evicted);
        self.rules = rules;
    }
}
