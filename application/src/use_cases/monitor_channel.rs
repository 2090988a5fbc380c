//! Channel monitor use case.
//!
//! The single entry point for formatted channel lines: each line is written
//! to the channel log, taken through the [`Chamber`], and any resulting
//! legislation record is persisted.
//!
//! Failure handling follows the engine's contract that nothing is fatal:
//!
//! - a vote that cannot be dereferenced is logged and its effect dropped
//! - a failed channel log write is logged and ignored
//! - a failed proposal record write is surfaced to the caller, after the
//!   engine has already reset so the proposal cannot be legislated twice

use std::fmt;
use std::sync::Arc;

use crate::ports::governance_logger::{GovernanceEvent, GovernanceLogger, NoGovernanceLogger};
use crate::ports::persistence::{ChannelLog, NoChannelLog, ProposalRecorder, RecordError};
use chrono::{DateTime, Utc};
use eunomia_domain::core::string::excerpt;
use eunomia_domain::{Chamber, DomainError, LegislationRules, ScanOutcome};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors surfaced by [`ChannelMonitor::on_message`].
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Legislation happened but its record could not be written
    #[error("Proposal \"{proposal}\" was legislated but not recorded: {source}")]
    Persistence {
        proposal: String,
        #[source]
        source: RecordError,
    },

    #[error("Engine error: {0}")]
    Engine(DomainError),
}

/// Snapshot for the `status` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChamberStatus {
    pub votecount: u32,
    pub vote_threshold: u32,
    pub active_proposal: Option<String>,
    pub backlog_len: usize,
    pub backlog_capacity: usize,
}

impl fmt::Display for ChamberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.active_proposal {
            Some(text) => write!(
                f,
                "{}/{} votes for \"{}\"",
                self.votecount,
                self.vote_threshold,
                excerpt(text, 80)
            )?,
            None => write!(f, "no active proposal")?,
        }
        write!(
            f,
            ", backlog {}/{}",
            self.backlog_len, self.backlog_capacity
        )
    }
}

/// Owns one channel's [`Chamber`] and its persistence collaborators.
pub struct ChannelMonitor {
    chamber: Chamber,
    recorder: Arc<dyn ProposalRecorder>,
    channel_log: Arc<dyn ChannelLog>,
    events: Arc<dyn GovernanceLogger>,
}

impl ChannelMonitor {
    pub fn new(
        channel: impl Into<String>,
        rules: LegislationRules,
        recorder: Arc<dyn ProposalRecorder>,
    ) -> Self {
        Self {
            chamber: Chamber::new(channel, rules),
            recorder,
            channel_log: Arc::new(NoChannelLog),
            events: Arc::new(NoGovernanceLogger),
        }
    }

    pub fn with_channel_log(mut self, channel_log: Arc<dyn ChannelLog>) -> Self {
        self.channel_log = channel_log;
        self
    }

    pub fn with_governance_logger(mut self, events: Arc<dyn GovernanceLogger>) -> Self {
        self.events = events;
        self
    }

    pub fn channel(&self) -> &str {
        self.chamber.channel()
    }

    pub fn chamber(&self) -> &Chamber {
        &self.chamber
    }

    /// Process one formatted line stamped with the current time.
    pub fn on_message(&mut self, text: &str) -> Result<Option<ScanOutcome>, MonitorError> {
        self.on_message_at(text, Utc::now())
    }

    /// Process one formatted line.
    ///
    /// Returns `Ok(None)` when the line's vote could not be dereferenced.
    pub fn on_message_at(
        &mut self,
        text: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<ScanOutcome>, MonitorError> {
        let channel = self.chamber.channel().to_string();
        if let Err(e) = self.channel_log.append_line(&channel, text, at) {
            warn!("Channel log write failed: {}", e);
        }

        let outcome = match self.chamber.receive_line(text, at) {
            Ok(outcome) => outcome,
            Err(e) if e.is_dereference_failure() => {
                warn!("Dropping vote \"{}\": {}", excerpt(text, 80), e);
                self.events.log(GovernanceEvent::new(
                    "dereference_failed",
                    json!({ "channel": channel, "line": text, "error": e.to_string() }),
                ));
                return Ok(None);
            }
            Err(e) => return Err(MonitorError::Engine(e)),
        };

        match &outcome {
            ScanOutcome::Legislated { record, votes } => {
                info!(
                    "Legislated \"{}\" with {} votes",
                    excerpt(&record.proposal, 80),
                    votes
                );
                self.events.log(GovernanceEvent::new(
                    "proposal_legislated",
                    json!({
                        "channel": channel,
                        "proposal": record.proposal,
                        "votes": votes,
                        "context_lines": record.context.len(),
                    }),
                ));
                if let Err(source) =
                    self.recorder
                        .append_proposal_record(&channel, &record.lines(), at)
                {
                    error!("Failed to record legislation: {}", source);
                    self.events.log(GovernanceEvent::new(
                        "persistence_failed",
                        json!({
                            "channel": channel,
                            "proposal": record.proposal,
                            "error": source.to_string(),
                        }),
                    ));
                    return Err(MonitorError::Persistence {
                        proposal: record.proposal.clone(),
                        source,
                    });
                }
            }
            ScanOutcome::Filibustered => {
                debug!("Filibuster: {}", excerpt(text, 80));
                self.events.log(GovernanceEvent::new(
                    "filibuster",
                    json!({ "channel": channel, "line": text }),
                ));
            }
            ScanOutcome::Tally {
                votecount,
                active_proposal,
            } => {
                debug!("Tally {} for position {:?}", votecount, active_proposal);
            }
            ScanOutcome::Idle | ScanOutcome::Exhausted | ScanOutcome::Spent => {}
        }

        Ok(Some(outcome))
    }

    /// Swap in new rules between messages.
    pub fn replace_rules(&mut self, rules: LegislationRules) {
        info!("Legislation rules: {}", rules);
        self.chamber.replace_rules(rules);
        self.events.log(GovernanceEvent::new(
            "rules_reloaded",
            json!({
                "channel": self.chamber.channel(),
                "vote_threshold": rules.vote_threshold,
                "backlog_capacity": rules.backlog_capacity,
                "context_window": rules.context_window,
            }),
        ));
    }

    pub fn status(&self) -> ChamberStatus {
        let backlog = self.chamber.backlog();
        ChamberStatus {
            votecount: self.chamber.state().votecount(),
            vote_threshold: self.chamber.rules().vote_threshold,
            active_proposal: self
                .chamber
                .active_proposal()
                .map(|entry| entry.text().to_string()),
            backlog_len: backlog.len(),
            backlog_capacity: backlog.capacity(),
        }
    }

    /// Write the begin marker of a logging session.
    pub fn open_log(&self, at: DateTime<Utc>) {
        if let Err(e) = self.channel_log.begin(self.chamber.channel(), at) {
            warn!("Channel log write failed: {}", e);
        }
    }

    /// Write the end marker of a logging session.
    pub fn close_log(&self, at: DateTime<Utc>) {
        if let Err(e) = self.channel_log.end(self.chamber.channel(), at) {
            warn!("Channel log write failed: {}", e);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;
    use eunomia_domain::ProposalRecord;
    use std::sync::Mutex;

    /// Records in memory; optionally fails every write.
    #[derive(Default)]
    pub(crate) struct MemoryRecorder {
        pub(crate) records: Mutex<Vec<(String, Vec<String>)>>,
        pub(crate) fail: bool,
    }

    impl MemoryRecorder {
        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub(crate) fn count(&self) -> usize {
            self.records.lock().unwrap().len()
        }
    }

    impl ProposalRecorder for MemoryRecorder {
        fn append_proposal_record(
            &self,
            channel: &str,
            lines: &[String],
            _at: DateTime<Utc>,
        ) -> Result<(), RecordError> {
            if self.fail {
                return Err(RecordError::Io {
                    path: "proposal.log".to_string(),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.records
                .lock()
                .unwrap()
                .push((channel.to_string(), lines.to_vec()));
            Ok(())
        }
    }

    #[derive(Default)]
    pub(crate) struct MemoryChannelLog {
        pub(crate) lines: Mutex<Vec<String>>,
    }

    impl ChannelLog for MemoryChannelLog {
        fn append_line(
            &self,
            _channel: &str,
            line: &str,
            _at: DateTime<Utc>,
        ) -> Result<(), RecordError> {
            self.lines.lock().unwrap().push(line.to_string());
            Ok(())
        }

        fn begin(&self, _channel: &str, _at: DateTime<Utc>) -> Result<(), RecordError> {
            self.lines.lock().unwrap().push("--- log begin ---".to_string());
            Ok(())
        }

        fn end(&self, _channel: &str, _at: DateTime<Utc>) -> Result<(), RecordError> {
            self.lines.lock().unwrap().push("--- log end ---".to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    pub(crate) struct CollectingLogger {
        pub(crate) events: Mutex<Vec<&'static str>>,
    }

    impl GovernanceLogger for CollectingLogger {
        fn log(&self, event: GovernanceEvent) {
            self.events.lock().unwrap().push(event.event_type);
        }
    }

    fn at(second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 20, 15, second).unwrap()
    }

    #[test]
    fn test_legislation_is_recorded_once() {
        let recorder = Arc::new(MemoryRecorder::default());
        let mut monitor =
            ChannelMonitor::new("#agora", LegislationRules::default(), recorder.clone());

        monitor.on_message_at("<alice> ban tabs", at(0)).unwrap();
        for (i, voter) in ["bob", "carol", "dave"].iter().enumerate() {
            let line = format!("<{}> :D", voter);
            monitor.on_message_at(&line, at(i as u32 + 1)).unwrap();
        }
        monitor.on_message_at("<erin> :D", at(10)).unwrap();

        let records = recorder.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        let (channel, lines) = &records[0];
        assert_eq!(channel, "#agora");
        assert_eq!(lines[0], "[<alice> ban tabs]");
        assert_eq!(lines[1], "20:15:00 <alice> ban tabs");
        assert_eq!(lines.last().unwrap(), "");

        let parsed = ProposalRecord::parse(&lines.join("\n")).unwrap();
        assert_eq!(parsed.proposal, "<alice> ban tabs");
    }

    #[test]
    fn test_persistence_failure_still_resets_engine() {
        let recorder = Arc::new(MemoryRecorder::failing());
        let events = Arc::new(CollectingLogger::default());
        let mut monitor = ChannelMonitor::new("#agora", LegislationRules::default(), recorder)
            .with_governance_logger(events.clone());

        monitor.on_message_at("<alice> ban tabs", at(0)).unwrap();
        monitor.on_message_at("<bob> :D", at(1)).unwrap();
        monitor.on_message_at("<carol> :D", at(2)).unwrap();
        let err = monitor.on_message_at("<dave> :D", at(3)).unwrap_err();

        assert!(matches!(err, MonitorError::Persistence { ref proposal, .. } if proposal == "<alice> ban tabs"));
        assert_eq!(monitor.chamber().state().votecount(), 0);
        assert_eq!(monitor.chamber().state().active_proposal(), None);

        // The same proposal cannot be legislated again
        let outcome = monitor.on_message_at("<erin> :D", at(4)).unwrap();
        assert!(!matches!(outcome, Some(ScanOutcome::Legislated { .. })));

        let logged = events.events.lock().unwrap();
        assert!(logged.contains(&"proposal_legislated"));
        assert!(logged.contains(&"persistence_failed"));
    }

    #[test]
    fn test_dereference_failure_is_dropped() {
        let recorder = Arc::new(MemoryRecorder::default());
        let events = Arc::new(CollectingLogger::default());
        let mut monitor = ChannelMonitor::new("#agora", LegislationRules::default(), recorder)
            .with_governance_logger(events.clone());

        monitor.on_message_at("<alice> ban tabs", at(0)).unwrap();
        monitor.on_message_at("<bob> :D", at(1)).unwrap();
        let outcome = monitor.on_message_at("<carol> :D~5", at(2)).unwrap();

        assert_eq!(outcome, None);
        assert_eq!(monitor.chamber().state().votecount(), 1);
        assert_eq!(*events.events.lock().unwrap(), vec!["dereference_failed"]);
    }

    #[test]
    fn test_every_line_reaches_channel_log() {
        let log = Arc::new(MemoryChannelLog::default());
        let mut monitor = ChannelMonitor::new(
            "#agora",
            LegislationRules::default(),
            Arc::new(MemoryRecorder::default()),
        )
        .with_channel_log(log.clone());

        monitor.open_log(at(0));
        monitor.on_message_at("*** Joins: bob", at(1)).unwrap();
        monitor.on_message_at("<bob> hi", at(2)).unwrap();
        monitor.close_log(at(3));

        assert_eq!(
            *log.lines.lock().unwrap(),
            vec!["--- log begin ---", "*** Joins: bob", "<bob> hi", "--- log end ---"]
        );
    }

    #[test]
    fn test_status_and_reload() {
        let events = Arc::new(CollectingLogger::default());
        let mut monitor = ChannelMonitor::new(
            "#agora",
            LegislationRules::default(),
            Arc::new(MemoryRecorder::default()),
        )
        .with_governance_logger(events.clone());

        assert_eq!(monitor.status().to_string(), "no active proposal, backlog 0/50");

        monitor.on_message_at("<alice> ban tabs", at(0)).unwrap();
        monitor.on_message_at("<bob> :D", at(1)).unwrap();
        assert_eq!(
            monitor.status().to_string(),
            "1/3 votes for \"<alice> ban tabs\", backlog 2/50"
        );

        monitor.replace_rules(LegislationRules::new(2, 10, 5).unwrap());
        assert_eq!(monitor.status().vote_threshold, 2);
        assert_eq!(*events.events.lock().unwrap(), vec!["rules_reloaded"]);

        let outcome = monitor.on_message_at("<carol> :D", at(2)).unwrap();
        assert!(matches!(outcome, Some(ScanOutcome::Legislated { votes: 2, .. })));
    }
}
