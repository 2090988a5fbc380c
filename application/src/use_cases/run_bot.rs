//! Run Bot use case.
//!
//! Drives one connection: registration follow-up, channel events into the
//! [`ChannelMonitor`], operator commands, and orderly shutdown.
//!
//! The monitor outlives individual connections, so the backlog and the
//! engine state survive a reconnect.

use std::sync::Arc;

use crate::config::{BotParams, Identity};
use crate::ports::chat_transport::{ChatTransport, OutgoingMessage, TransportError};
use crate::ports::rules_source::RulesSource;
use crate::use_cases::bot_command::{BotCommand, addressed_to};
use crate::use_cases::monitor_channel::{ChannelMonitor, MonitorError};
use chrono::Utc;
use eunomia_domain::{ChatEvent, ScanOutcome, nick_eq};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Errors that end a session
#[derive(Error, Debug)]
pub enum RunBotError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Cancelled by the operator; do not reconnect
    Shutdown,
    /// The server closed the connection
    Disconnected,
}

/// The channel event adapter.
pub struct RunBotUseCase {
    params: BotParams,
    monitor: ChannelMonitor,
    rules_source: Arc<dyn RulesSource>,
    current_nick: String,
    log_open: bool,
}

impl RunBotUseCase {
    pub fn new(
        params: BotParams,
        monitor: ChannelMonitor,
        rules_source: Arc<dyn RulesSource>,
    ) -> Self {
        let current_nick = params.nick.clone();
        Self {
            params,
            monitor,
            rules_source,
            current_nick,
            log_open: false,
        }
    }

    pub fn monitor(&self) -> &ChannelMonitor {
        &self.monitor
    }

    /// Nickname currently held on the network
    pub fn current_nick(&self) -> &str {
        &self.current_nick
    }

    /// Process events until the connection ends or `cancel` fires.
    pub async fn run(
        &mut self,
        transport: &mut dyn ChatTransport,
        cancel: &CancellationToken,
    ) -> Result<SessionEnd, RunBotError> {
        self.current_nick = self.params.nick.clone();

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                next = transport.next_event() => Some(next),
            };

            let Some(next) = next else {
                self.adjourn(transport).await;
                return Ok(SessionEnd::Shutdown);
            };

            match next {
                Ok(Some(event)) => self.handle_event(transport, event).await?,
                Ok(None) => {
                    info!("Connection closed");
                    self.close_log();
                    return Ok(SessionEnd::Disconnected);
                }
                Err(e) => {
                    self.close_log();
                    return Err(e.into());
                }
            }
        }
    }

    async fn handle_event(
        &mut self,
        transport: &mut dyn ChatTransport,
        event: ChatEvent,
    ) -> Result<(), RunBotError> {
        match event {
            ChatEvent::Welcome => {
                info!("Registered as {}", self.current_nick);
                self.open_log();
                transport
                    .send(OutgoingMessage::Join {
                        channel: self.params.channel.clone(),
                    })
                    .await?;
                self.identify(transport).await?;
            }
            ChatEvent::NickInUse { attempted } => {
                let next = format!("{}_", attempted);
                warn!("Nickname {} is in use, trying {}", attempted, next);
                self.current_nick = next.clone();
                transport.send(OutgoingMessage::Nick { nick: next }).await?;
            }
            ChatEvent::NickChanged { old, new } => {
                if nick_eq(&old, &self.current_nick) {
                    info!("Nickname changed to {}", new);
                    self.current_nick = new;
                }
            }
            ChatEvent::VersionRequest { sender } => {
                debug!("CTCP VERSION from {}", sender);
                transport
                    .send(OutgoingMessage::CtcpReply {
                        target: sender,
                        command: "VERSION".to_string(),
                        text: self.params.version.clone(),
                    })
                    .await?;
            }
            ChatEvent::PrivateMessage { sender, text } => {
                if let Some(command) = BotCommand::parse(&text) {
                    self.run_command(transport, &sender, command).await?;
                }
            }
            event => {
                if !self.is_our_channel(&event) {
                    return Ok(());
                }
                let Some(line) = event.display_line() else {
                    return Ok(());
                };
                self.record_line(transport, &line).await?;

                if let ChatEvent::Message { text, .. } = &event
                    && let Some(command) =
                        addressed_to(text, &self.current_nick).and_then(BotCommand::parse)
                {
                    let channel = self.params.channel.clone();
                    self.run_command(transport, &channel, command).await?;
                }
            }
        }
        Ok(())
    }

    /// Quits carry no channel; with a single monitored channel they are
    /// recorded there.
    fn is_our_channel(&self, event: &ChatEvent) -> bool {
        match event {
            ChatEvent::Quit { .. } => true,
            other => other
                .channel()
                .is_some_and(|channel| channel.eq_ignore_ascii_case(&self.params.channel)),
        }
    }

    async fn record_line(
        &mut self,
        transport: &mut dyn ChatTransport,
        line: &str,
    ) -> Result<(), RunBotError> {
        let accepted = match self.monitor.on_message(line) {
            Ok(Some(ScanOutcome::Legislated { record, .. })) => Some(record.proposal),
            Ok(_) => None,
            Err(MonitorError::Persistence { proposal, source }) => {
                error!(
                    "Legislation of \"{}\" was not recorded: {}",
                    proposal, source
                );
                Some(proposal)
            }
            Err(e) => {
                error!("{}", e);
                None
            }
        };

        if self.params.announce
            && let Some(proposal) = accepted
        {
            transport
                .send(OutgoingMessage::privmsg(
                    &self.params.channel,
                    format!("Proposal accepted: {}", proposal),
                ))
                .await?;
        }
        Ok(())
    }

    async fn run_command(
        &mut self,
        transport: &mut dyn ChatTransport,
        reply_to: &str,
        command: BotCommand,
    ) -> Result<(), RunBotError> {
        let reply = match command {
            BotCommand::ReloadLegislation => match self.rules_source.load() {
                Ok(rules) => {
                    self.monitor.replace_rules(rules);
                    format!("Legislation reloaded: {}", rules)
                }
                Err(e) => {
                    warn!("Reload failed: {}", e);
                    format!("Reload failed: {}", e)
                }
            },
            BotCommand::Status => self.monitor.status().to_string(),
            BotCommand::Version => self.params.version.clone(),
            BotCommand::Unknown(word) => {
                warn!("Unknown command from {}: {}", reply_to, word);
                return Ok(());
            }
        };
        transport
            .send(OutgoingMessage::privmsg(reply_to, reply))
            .await?;
        Ok(())
    }

    async fn identify(&self, transport: &mut dyn ChatTransport) -> Result<(), RunBotError> {
        match &self.params.identity {
            Identity::None => {}
            Identity::NickServ { username, password } => {
                info!("Identifying to NickServ as {}", username);
                transport
                    .send(OutgoingMessage::privmsg(
                        "NickServ",
                        format!("identify {} {}", username, password),
                    ))
                    .await?;
            }
            Identity::Unsupported(method) => {
                error!("Unsupported identification method: {}", method);
            }
        }
        Ok(())
    }

    async fn adjourn(&mut self, transport: &mut dyn ChatTransport) {
        info!("Shutting down");
        self.close_log();
        let quit = OutgoingMessage::Quit {
            reason: self.params.quit_message.clone(),
        };
        if let Err(e) = transport.send(quit).await {
            warn!("Failed to send QUIT: {}", e);
        }
    }

    fn open_log(&mut self) {
        if !self.log_open {
            self.monitor.open_log(Utc::now());
            self.log_open = true;
        }
    }

    fn close_log(&mut self) {
        if self.log_open {
            self.monitor.close_log(Utc::now());
            self.log_open = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::rules_source::{FixedRules, RulesSourceError};
    use crate::use_cases::monitor_channel::tests::{MemoryChannelLog, MemoryRecorder};
    use async_trait::async_trait;
    use eunomia_domain::LegislationRules;
    use std::collections::VecDeque;

    /// Replays scripted events, then reports a clean close.
    struct ScriptedTransport {
        inbound: VecDeque<ChatEvent>,
        sent: Vec<OutgoingMessage>,
        hang: bool,
    }

    impl ScriptedTransport {
        fn new(events: Vec<ChatEvent>) -> Self {
            Self {
                inbound: events.into(),
                sent: Vec::new(),
                hang: false,
            }
        }

        /// Block forever once the script is exhausted
        fn hanging(mut self) -> Self {
            self.hang = true;
            self
        }

        fn privmsgs_to(&self, to: &str) -> Vec<&str> {
            self.sent
                .iter()
                .filter_map(|m| match m {
                    OutgoingMessage::Privmsg { target, text } if target == to => {
                        Some(text.as_str())
                    }
                    _ => None,
                })
                .collect()
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn next_event(&mut self) -> Result<Option<ChatEvent>, TransportError> {
            match self.inbound.pop_front() {
                Some(event) => Ok(Some(event)),
                None if self.hang => std::future::pending().await,
                None => Ok(None),
            }
        }

        async fn send(&mut self, message: OutgoingMessage) -> Result<(), TransportError> {
            self.sent.push(message);
            Ok(())
        }
    }

    struct BrokenRules;

    impl RulesSource for BrokenRules {
        fn load(&self) -> Result<LegislationRules, RulesSourceError> {
            Err(RulesSourceError::Invalid("vote_threshold must be at least 1".to_string()))
        }
    }

    fn say(sender: &str, text: &str) -> ChatEvent {
        ChatEvent::Message {
            channel: "#agora".to_string(),
            sender: sender.to_string(),
            text: text.to_string(),
        }
    }

    fn bot(params: BotParams, recorder: Arc<MemoryRecorder>) -> RunBotUseCase {
        let monitor = ChannelMonitor::new("#agora", LegislationRules::default(), recorder);
        RunBotUseCase::new(
            params,
            monitor,
            Arc::new(FixedRules(LegislationRules::new(2, 50, 25).unwrap())),
        )
    }

    #[tokio::test]
    async fn test_welcome_joins_and_identifies() {
        let params = BotParams::new("#agora", "eunomia").with_identity(Identity::NickServ {
            username: "eunomia".to_string(),
            password: "hunter2".to_string(),
        });
        let mut bot = bot(params, Arc::new(MemoryRecorder::default()));
        let mut transport = ScriptedTransport::new(vec![ChatEvent::Welcome]);

        let end = bot.run(&mut transport, &CancellationToken::new()).await.unwrap();

        assert_eq!(end, SessionEnd::Disconnected);
        assert_eq!(
            transport.sent,
            vec![
                OutgoingMessage::Join {
                    channel: "#agora".to_string()
                },
                OutgoingMessage::privmsg("NickServ", "identify eunomia hunter2"),
            ]
        );
    }

    #[tokio::test]
    async fn test_nick_in_use_appends_underscore() {
        let mut bot = bot(
            BotParams::new("#agora", "eunomia"),
            Arc::new(MemoryRecorder::default()),
        );
        let mut transport = ScriptedTransport::new(vec![
            ChatEvent::NickInUse {
                attempted: "eunomia".to_string(),
            },
            ChatEvent::NickInUse {
                attempted: "eunomia_".to_string(),
            },
            say("alice", "eunomia__: version"),
        ]);

        bot.run(&mut transport, &CancellationToken::new()).await.unwrap();

        assert_eq!(bot.current_nick(), "eunomia__");
        assert_eq!(
            transport.sent[1],
            OutgoingMessage::Nick {
                nick: "eunomia__".to_string()
            }
        );
        assert_eq!(transport.privmsgs_to("#agora").len(), 1);
    }

    #[tokio::test]
    async fn test_votes_legislate_and_announce() {
        let recorder = Arc::new(MemoryRecorder::default());
        let params = BotParams::new("#agora", "eunomia").with_announce(true);
        let mut bot = bot(params, recorder.clone());
        let mut transport = ScriptedTransport::new(vec![
            say("alice", "move the meeting to friday"),
            ChatEvent::Join {
                channel: "#agora".to_string(),
                nick: "dave".to_string(),
            },
            say("bob", ":D"),
            say("carol", ":D"),
            say("dave", ":D"),
            // Another channel never reaches the backlog
            ChatEvent::Message {
                channel: "#elsewhere".to_string(),
                sender: "mallory".to_string(),
                text: ":D".to_string(),
            },
        ]);

        bot.run(&mut transport, &CancellationToken::new()).await.unwrap();

        assert_eq!(recorder.count(), 1);
        assert_eq!(
            transport.privmsgs_to("#agora"),
            vec!["Proposal accepted: <alice> move the meeting to friday"]
        );
        assert_eq!(bot.monitor().chamber().backlog().len(), 5);
    }

    #[tokio::test]
    async fn test_persistence_failure_still_announces() {
        let params = BotParams::new("#agora", "eunomia").with_announce(true);
        let mut bot = bot(params, Arc::new(MemoryRecorder::failing()));
        let mut transport = ScriptedTransport::new(vec![
            say("alice", "adopt a code of conduct"),
            say("bob", ":D"),
            say("carol", ":D"),
            say("dave", ":D"),
            say("erin", ":D"),
        ]);

        bot.run(&mut transport, &CancellationToken::new()).await.unwrap();

        assert_eq!(transport.privmsgs_to("#agora").len(), 1);
    }

    #[tokio::test]
    async fn test_commands_in_channel_and_private() {
        let mut bot = bot(
            BotParams::new("#agora", "eunomia").with_version("eunomia test"),
            Arc::new(MemoryRecorder::default()),
        );
        let mut transport = ScriptedTransport::new(vec![
            say("alice", "shorter meetings"),
            say("bob", ":D"),
            say("alice", "eunomia: status"),
            ChatEvent::PrivateMessage {
                sender: "op".to_string(),
                text: "reload-legislation".to_string(),
            },
            ChatEvent::PrivateMessage {
                sender: "op".to_string(),
                text: "version".to_string(),
            },
            ChatEvent::PrivateMessage {
                sender: "op".to_string(),
                text: "teleport".to_string(),
            },
            ChatEvent::VersionRequest {
                sender: "carol".to_string(),
            },
        ]);

        bot.run(&mut transport, &CancellationToken::new()).await.unwrap();

        assert_eq!(
            transport.privmsgs_to("#agora"),
            vec!["1/3 votes for \"<alice> shorter meetings\", backlog 3/50"]
        );
        assert_eq!(
            transport.privmsgs_to("op"),
            vec![
                "Legislation reloaded: 2 votes, backlog 50, context 25",
                "eunomia test"
            ]
        );
        assert_eq!(bot.monitor().chamber().rules().vote_threshold, 2);
        assert!(transport.sent.contains(&OutgoingMessage::CtcpReply {
            target: "carol".to_string(),
            command: "VERSION".to_string(),
            text: "eunomia test".to_string(),
        }));
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_rules() {
        let monitor = ChannelMonitor::new(
            "#agora",
            LegislationRules::default(),
            Arc::new(MemoryRecorder::default()),
        );
        let mut bot = RunBotUseCase::new(
            BotParams::new("#agora", "eunomia"),
            monitor,
            Arc::new(BrokenRules),
        );
        let mut transport = ScriptedTransport::new(vec![say("op", "eunomia: reload-legislation")]);

        bot.run(&mut transport, &CancellationToken::new()).await.unwrap();

        assert_eq!(bot.monitor().chamber().rules().vote_threshold, 3);
        assert_eq!(
            transport.privmsgs_to("#agora"),
            vec!["Reload failed: Invalid rules: vote_threshold must be at least 1"]
        );
    }

    #[tokio::test]
    async fn test_cancel_writes_end_marker_and_quits() {
        let log = Arc::new(MemoryChannelLog::default());
        let monitor = ChannelMonitor::new(
            "#agora",
            LegislationRules::default(),
            Arc::new(MemoryRecorder::default()),
        )
        .with_channel_log(log.clone());
        let mut bot = RunBotUseCase::new(
            BotParams::new("#agora", "eunomia"),
            monitor,
            Arc::new(FixedRules(LegislationRules::default())),
        );
        let mut transport =
            ScriptedTransport::new(vec![ChatEvent::Welcome, say("alice", "hello")]).hanging();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let end = bot.run(&mut transport, &cancel).await.unwrap();
        handle.await.unwrap();

        assert_eq!(end, SessionEnd::Shutdown);
        assert!(matches!(
            transport.sent.last(),
            Some(OutgoingMessage::Quit { .. })
        ));
        assert_eq!(
            *log.lines.lock().unwrap(),
            vec!["--- log begin ---", "<alice> hello", "--- log end ---"]
        );
    }
}
