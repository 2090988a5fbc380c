//! Application layer for eunomia
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{BotParams, Identity};
pub use ports::{
    chat_transport::{ChatTransport, OutgoingMessage, TransportError},
    governance_logger::{GovernanceEvent, GovernanceLogger, NoGovernanceLogger},
    persistence::{ChannelLog, NoChannelLog, ProposalRecorder, RecordError},
    rules_source::{FixedRules, RulesSource, RulesSourceError},
};
pub use use_cases::bot_command::BotCommand;
pub use use_cases::monitor_channel::{ChamberStatus, ChannelMonitor, MonitorError};
pub use use_cases::run_bot::{RunBotError, RunBotUseCase, SessionEnd};
