//! Infrastructure layer for eunomia
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod irc;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigRulesSource, ConfigValidationError, FileConfig, FileIdentConfig,
    FileIrcConfig, FileLegislationConfig, FileLoggingConfig,
};
pub use irc::{IrcConnection, IrcError, IrcTransport};
pub use logging::{ChannelFileLog, JsonlGovernanceLogger, ProposalFileLog};
