//! Application-level configuration.
//!
//! - [`BotParams`]: channel, nickname, identification and reply settings

pub mod bot_params;

pub use bot_params::{BotParams, Identity};
