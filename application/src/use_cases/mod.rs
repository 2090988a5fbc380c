//! Use cases
//!
//! - [`monitor_channel`]: formatted lines into the legislation engine
//! - [`run_bot`]: the channel event adapter loop
//! - [`bot_command`]: operator command parsing

pub mod bot_command;
pub mod monitor_channel;
pub mod run_bot;
