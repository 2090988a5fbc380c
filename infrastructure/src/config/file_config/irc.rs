//! IRC connection configuration from TOML (`[irc]` section)

use serde::{Deserialize, Serialize};

/// Raw IRC configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileIrcConfig {
    pub server: String,
    pub port: u16,
    /// The one channel the bot governs
    pub channel: String,
    pub nick: String,
    pub realname: String,
    /// Seconds to wait before reconnecting after the connection drops
    pub reconnect_delay_seconds: u64,
}

impl Default for FileIrcConfig {
    fn default() -> Self {
        Self {
            server: "irc.freenode.net".to_string(),
            port: 6667,
            channel: "#eunomia_default".to_string(),
            nick: "eunomia".to_string(),
            realname: "eunomia".to_string(),
            reconnect_delay_seconds: 30,
        }
    }
}
