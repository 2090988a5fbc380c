//! Chat transport port
//!
//! Defines the interface between the bot loop and a chat network connection.

use async_trait::async_trait;
use eunomia_domain::ChatEvent;
use thiserror::Error;

/// Errors that can occur on a chat connection
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("Connection closed by server")]
    Closed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A message the bot sends to the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutgoingMessage {
    Join { channel: String },
    Privmsg { target: String, text: String },
    /// CTCP reply, sent as a NOTICE
    CtcpReply {
        target: String,
        command: String,
        text: String,
    },
    Nick { nick: String },
    Quit { reason: String },
}

impl OutgoingMessage {
    pub fn privmsg(target: impl Into<String>, text: impl Into<String>) -> Self {
        OutgoingMessage::Privmsg {
            target: target.into(),
            text: text.into(),
        }
    }
}

/// One live connection to a chat network.
///
/// Implementations perform registration and keep-alive themselves; the bot
/// loop only sees [`ChatEvent`]s.
#[async_trait]
pub trait ChatTransport: Send {
    /// Wait for the next event relevant to the bot.
    ///
    /// Returns `Ok(None)` when the connection ends cleanly.
    async fn next_event(&mut self) -> Result<Option<ChatEvent>, TransportError>;

    /// Send one message.
    async fn send(&mut self, message: OutgoingMessage) -> Result<(), TransportError>;
}
