//! Error types for the IRC adapter

use eunomia_application::TransportError;
use thiserror::Error;

/// Result type alias for IRC operations
pub type Result<T> = std::result::Result<T, IrcError>;

/// Errors that can occur on an IRC connection
#[derive(Error, Debug)]
pub enum IrcError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse line: {error}\nRaw line: {raw}")]
    ParseError { error: String, raw: String },

    #[error("Timed out connecting to {0}")]
    ConnectTimeout(String),

    #[error("Server closed the link: {0}")]
    ServerError(String),
}

impl From<IrcError> for TransportError {
    fn from(e: IrcError) -> Self {
        match e {
            IrcError::Io(e) => TransportError::Io(e),
            IrcError::ParseError { .. } => TransportError::ProtocolError(e.to_string()),
            IrcError::ConnectTimeout(_) => TransportError::ConnectionError(e.to_string()),
            IrcError::ServerError(_) => TransportError::Closed,
        }
    }
}
