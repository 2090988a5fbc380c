//! IRC adapter: line codec and TCP transport.

mod error;
mod message;
mod transport;

pub use error::IrcError;
pub use message::{IrcMessage, MAX_LINE_LEN};
pub use transport::{IrcConnection, IrcTransport, translate};
