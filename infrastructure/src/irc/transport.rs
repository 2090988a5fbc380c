//! IRC connection implementing the [`ChatTransport`] port.
//!
//! Registration (`NICK`/`USER`) is sent on connect and `PING` is answered
//! inline; everything else is translated into [`ChatEvent`]s. Lines are
//! decoded lossily since channels are not guaranteed to be UTF-8.

use super::error::{IrcError, Result};
use super::message::{IrcMessage, ctcp, is_channel, parse_ctcp};
use crate::config::FileIrcConfig;
use async_trait::async_trait;
use eunomia_application::{ChatTransport, OutgoingMessage, TransportError};
use eunomia_domain::ChatEvent;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tracing::{debug, info, trace, warn};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// A live IRC connection over TCP
pub type IrcConnection = IrcTransport<OwnedReadHalf, OwnedWriteHalf>;

/// Line-oriented IRC session over any byte stream.
pub struct IrcTransport<R, W> {
    reader: BufReader<R>,
    writer: BufWriter<W>,
    buffer: Vec<u8>,
}

impl IrcConnection {
    /// Connect and send registration.
    pub async fn connect(config: &FileIrcConfig) -> Result<Self> {
        let address = format!("{}:{}", config.server, config.port);
        info!("Connecting to {}", address);

        let stream = tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(&address))
            .await
            .map_err(|_| IrcError::ConnectTimeout(address.clone()))??;
        let (read_half, write_half) = stream.into_split();

        let mut transport = Self::new(read_half, write_half);
        transport.register(&config.nick, &config.realname).await?;
        Ok(transport)
    }
}

impl<R, W> IrcTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer: BufWriter::new(writer),
            buffer: Vec::new(),
        }
    }

    pub async fn register(&mut self, nick: &str, realname: &str) -> Result<()> {
        self.write(&IrcMessage::new("NICK", vec![nick.to_string()]))
            .await?;
        self.write(&IrcMessage::new(
            "USER",
            vec![
                nick.to_string(),
                "0".to_string(),
                "*".to_string(),
                realname.to_string(),
            ],
        ))
        .await
    }

    async fn write(&mut self, message: &IrcMessage) -> Result<()> {
        let line = message.to_line();
        trace!("-> {}", line);
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Next raw line, `None` at end of stream.
    async fn read_line(&mut self) -> Result<Option<String>> {
        self.buffer.clear();
        let read = self.reader.read_until(b'\n', &mut self.buffer).await?;
        if read == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&self.buffer);
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    async fn read_event(&mut self) -> Result<Option<ChatEvent>> {
        loop {
            let Some(line) = self.read_line().await? else {
                return Ok(None);
            };
            if line.is_empty() {
                continue;
            }
            trace!("<- {}", line);

            let message = match IrcMessage::parse(&line) {
                Ok(message) => message,
                Err(e) => {
                    warn!("{}", e);
                    continue;
                }
            };

            match message.command.as_str() {
                "PING" => {
                    let token = message.params.clone();
                    self.write(&IrcMessage::new("PONG", token)).await?;
                }
                "ERROR" => {
                    let reason = message.param(0).unwrap_or_default().to_string();
                    return Err(IrcError::ServerError(reason));
                }
                _ => {
                    if let Some(event) = translate(&message) {
                        return Ok(Some(event));
                    }
                }
            }
        }
    }
}

/// Map a protocol message to the event the bot cares about.
pub fn translate(message: &IrcMessage) -> Option<ChatEvent> {
    let source = || message.source_nick().unwrap_or_default().to_string();
    let param = |index: usize| message.param(index).map(str::to_string);
    let optional = |index: usize| param(index).filter(|s| !s.is_empty());

    let event = match message.command.as_str() {
        "001" => ChatEvent::Welcome,
        "433" => ChatEvent::NickInUse {
            attempted: param(1)?,
        },
        "NICK" => ChatEvent::NickChanged {
            old: source(),
            new: param(0)?,
        },
        "PRIVMSG" => {
            let target = param(0)?;
            let text = param(1)?;
            if let Some((command, args)) = parse_ctcp(&text) {
                return match command.to_ascii_uppercase().as_str() {
                    "ACTION" if is_channel(&target) => Some(ChatEvent::Action {
                        channel: target,
                        sender: source(),
                        text: args.to_string(),
                    }),
                    "VERSION" => Some(ChatEvent::VersionRequest { sender: source() }),
                    other => {
                        debug!("Ignoring CTCP {} from {}", other, source());
                        None
                    }
                };
            }
            if is_channel(&target) {
                ChatEvent::Message {
                    channel: target,
                    sender: source(),
                    text,
                }
            } else {
                ChatEvent::PrivateMessage {
                    sender: source(),
                    text,
                }
            }
        }
        "NOTICE" => {
            let target = param(0)?;
            if !is_channel(&target) {
                return None;
            }
            ChatEvent::Notice {
                target,
                sender: source(),
                text: param(1)?,
            }
        }
        "JOIN" => ChatEvent::Join {
            channel: param(0)?,
            nick: source(),
        },
        "PART" => ChatEvent::Part {
            channel: param(0)?,
            nick: source(),
            reason: optional(1),
        },
        "QUIT" => ChatEvent::Quit {
            nick: source(),
            reason: optional(0),
        },
        "KICK" => ChatEvent::Kick {
            channel: param(0)?,
            kicker: source(),
            kickee: param(1)?,
            reason: optional(2),
        },
        "MODE" => {
            let change = message.params.get(1..)?.join(" ");
            if change.is_empty() {
                return None;
            }
            ChatEvent::Mode {
                target: param(0)?,
                setter: source(),
                change,
            }
        }
        "TOPIC" => ChatEvent::Topic {
            channel: param(0)?,
            setter: source(),
            topic: param(1).unwrap_or_default(),
        },
        _ => return None,
    };
    Some(event)
}

fn outgoing_to_irc(message: OutgoingMessage) -> IrcMessage {
    match message {
        OutgoingMessage::Join { channel } => IrcMessage::new("JOIN", vec![channel]),
        OutgoingMessage::Privmsg { target, text } => IrcMessage::new("PRIVMSG", vec![target, text]),
        OutgoingMessage::CtcpReply {
            target,
            command,
            text,
        } => IrcMessage::new("NOTICE", vec![target, ctcp(&command, &text)]),
        OutgoingMessage::Nick { nick } => IrcMessage::new("NICK", vec![nick]),
        OutgoingMessage::Quit { reason } => IrcMessage::new("QUIT", vec![reason]),
    }
}

#[async_trait]
impl<R, W> ChatTransport for IrcTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn next_event(&mut self) -> std::result::Result<Option<ChatEvent>, TransportError> {
        Ok(self.read_event().await?)
    }

    async fn send(&mut self, message: OutgoingMessage) -> std::result::Result<(), TransportError> {
        Ok(self.write(&outgoing_to_irc(message)).await?)
    }
}
