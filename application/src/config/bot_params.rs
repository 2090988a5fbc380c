//! Runtime parameters of the bot loop.

/// How the bot identifies itself after registration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    None,
    /// `identify <username> <password>` sent to NickServ
    NickServ { username: String, password: String },
    /// An identification method this build does not know
    Unsupported(String),
}

/// Parameters for [`RunBotUseCase`](crate::use_cases::run_bot::RunBotUseCase).
#[derive(Debug, Clone)]
pub struct BotParams {
    /// The one channel the bot governs
    pub channel: String,
    /// Preferred nickname; `_` is appended while it is in use
    pub nick: String,
    pub identity: Identity,
    /// Post `Proposal accepted: <text>` after each legislation
    pub announce: bool,
    /// Reply to CTCP VERSION and the `version` command
    pub version: String,
    pub quit_message: String,
}

impl BotParams {
    pub fn new(channel: impl Into<String>, nick: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            nick: nick.into(),
            identity: Identity::None,
            announce: false,
            version: format!("eunomia {}", env!("CARGO_PKG_VERSION")),
            quit_message: "Adjourned".to_string(),
        }
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_announce(mut self, announce: bool) -> Self {
        self.announce = announce;
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}
