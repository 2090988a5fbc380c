//! Chat event value object.

use serde::{Deserialize, Serialize};

/// An inbound event from the chat transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Registration with the server completed
    Welcome,
    /// The requested nickname is taken
    NickInUse { attempted: String },
    /// Our own nickname changed (including server-forced changes)
    NickChanged { old: String, new: String },
    Message {
        channel: String,
        sender: String,
        text: String,
    },
    Action {
        channel: String,
        sender: String,
        text: String,
    },
    PrivateMessage { sender: String, text: String },
    /// CTCP VERSION request
    VersionRequest { sender: String },
    Join { channel: String, nick: String },
    Part {
        channel: String,
        nick: String,
        reason: Option<String>,
    },
    /// Quits are not channel-scoped
    Quit { nick: String, reason: Option<String> },
    Kick {
        channel: String,
        kicker: String,
        kickee: String,
        reason: Option<String>,
    },
    Mode {
        target: String,
        setter: String,
        change: String,
    },
    Topic {
        channel: String,
        setter: String,
        topic: String,
    },
    Notice {
        target: String,
        sender: String,
        text: String,
    },
}

impl ChatEvent {
    /// Channel the event belongs to; `None` for server-wide or private events
    pub fn channel(&self) -> Option<&str> {
        match self {
            ChatEvent::Message { channel, .. }
            | ChatEvent::Action { channel, .. }
            | ChatEvent::Join { channel, .. }
            | ChatEvent::Part { channel, .. }
            | ChatEvent::Kick { channel, .. }
            | ChatEvent::Topic { channel, .. } => Some(channel),
            ChatEvent::Mode { target, .. } | ChatEvent::Notice { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Backlog line for channel activity; `None` for events that never
    /// enter the backlog.
    pub fn display_line(&self) -> Option<String> {
        let line = match self {
            ChatEvent::Message { sender, text, .. } => format!("<{}> {}", sender, text),
            ChatEvent::Action { sender, text, .. } => format!("* {} {}", sender, text),
            ChatEvent::Join { nick, .. } => format!("*** Joins: {}", nick),
            ChatEvent::Part { nick, reason, .. } => {
                format!("*** Parts: {} ({})", nick, reason.as_deref().unwrap_or(""))
            }
            ChatEvent::Quit { nick, reason } => {
                format!("*** Quits: {} ({})", nick, reason.as_deref().unwrap_or(""))
            }
            ChatEvent::Kick {
                kicker,
                kickee,
                reason,
                ..
            } => format!(
                "*** Kick: {} by {} ({})",
                kickee,
                kicker,
                reason.as_deref().unwrap_or("")
            ),
            ChatEvent::Mode {
                target,
                setter,
                change,
            } => format!("*** Mode: {} {} by {}", change, target, setter),
            ChatEvent::Topic { setter, topic, .. } => {
                format!("*** Topic: \"{}\" by {}", topic, setter)
            }
            ChatEvent::Notice {
                target,
                sender,
                text,
            } => format!("*** Notice: {} \"{}\" by {}", target, text, sender),
            ChatEvent::Welcome
            | ChatEvent::NickInUse { .. }
            | ChatEvent::NickChanged { .. }
            | ChatEvent::PrivateMessage { .. }
            | ChatEvent::VersionRequest { .. } => return None,
        };
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{MessageKind, classify};

    #[test]
    fn test_message_and_action_lines() {
        let msg = ChatEvent::Message {
            channel: "#c".to_string(),
            sender: "alice".to_string(),
            text: "hello".to_string(),
        };
        assert_eq!(msg.display_line().unwrap(), "<alice> hello");

        let action = ChatEvent::Action {
            channel: "#c".to_string(),
            sender: "alice".to_string(),
            text: "waves".to_string(),
        };
        assert_eq!(action.display_line().unwrap(), "* alice waves");
    }

    #[test]
    fn test_membership_lines_classify_as_ignored() {
        let events = [
            ChatEvent::Join {
                channel: "#c".to_string(),
                nick: "bob".to_string(),
            },
            ChatEvent::Part {
                channel: "#c".to_string(),
                nick: "bob".to_string(),
                reason: None,
            },
            ChatEvent::Quit {
                nick: "bob".to_string(),
                reason: Some("Ping timeout".to_string()),
            },
        ];
        let lines: Vec<_> = events.iter().filter_map(ChatEvent::display_line).collect();
        assert_eq!(
            lines,
            vec!["*** Joins: bob", "*** Parts: bob ()", "*** Quits: bob (Ping timeout)"]
        );
        assert!(lines.iter().all(|l| classify(l) == MessageKind::Ignored));
    }

    #[test]
    fn test_other_system_lines() {
        let kick = ChatEvent::Kick {
            channel: "#c".to_string(),
            kicker: "op".to_string(),
            kickee: "troll".to_string(),
            reason: Some("spam".to_string()),
        };
        assert_eq!(kick.display_line().unwrap(), "*** Kick: troll by op (spam)");

        let mode = ChatEvent::Mode {
            target: "#c".to_string(),
            setter: "op".to_string(),
            change: "+o alice".to_string(),
        };
        assert_eq!(mode.display_line().unwrap(), "*** Mode: +o alice #c by op");

        let topic = ChatEvent::Topic {
            channel: "#c".to_string(),
            setter: "op".to_string(),
            topic: "rules".to_string(),
        };
        assert_eq!(topic.display_line().unwrap(), "*** Topic: \"rules\" by op");
        assert_eq!(classify(&topic.display_line().unwrap()), MessageKind::Proposal);

        let notice = ChatEvent::Notice {
            target: "#c".to_string(),
            sender: "svc".to_string(),
            text: "maintenance".to_string(),
        };
        assert_eq!(
            notice.display_line().unwrap(),
            "*** Notice: #c \"maintenance\" by svc"
        );
    }

    #[test]
    fn test_non_channel_events() {
        assert_eq!(ChatEvent::Welcome.display_line(), None);
        let pm = ChatEvent::PrivateMessage {
            sender: "bob".to_string(),
            text: "status".to_string(),
        };
        assert_eq!(pm.display_line(), None);
        assert_eq!(pm.channel(), None);
    }
}
