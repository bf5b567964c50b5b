//! Common types used throughout the relay.

use std::fmt;

use strum::{Display, EnumString};

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TurnRole {
    /// Message typed by the end user in Slack
    #[strum(serialize = "User")]
    User,
    /// Reply generated by the completion model
    #[strum(serialize = "Chatbot")]
    Bot,
}

/// One exchanged message in a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Bot,
            text: text.into(),
        }
    }
}

/// Renders the turn as a prompt transcript line, e.g. `User: hello`.
impl fmt::Display for ConversationTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.role, self.text)
    }
}

/// Message subtypes that never trigger a reply.
///
/// Maps to the Slack `subtype` field of a `message` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum IgnoredSubtype {
    /// Posted by a bot integration (including this one)
    BotMessage,
    /// A message was removed
    MessageDeleted,
    /// A message was edited
    MessageChanged,
}
