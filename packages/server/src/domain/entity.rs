//! Entities

use serde_json::Value;

use super::value_object::{ConnectionId, Nickname, Timestamp};

/// A connection that has registered a nickname.
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub nickname: Nickname,
    /// Whether the connection was present in the last transport liveness check.
    pub alive: bool,
    pub registered_at: Timestamp,
}

impl Participant {
    pub fn new(connection_id: ConnectionId, nickname: Nickname, registered_at: Timestamp) -> Self {
        Self {
            connection_id,
            nickname,
            alive: true,
            registered_at,
        }
    }
}

/// Reference to an earlier message, supplied by the client.
///
/// The relay never interprets the value; any JSON is echoed back exactly as it
/// was decoded. Clients conventionally send `{"id", "from", "message"}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyRef(Value);

impl ReplyRef {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// One chat message, built per broadcast and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Snapshot of the sender's nickname at send time
    pub from: Nickname,
    pub text: String,
    pub sent_at: Timestamp,
    pub reply_to: Option<ReplyRef>,
}

impl ChatMessage {
    pub fn new(from: Nickname, text: String, sent_at: Timestamp, reply_to: Option<ReplyRef>) -> Self {
        Self {
            from,
            text,
            sent_at,
            reply_to,
        }
    }
}

/// Decoded body of an inbound chat frame, before the sender is resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDraft {
    pub text: String,
    pub reply_to: Option<ReplyRef>,
}
