//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object tagged by `messageType`. Chat payloads and
//! reply references travel as JSON documents encoded inside JSON strings; they
//! are decoded in [`super::conversion`] and never passed around as raw text.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Frame sent by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "messageType", rename_all = "lowercase")]
pub enum InboundFrame {
    /// `data` is the nickname
    Register { data: String },
    /// `data` is a JSON-encoded [`MessagePayload`]
    Message { data: String },
    /// Any other `messageType`
    #[serde(other)]
    Unknown,
}

impl InboundFrame {
    pub fn register(nickname: impl Into<String>) -> Self {
        Self::Register {
            data: nickname.into(),
        }
    }

    /// Build a chat frame, JSON-encoding the payload into `data`.
    pub fn message(payload: &MessagePayload) -> Result<Self, serde_json::Error> {
        Ok(Self::Message {
            data: serde_json::to_string(payload)?,
        })
    }

    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Body of an inbound chat frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub text: String,
    /// JSON-encoded reply reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// Conventional shape of a reply reference built by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyData {
    pub id: usize,
    pub from: String,
    pub message: String,
}

/// Frame sent by the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "messageType", rename_all = "lowercase")]
pub enum OutboundFrame {
    /// Roster in registration order
    Users {
        #[serde(rename = "dataArray")]
        data_array: Vec<String>,
    },
    /// `data` is a JSON-encoded [`ChatMessageDto`]
    Message { data: String },
}

impl OutboundFrame {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Chat message as broadcast to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub from: String,
    pub message: String,
    /// Unix timestamp (milliseconds)
    pub time: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<Value>,
}
