//! Conversion logic between DTOs and domain entities.
//!
//! This is the only place where the nested "JSON inside a JSON string"
//! encoding is handled.

use serde_json::Value;
use thiserror::Error;

use crate::domain::{ChatMessage, MessageDraft, Nickname, ReplyRef};
use crate::infrastructure::dto::websocket::{ChatMessageDto, MessagePayload, OutboundFrame};

/// Failure to decode the body of a chat frame
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("malformed message payload: {0}")]
    Payload(#[source] serde_json::Error),

    #[error("malformed reply_to: {0}")]
    ReplyTo(#[source] serde_json::Error),
}

// ========================================
// DTO → Domain
// ========================================

/// Decode the `data` string of a chat frame.
///
/// The payload and its optional `reply_to` are two independent JSON parses;
/// a failure in either rejects the whole payload.
pub fn decode_message_payload(data: &str) -> Result<MessageDraft, PayloadError> {
    let payload: MessagePayload = serde_json::from_str(data).map_err(PayloadError::Payload)?;

    let reply_to = match payload.reply_to {
        Some(encoded) => Some(decode_reply_ref(&encoded)?),
        None => None,
    };

    Ok(MessageDraft {
        text: payload.text,
        reply_to,
    })
}

fn decode_reply_ref(encoded: &str) -> Result<ReplyRef, PayloadError> {
    serde_json::from_str::<Value>(encoded)
        .map(ReplyRef::new)
        .map_err(PayloadError::ReplyTo)
}

// ========================================
// Domain → DTO
// ========================================

impl From<ChatMessage> for ChatMessageDto {
    fn from(model: ChatMessage) -> Self {
        Self {
            from: model.from.into_string(),
            message: model.text,
            time: model.sent_at.value(),
            reply_to: model.reply_to.map(ReplyRef::into_value),
        }
    }
}

/// Roster envelope
pub fn roster_frame(roster: Vec<Nickname>) -> OutboundFrame {
    OutboundFrame::Users {
        data_array: roster.into_iter().map(Nickname::into_string).collect(),
    }
}

/// Chat envelope, with the message JSON-encoded into `data`
pub fn chat_frame(message: ChatMessage) -> Result<OutboundFrame, serde_json::Error> {
    let dto = ChatMessageDto::from(message);
    Ok(OutboundFrame::Message {
        data: serde_json::to_string(&dto)?,
    })
}
