//! Message Router
//!
//! 受信したフレームをパースし、messageType ごとにユースケースへ振り分け、
//! 送信するフレームを組み立ててブロードキャストします。
//!
//! ## 破棄ポリシー
//!
//! 不正なフレームはクライアントに何も返さずに破棄し、接続は維持します。
//! 破棄した理由は [`DiscardReason`] として呼び出し元に返し、ログにのみ残します。

use std::sync::Arc;

use thiserror::Error;

use crate::{
    domain::{ConnectionId, Nickname},
    infrastructure::dto::{
        conversion::{PayloadError, chat_frame, decode_message_payload, roster_frame},
        websocket::{InboundFrame, OutboundFrame},
    },
    usecase::{
        RegisterParticipantUseCase, SendMessageError, SendMessageUseCase, SweepConnectionsUseCase,
    },
};

/// Why an inbound frame produced no broadcast
#[derive(Debug, Error, PartialEq)]
pub enum DiscardReason {
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("malformed message payload: {0}")]
    MalformedPayload(String),

    #[error("malformed reply_to: {0}")]
    MalformedReplyTo(String),

    #[error("sender has not registered a nickname")]
    UnregisteredSender,

    #[error("unknown message type")]
    UnknownMessageType,

    #[error("failed to encode outbound frame: {0}")]
    Unencodable(String),
}

impl From<PayloadError> for DiscardReason {
    fn from(e: PayloadError) -> Self {
        match e {
            PayloadError::Payload(e) => Self::MalformedPayload(e.to_string()),
            PayloadError::ReplyTo(e) => Self::MalformedReplyTo(e.to_string()),
        }
    }
}

impl From<SendMessageError> for DiscardReason {
    fn from(e: SendMessageError) -> Self {
        match e {
            SendMessageError::UnregisteredSender(_) => Self::UnregisteredSender,
        }
    }
}

/// Result of routing one inbound frame
#[derive(Debug, PartialEq)]
pub enum RouteOutcome {
    RosterBroadcast { recipients: usize },
    MessageBroadcast { recipients: usize },
    Discarded(DiscardReason),
}

pub struct MessageRouter {
    register_participant_usecase: Arc<RegisterParticipantUseCase>,
    send_message_usecase: Arc<SendMessageUseCase>,
    sweep_connections_usecase: Arc<SweepConnectionsUseCase>,
}

impl MessageRouter {
    pub fn new(
        register_participant_usecase: Arc<RegisterParticipantUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        sweep_connections_usecase: Arc<SweepConnectionsUseCase>,
    ) -> Self {
        Self {
            register_participant_usecase,
            send_message_usecase,
            sweep_connections_usecase,
        }
    }

    /// Handle one text frame received on `connection_id`.
    pub async fn route(&self, connection_id: ConnectionId, text: &str) -> RouteOutcome {
        match self.try_route(connection_id, text).await {
            Ok(outcome) => outcome,
            Err(reason) => {
                match &reason {
                    DiscardReason::UnregisteredSender | DiscardReason::UnknownMessageType => {
                        tracing::debug!("Discarded frame from '{}': {}", connection_id, reason);
                    }
                    DiscardReason::Unencodable(_) => {
                        tracing::error!("Discarded frame from '{}': {}", connection_id, reason);
                    }
                    _ => {
                        tracing::warn!("Discarded frame from '{}': {}", connection_id, reason);
                    }
                }
                RouteOutcome::Discarded(reason)
            }
        }
    }

    async fn try_route(
        &self,
        connection_id: ConnectionId,
        text: &str,
    ) -> Result<RouteOutcome, DiscardReason> {
        let frame = InboundFrame::parse(text)
            .map_err(|e| DiscardReason::MalformedEnvelope(e.to_string()))?;

        match frame {
            InboundFrame::Register { data } => {
                let nickname = Nickname::from(data);
                tracing::info!("Connection '{}' registered as '{}'", connection_id, nickname);

                let roster = self
                    .register_participant_usecase
                    .execute(connection_id, nickname)
                    .await;
                let json = encode(&roster_frame(roster))?;
                let recipients = self
                    .register_participant_usecase
                    .broadcast_roster(&json)
                    .await;
                Ok(RouteOutcome::RosterBroadcast { recipients })
            }
            InboundFrame::Message { data } => {
                // sender first: frames from unregistered connections are never decoded
                let from = self
                    .send_message_usecase
                    .resolve_sender(connection_id)
                    .await?;
                let draft = decode_message_payload(&data)?;
                let message = self.send_message_usecase.execute(from, draft);
                tracing::debug!("Broadcasting message from '{}'", message.from);

                let frame =
                    chat_frame(message).map_err(|e| DiscardReason::Unencodable(e.to_string()))?;
                let json = encode(&frame)?;
                let recipients = self.send_message_usecase.broadcast_message(&json).await;
                Ok(RouteOutcome::MessageBroadcast { recipients })
            }
            InboundFrame::Unknown => Err(DiscardReason::UnknownMessageType),
        }
    }

    /// Run one liveness sweep.
    ///
    /// Returns the number of recipients of the roster broadcast, or `None`
    /// when the registry did not change and nothing was sent.
    pub async fn sweep(&self) -> Option<usize> {
        let roster = self.sweep_connections_usecase.execute().await?;
        tracing::info!("Sweep evicted stale participants, {} remain", roster.len());

        match encode(&roster_frame(roster)) {
            Ok(json) => Some(self.sweep_connections_usecase.broadcast_roster(&json).await),
            Err(reason) => {
                tracing::error!("Failed to broadcast roster after sweep: {}", reason);
                None
            }
        }
    }
}

fn encode(frame: &OutboundFrame) -> Result<String, DiscardReason> {
    frame
        .encode()
        .map_err(|e| DiscardReason::Unencodable(e.to_string()))
}
