//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::resolve_sender() / execute() メソッド
//! - 送信者の解決（未登録の接続は拒否）と ChatMessage の構築
//!
//! ### なぜこのテストが必要か
//! - from は送信時点のニックネームのスナップショットであることを保証
//! - reply_to が手を加えられずに引き継がれることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録済みの接続からの送信
//! - 異常系：未登録の接続からの送信
//! - エッジケース：reply_to 付きの送信

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ChatMessage, ConnectionId, MessageDraft, MessagePusher, Nickname, ParticipantRepository,
    Timestamp,
};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn ParticipantRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// 送信者の現在のニックネームを解決
    ///
    /// # Returns
    ///
    /// * `Ok(Nickname)` - 接続の最新の登録名
    /// * `Err(SendMessageError::UnregisteredSender)` - 送信元が未登録
    pub async fn resolve_sender(
        &self,
        connection_id: ConnectionId,
    ) -> Result<Nickname, SendMessageError> {
        self.repository
            .find_by_session(&connection_id)
            .await
            .map(|participant| participant.nickname)
            .ok_or(SendMessageError::UnregisteredSender(connection_id))
    }

    /// 解決済みの送信者とデコード済みの本文から ChatMessage を構築（時刻はサーバーが付与）
    pub fn execute(&self, from: Nickname, draft: MessageDraft) -> ChatMessage {
        ChatMessage::new(
            from,
            draft.text,
            Timestamp::new(self.clock.now_millis()),
            draft.reply_to,
        )
    }

    /// メッセージを全ての接続にブロードキャスト
    pub async fn broadcast_message(&self, message: &str) -> usize {
        self.message_pusher.broadcast(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Participant, ReplyRef, message_pusher::MockMessagePusher},
        infrastructure::repository::InMemoryParticipantRepository,
    };
    use hiroba_shared::time::FixedClock;
    use serde_json::json;

    fn create_usecase(
        message_pusher: MockMessagePusher,
    ) -> (SendMessageUseCase, Arc<InMemoryParticipantRepository>) {
        let repository = Arc::new(InMemoryParticipantRepository::default());
        let usecase = SendMessageUseCase::new(
            repository.clone(),
            Arc::new(message_pusher),
            Arc::new(FixedClock::new(1700000000000)),
        );
        (usecase, repository)
    }

    async fn register(repository: &InMemoryParticipantRepository, nickname: &str) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        repository
            .register(Participant::new(
                connection_id,
                Nickname::new(nickname),
                Timestamp::new(0),
            ))
            .await;
        connection_id
    }

    fn draft(text: &str) -> MessageDraft {
        MessageDraft {
            text: text.to_string(),
            reply_to: None,
        }
    }

    #[tokio::test]
    async fn test_send_message_success() {
        // テスト項目: 登録済みの接続から送信すると ChatMessage が構築される
        // given (前提条件):
        let (usecase, repository) = create_usecase(MockMessagePusher::new());
        let alice = register(&repository, "alice").await;

        // when (操作):
        let from = usecase.resolve_sender(alice).await.unwrap();
        let message = usecase.execute(from, draft("hi"));

        // then (期待する結果):
        assert_eq!(message.from, Nickname::new("alice"));
        assert_eq!(message.text, "hi");
        assert_eq!(message.sent_at, Timestamp::new(1700000000000));
        assert!(message.reply_to.is_none());
    }

    #[tokio::test]
    async fn test_send_message_unregistered_sender() {
        // テスト項目: 未登録の接続からの送信はエラーになり、ブロードキャストは行われない
        // given (前提条件):
        let mut message_pusher = MockMessagePusher::new();
        message_pusher.expect_broadcast().never();
        let (usecase, repository) = create_usecase(message_pusher);
        register(&repository, "alice").await;
        let stranger = ConnectionId::generate();

        // when (操作):
        let result = usecase.resolve_sender(stranger).await;

        // then (期待する結果):
        assert_eq!(result, Err(SendMessageError::UnregisteredSender(stranger)));
    }

    #[tokio::test]
    async fn test_send_message_keeps_reply_to() {
        // テスト項目: reply_to がそのまま ChatMessage に引き継がれる
        // given (前提条件):
        let (usecase, _repository) = create_usecase(MockMessagePusher::new());
        let reply_to = ReplyRef::new(json!({"id": 7, "from": "alice", "message": "hello"}));
        let draft = MessageDraft {
            text: "hey".to_string(),
            reply_to: Some(reply_to.clone()),
        };

        // when (操作):
        let message = usecase.execute(Nickname::new("bob"), draft);

        // then (期待する結果):
        assert_eq!(message.reply_to, Some(reply_to));
    }

    #[tokio::test]
    async fn test_send_message_uses_latest_nickname() {
        // テスト項目: from は送信時点で現在のニックネーム
        // given (前提条件):
        let (usecase, repository) = create_usecase(MockMessagePusher::new());
        let conn = register(&repository, "alice").await;
        repository
            .register(Participant::new(conn, Nickname::new("alicia"), Timestamp::new(1)))
            .await;

        // when (操作):
        let from = usecase.resolve_sender(conn).await.unwrap();

        // then (期待する結果):
        assert_eq!(from.as_str(), "alicia");
    }

    #[tokio::test]
    async fn test_broadcast_message_delegates_to_pusher() {
        // テスト項目: メッセージのブロードキャストは MessagePusher に委譲される
        // given (前提条件):
        let mut message_pusher = MockMessagePusher::new();
        message_pusher
            .expect_broadcast()
            .withf(|content| content.contains(r#""messageType":"message""#))
            .times(1)
            .returning(|_| 3);
        let (usecase, _repository) = create_usecase(message_pusher);

        // when (操作):
        let delivered = usecase
            .broadcast_message(r#"{"messageType":"message","data":"{}"}"#)
            .await;

        // then (期待する結果):
        assert_eq!(delivered, 3);
    }
}
