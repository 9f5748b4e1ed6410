//! UseCase: 参加者登録処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RegisterParticipantUseCase::execute() メソッド
//! - ロスターのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 登録は無条件で追加される（重複ニックネーム・重複登録を拒否しない）ことを保証
//! - 返されるロスターが登録順であることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規登録
//! - エッジケース：同じニックネーム、同じ接続からの再登録

use std::sync::Arc;

use hiroba_shared::time::Clock;

use crate::domain::{
    ConnectionId, MessagePusher, Nickname, Participant, ParticipantRepository, Timestamp,
};

/// 参加者登録のユースケース
pub struct RegisterParticipantUseCase {
    repository: Arc<dyn ParticipantRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl RegisterParticipantUseCase {
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

    /// 参加者登録を実行
    ///
    /// # Returns
    ///
    /// 登録後のロスター（登録順）
    pub async fn execute(&self, connection_id: ConnectionId, nickname: Nickname) -> Vec<Nickname> {
        let registered_at = Timestamp::new(self.clock.now_millis());
        let participant = Participant::new(connection_id, nickname, registered_at);
        self.repository.register(participant).await
    }

    /// ロスターを全ての接続にブロードキャスト
    ///
    /// # Returns
    ///
    /// 配信できた接続の数
    pub async fn broadcast_roster(&self, message: &str) -> usize {
        self.message_pusher.broadcast(message).await
    }
}
