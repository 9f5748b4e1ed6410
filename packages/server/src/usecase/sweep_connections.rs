//! UseCase: 接続の生存確認（スイープ）
//!
//! トランスポート層が開いている接続の集合を取得し、Registry と突き合わせます。
//! 切断検知はこのスイープだけで行われ、切断から最大 1 スイープ間隔遅れて反映されます。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SweepConnectionsUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 閉じた接続の参加者が除去されることを保証
//! - 変化がないスイープではロスターを返さない（ブロードキャストしない）ことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：1 人が切断
//! - エッジケース：変化なし、全員切断、未登録の接続のみ切断

use std::sync::Arc;

use crate::domain::{MessagePusher, Nickname, ParticipantRepository};

/// スイープのユースケース
pub struct SweepConnectionsUseCase {
    repository: Arc<dyn ParticipantRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl SweepConnectionsUseCase {
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// スイープを実行
    ///
    /// # Returns
    ///
    /// * `Some(roster)` - 参加者が除去された（除去後のロスター）
    /// * `None` - 変化なし
    pub async fn execute(&self) -> Option<Vec<Nickname>> {
        let live_connections = self.message_pusher.live_connections().await;
        self.repository.reconcile(&live_connections).await
    }

    /// 更新後のロスターを全ての接続にブロードキャスト
    pub async fn broadcast_roster(&self, message: &str) -> usize {
        self.message_pusher.broadcast(message).await
    }
}
