//! Registry ドメインモデル
//!
//! 接続中の参加者を登録順に保持する集約。「誰がオンラインか」の唯一の情報源です。
//!
//! ## 不変条件
//!
//! - 参加者は登録順に並ぶ（ロスターの並び順になる）
//! - 重複したニックネーム、同一接続からの重複登録はどちらも受け入れる
//! - 書き込みは `register`（追加）と `reconcile`（一括除去）のみ

use std::collections::HashSet;

use super::{
    entity::Participant,
    value_object::{ConnectionId, Nickname},
};

#[derive(Debug, Clone, Default)]
pub struct Registry {
    participants: Vec<Participant>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 参加者を末尾に追加（重複チェックなし）
    pub fn register(&mut self, participant: Participant) {
        self.participants.push(participant);
    }

    /// 接続に対応する参加者を線形探索で取得
    ///
    /// 同じ接続が複数回登録している場合は、最後の登録（現在のニックネーム）を返す。
    pub fn find_by_session(&self, connection_id: &ConnectionId) -> Option<&Participant> {
        self.participants
            .iter()
            .rev()
            .find(|p| &p.connection_id == connection_id)
    }

    /// トランスポート層が開いている接続の集合と突き合わせ、それ以外の参加者を除去する
    ///
    /// # Returns
    ///
    /// 参加者が 1 人以上除去された場合 `true`
    pub fn reconcile(&mut self, live_connections: &HashSet<ConnectionId>) -> bool {
        let before = self.participants.len();
        for participant in &mut self.participants {
            participant.alive = live_connections.contains(&participant.connection_id);
        }
        self.participants.retain(|p| p.alive);
        self.participants.len() != before
    }

    /// 登録順のニックネーム一覧
    pub fn roster(&self) -> Vec<Nickname> {
        self.participants.iter().map(|p| p.nickname.clone()).collect()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
