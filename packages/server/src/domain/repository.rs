//! Repository trait 定義
//!
//! ドメイン層が必要とする参加者ストアへのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use std::collections::HashSet;

use async_trait::async_trait;

use super::{ConnectionId, Nickname, Participant};

/// Participant Repository trait
///
/// 各操作はそれ単体でアトミックに実行される。複数の操作をまたぐ直列化は
/// UI 層のディスパッチャが担う。
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// 参加者を追加し、追加後のロスターを返す
    async fn register(&self, participant: Participant) -> Vec<Nickname>;

    /// 接続に対応する参加者を取得
    async fn find_by_session(&self, connection_id: &ConnectionId) -> Option<Participant>;

    /// 開いている接続の集合と突き合わせる
    ///
    /// 参加者が除去された場合のみ、除去後のロスターを `Some` で返す。
    async fn reconcile(&self, live_connections: &HashSet<ConnectionId>) -> Option<Vec<Nickname>>;

    /// 登録順のロスターを取得
    async fn roster(&self) -> Vec<Nickname>;

    /// 登録数を取得
    async fn count(&self) -> usize;
}
