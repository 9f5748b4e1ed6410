//! InMemory Participant Repository 実装
//!
//! ドメイン層が定義する ParticipantRepository trait の具体的な実装。
//! Registry ドメインモデルをそのままストレージとして使用します。
//! ロックは各操作の間だけ保持し、ネットワーク I/O をまたいで保持することはありません。

use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, Nickname, Participant, ParticipantRepository, Registry};

/// インメモリ Participant Repository 実装
pub struct InMemoryParticipantRepository {
    registry: Arc<Mutex<Registry>>,
}

impl InMemoryParticipantRepository {
    pub fn new(registry: Arc<Mutex<Registry>>) -> Self {
        Self { registry }
    }
}

impl Default for InMemoryParticipantRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(Registry::new())))
    }
}

#[async_trait]
impl ParticipantRepository for InMemoryParticipantRepository {
    async fn register(&self, participant: Participant) -> Vec<Nickname> {
        let mut registry = self.registry.lock().await;
        registry.register(participant);
        registry.roster()
    }

    async fn find_by_session(&self, connection_id: &ConnectionId) -> Option<Participant> {
        let registry = self.registry.lock().await;
        registry.find_by_session(connection_id).cloned()
    }

    async fn reconcile(&self, live_connections: &HashSet<ConnectionId>) -> Option<Vec<Nickname>> {
        let mut registry = self.registry.lock().await;
        registry
            .reconcile(live_connections)
            .then(|| registry.roster())
    }

    async fn roster(&self) -> Vec<Nickname> {
        let registry = self.registry.lock().await;
        registry.roster()
    }

    async fn count(&self) -> usize {
        let registry = self.registry.lock().await;
        registry.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timestamp;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryParticipantRepository の登録・検索・突き合わせ
    //
    // 【なぜこのテストが必要か】
    // - Repository は UseCase から呼ばれる参加者ストアの中核
    // - register がロスターを返すこと、reconcile が変化時のみロスターを返すことを保証する
    // ========================================

    fn participant(connection_id: ConnectionId, nickname: &str) -> Participant {
        Participant::new(connection_id, Nickname::new(nickname), Timestamp::new(1000))
    }

    #[tokio::test]
    async fn test_register_returns_roster_after_append() {
        // テスト項目: 登録後のロスターが登録順で返される
        // given (前提条件):
        let repo = InMemoryParticipantRepository::default();
        repo.register(participant(ConnectionId::generate(), "alice"))
            .await;

        // when (操作):
        let roster = repo
            .register(participant(ConnectionId::generate(), "bob"))
            .await;

        // then (期待する結果):
        assert_eq!(roster, vec![Nickname::new("alice"), Nickname::new("bob")]);
        assert_eq!(repo.count().await, 2);
    }

    #[tokio::test]
    async fn test_find_by_session() {
        // テスト項目: 接続 ID から参加者を取得できる
        // given (前提条件):
        let repo = InMemoryParticipantRepository::default();
        let alice = ConnectionId::generate();
        repo.register(participant(alice, "alice")).await;

        // when (操作):
        let found = repo.find_by_session(&alice).await;
        let missing = repo.find_by_session(&ConnectionId::generate()).await;

        // then (期待する結果):
        assert_eq!(found.unwrap().nickname.as_str(), "alice");
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_reconcile_returns_roster_only_when_changed() {
        // テスト項目: 参加者が除去された場合のみロスターが返される
        // given (前提条件):
        let repo = InMemoryParticipantRepository::default();
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        repo.register(participant(alice, "alice")).await;
        repo.register(participant(bob, "bob")).await;

        // when (操作):
        let unchanged = repo.reconcile(&[alice, bob].into_iter().collect()).await;
        let changed = repo.reconcile(&[bob].into_iter().collect()).await;

        // then (期待する結果):
        assert_eq!(unchanged, None);
        assert_eq!(changed, Some(vec![Nickname::new("bob")]));
        assert_eq!(repo.roster().await, vec![Nickname::new("bob")]);
    }

    #[tokio::test]
    async fn test_shared_registry_handle() {
        // テスト項目: 外部から渡した Registry が Repository の状態として使われる
        // given (前提条件):
        let registry = Arc::new(Mutex::new(Registry::new()));
        let repo = InMemoryParticipantRepository::new(registry.clone());

        // when (操作):
        repo.register(participant(ConnectionId::generate(), "alice"))
            .await;

        // then (期待する結果):
        assert_eq!(registry.lock().await.len(), 1);
    }
}
