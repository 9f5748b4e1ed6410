//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 開いている WebSocket 接続の `UnboundedSender` を管理
//! - 開いている全ての接続へのブロードキャスト
//!
//! ## 設計ノート
//!
//! WebSocket の受け付けとソケットへの書き込みは UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は接続ごとの sender を受け取り、送信に使用します。
//! 送信はチャンネルへの enqueue だけなので、遅い接続が他の接続への配信を遅らせることはありません。

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// Key: ConnectionId, Value: その接続の送信チャンネル
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }

    fn push(
        connection_id: ConnectionId,
        sender: &PusherChannel,
        content: &str,
    ) -> Result<(), MessagePushError> {
        if sender.is_closed() {
            return Err(MessagePushError::ConnectionClosed(connection_id));
        }
        sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(connection_id, e.to_string()))
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(connection_id, sender);
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!("Connection '{}' unregistered from MessagePusher", connection_id);
    }

    async fn live_connections(&self) -> HashSet<ConnectionId> {
        let clients = self.clients.lock().await;
        clients
            .iter()
            .filter(|(_, sender)| !sender.is_closed())
            .map(|(id, _)| *id)
            .collect()
    }

    async fn broadcast(&self, content: &str) -> usize {
        let clients = self.clients.lock().await;
        let mut delivered = 0;

        for (connection_id, sender) in clients.iter() {
            // ブロードキャストでは一部の送信失敗を許容
            match Self::push(*connection_id, sender, content) {
                Ok(()) => delivered += 1,
                Err(e @ MessagePushError::ConnectionClosed(_)) => {
                    tracing::debug!("Skipping broadcast target: {}", e);
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                }
            }
        }

        tracing::debug!(
            "Broadcasted message to {}/{} connections",
            delivered,
            clients.len()
        );
        delivered
    }
}
