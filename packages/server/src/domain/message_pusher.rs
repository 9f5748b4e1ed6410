//! MessagePusher trait 定義
//!
//! トランスポート層の「開いている接続」の集合と、その全てへの配信を抽象化します。
//! 具体的な実装（WebSocket）は Infrastructure 層が提供します。

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

#[cfg(test)]
use mockall::automock;

use super::ConnectionId;

/// 1 接続分の送信チャンネル
///
/// 受信側（ソケットへの書き込みタスク）が終了するとチャンネルは閉じ、
/// その接続は「送信可能ではない」とみなされる。
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[derive(Debug, Error, PartialEq)]
pub enum MessagePushError {
    #[error("connection '{0}' is not open")]
    ConnectionClosed(ConnectionId),

    #[error("failed to push message to '{0}': {1}")]
    PushFailed(ConnectionId, String),
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 開いた接続を登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 閉じた接続を登録解除（Registry には触れない）
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 現在開いている接続の集合
    async fn live_connections(&self) -> HashSet<ConnectionId>;

    /// 開いている全ての接続へ配信する
    ///
    /// 1 接続への送信失敗は他の接続への配信を妨げない。
    ///
    /// # Returns
    ///
    /// フレームを渡せた接続の数
    async fn broadcast(&self, content: &str) -> usize;
}
