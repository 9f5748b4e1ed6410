//! Shared application state

use std::sync::Arc;

use crate::domain::MessagePusher;

use super::dispatcher::DispatcherHandle;

pub struct AppState {
    /// 受信フレームの投入先
    pub dispatcher: DispatcherHandle,
    /// 開いている接続の集合（トランスポート層）
    pub message_pusher: Arc<dyn MessagePusher>,
}
