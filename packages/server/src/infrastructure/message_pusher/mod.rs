//! メッセージ配信の実装
//!
//! - `websocket`: WebSocket 接続ごとの送信チャンネルを使った実装

pub mod websocket;

pub use websocket::WebSocketMessagePusher;
