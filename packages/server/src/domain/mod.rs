//! Domain layer
//!
//! 中継サーバーの中核となる型とインターフェースを定義します。
//! Infrastructure 層への依存はありません（依存性の逆転）。

pub mod entity;
pub mod message_pusher;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, MessageDraft, Participant, ReplyRef};
pub use message_pusher::{MessagePushError, MessagePusher, PusherChannel};
pub use registry::Registry;
pub use repository::ParticipantRepository;
pub use value_object::{ConnectionId, Nickname, Timestamp};
