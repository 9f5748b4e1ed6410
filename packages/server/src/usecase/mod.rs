//! UseCase layer
//!
//! Repository と MessagePusher を組み合わせて、中継サーバーの各操作を実装します。
//! DTO（ワイヤーフォーマット）には依存せず、ブロードキャスト内容は UI 層で JSON 化されたものを受け取ります。

pub mod error;
pub mod register_participant;
pub mod send_message;
pub mod sweep_connections;

pub use error::SendMessageError;
pub use register_participant::RegisterParticipantUseCase;
pub use send_message::SendMessageUseCase;
pub use sweep_connections::SweepConnectionsUseCase;
