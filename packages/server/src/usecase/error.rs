//! UseCase errors

use thiserror::Error;

use crate::domain::ConnectionId;

#[derive(Debug, Error, PartialEq)]
pub enum SendMessageError {
    /// 送信元の接続がまだ register していない
    #[error("connection '{0}' has not registered a nickname")]
    UnregisteredSender(ConnectionId),
}
