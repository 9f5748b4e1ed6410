//! Error types for the terminal client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The relay could not be reached
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An established session was interrupted
    #[error("Connection lost")]
    ConnectionLost,

    /// An outgoing frame could not be serialized
    #[error("Failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors from parsing a line of user input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("usage: /reply <n> <text>")]
    MissingReplyArguments,

    #[error("'{0}' is not a message number")]
    InvalidMessageNumber(String),

    #[error("unknown command '{0}' (try /reply, /users or /quit)")]
    UnknownCommand(String),
}
