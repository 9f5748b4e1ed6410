//! Domain logic for client-side operations.
//!
//! This module contains pure functions and plain state that implement the
//! client's behavior without I/O, making them easy to test.

use hiroba_server::infrastructure::dto::websocket::{ChatMessageDto, ReplyData};

use crate::error::{ClientError, CommandError};

/// One line of user input, interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text is sent as a chat message
    Send(String),
    /// `/reply <n> <text>`
    Reply { id: usize, text: String },
    /// `/users`
    Users,
    /// `/quit`
    Quit,
}

/// Parse a trimmed, non-empty input line.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Send(line.to_string()));
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    match name {
        "reply" => {
            let (id, text) = args
                .split_once(char::is_whitespace)
                .ok_or(CommandError::MissingReplyArguments)?;
            let text = text.trim();
            if text.is_empty() {
                return Err(CommandError::MissingReplyArguments);
            }
            let id = id
                .trim_start_matches('#')
                .parse::<usize>()
                .map_err(|_| CommandError::InvalidMessageNumber(id.to_string()))?;
            Ok(Command::Reply {
                id,
                text: text.to_string(),
            })
        }
        "users" => Ok(Command::Users),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(CommandError::UnknownCommand(name.to_string())),
    }
}

/// Chat messages received during this run, numbered from 0 in arrival order.
#[derive(Debug, Default)]
pub struct MessageHistory {
    entries: Vec<ChatMessageDto>,
}

impl MessageHistory {
    /// Record a message and return its number.
    pub fn push(&mut self, message: ChatMessageDto) -> usize {
        self.entries.push(message);
        self.entries.len() - 1
    }

    pub fn get(&self, id: usize) -> Option<&ChatMessageDto> {
        self.entries.get(id)
    }

    /// Reference to message `#id` in the shape sent as `reply_to`.
    pub fn reply_ref(&self, id: usize) -> Option<ReplyData> {
        self.get(id).map(|message| ReplyData {
            id,
            from: message.from.clone(),
            message: message.message.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// State shared by the read and write halves of a session, kept across reconnects.
#[derive(Debug, Default)]
pub struct ClientState {
    /// Last roster received from the relay
    pub roster: Vec<String>,
    pub history: MessageHistory,
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The number of failed attempts so far
/// * `max_attempts` - The maximum number of attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    match error {
        ClientError::ConnectionError(_) | ClientError::ConnectionLost => {
            current_attempt < max_attempts
        }
        ClientError::Encode(_) => false,
    }
}
