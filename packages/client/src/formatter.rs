//! Message formatting utilities for client display.

use hiroba_server::infrastructure::dto::websocket::ChatMessageDto;
use hiroba_shared::time::format_clock_time;
use serde_json::Value;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a roster update, marking the current user
    ///
    /// # Arguments
    ///
    /// * `roster` - Nicknames in registration order
    /// * `me` - The nickname this client registered with
    pub fn format_roster(roster: &[String], me: &str) -> String {
        if roster.is_empty() {
            return "\nUsers: (none)\n".to_string();
        }

        let names: Vec<String> = roster
            .iter()
            .map(|nickname| {
                if nickname == me {
                    format!("{} (me)", nickname)
                } else {
                    nickname.clone()
                }
            })
            .collect();
        format!("\nUsers: {}\n", names.join(", "))
    }

    /// Format a chat message as `[#n HH:MM:SS] from: text`
    ///
    /// A second line shows the referenced message when `reply_to` is present.
    pub fn format_chat_message(id: usize, message: &ChatMessageDto) -> String {
        let mut output = format!(
            "\n[#{} {}] {}: {}\n",
            id,
            format_clock_time(message.time),
            message.from,
            message.message
        );
        if let Some(reply_to) = &message.reply_to {
            output.push_str(&format!("    ↩ {}\n", Self::format_reply_to(reply_to)));
        }
        output
    }

    fn format_reply_to(reply_to: &Value) -> String {
        let from = reply_to.get("from").and_then(Value::as_str);
        let message = reply_to.get("message").and_then(Value::as_str);
        match (from, message) {
            (Some(from), Some(message)) => format!("reply to {}: {}", from, message),
            // other clients may send any object
            _ => format!("reply to {}", reply_to),
        }
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    /// Format a local notice, e.g. a rejected command
    pub fn format_notice(text: &str) -> String {
        format!("! {}\n", text)
    }
}
