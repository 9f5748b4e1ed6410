//! WebSocket client session management.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use hiroba_server::infrastructure::dto::websocket::{
    ChatMessageDto, InboundFrame, MessagePayload, OutboundFrame,
};
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::{
    domain::{ClientState, Command, parse_command},
    error::ClientError,
};

use super::{formatter::MessageFormatter, ui::print_with_prompt};

/// Run one WebSocket session until the user quits or the connection drops.
///
/// Registers `nickname` as soon as the connection opens, so every reconnect
/// re-registers.
pub async fn run_client_session(
    url: &str,
    nickname: &str,
    state: &Arc<Mutex<ClientState>>,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to relay!");
    println!(
        "\nYou are '{}'. Type messages and press Enter to send. /reply <n> <text>, /users, /quit.\n",
        nickname
    );

    let (mut write, mut read) = ws_stream.split();

    let register = InboundFrame::register(nickname).encode()?;
    write
        .send(Message::text(register))
        .await
        .map_err(|_| ClientError::ConnectionLost)?;

    // Spawn a task to handle incoming frames
    let state_for_read = state.clone();
    let nickname_for_read = nickname.to_string();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let output =
                        render_frame(text.as_str(), &nickname_for_read, &state_for_read).await;
                    print_with_prompt(&output, &nickname_for_read);
                }
                Ok(Message::Binary(data)) => {
                    let output = MessageFormatter::format_binary_message(data.len());
                    print_with_prompt(&output, &nickname_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    // Forward user input until /quit or the editor closes
    let input_loop = async {
        while let Some(line) = input_rx.recv().await {
            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(e) => {
                    print_with_prompt(&MessageFormatter::format_notice(&e.to_string()), nickname);
                    continue;
                }
            };

            let payload = match command {
                Command::Send(text) => MessagePayload {
                    text,
                    reply_to: None,
                },
                Command::Reply { id, text } => {
                    let Some(reply) = state.lock().await.history.reply_ref(id) else {
                        let notice = format!("no message #{}", id);
                        print_with_prompt(&MessageFormatter::format_notice(&notice), nickname);
                        continue;
                    };
                    MessagePayload {
                        text,
                        reply_to: Some(serde_json::to_string(&reply)?),
                    }
                }
                Command::Users => {
                    let output = MessageFormatter::format_roster(&state.lock().await.roster, nickname);
                    print_with_prompt(&output, nickname);
                    continue;
                }
                Command::Quit => return Ok(()),
            };

            let frame = InboundFrame::message(&payload)?.encode()?;
            write
                .send(Message::text(frame))
                .await
                .map_err(|_| ClientError::ConnectionLost)?;
        }

        Ok::<(), ClientError>(())
    };

    // If any one of the halves completes, stop the other
    let result = tokio::select! {
        _ = &mut read_task => Err(ClientError::ConnectionLost),
        result = input_loop => {
            read_task.abort();
            result
        }
    };

    if result.is_ok() {
        write.send(Message::Close(None)).await.ok();
    }
    result
}

/// Render one relay frame, updating the roster and message history.
async fn render_frame(text: &str, nickname: &str, state: &Mutex<ClientState>) -> String {
    match OutboundFrame::parse(text) {
        Ok(OutboundFrame::Users { data_array }) => {
            let output = MessageFormatter::format_roster(&data_array, nickname);
            state.lock().await.roster = data_array;
            output
        }
        Ok(OutboundFrame::Message { data }) => match serde_json::from_str::<ChatMessageDto>(&data) {
            Ok(message) => {
                let id = state.lock().await.history.push(message.clone());
                MessageFormatter::format_chat_message(id, &message)
            }
            Err(_) => MessageFormatter::format_raw_message(text),
        },
        Err(_) => MessageFormatter::format_raw_message(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_render_roster_frame_updates_state() {
        // テスト項目: ロスターフレームを受け取ると表示され、最新のロスターとして保持される
        // given (前提条件):
        let state = Mutex::new(ClientState::default());
        let text = r#"{"messageType":"users","dataArray":["alice","bob"]}"#;

        // when (操作):
        let output = render_frame(text, "bob", &state).await;

        // then (期待する結果):
        assert!(output.contains("Users: alice, bob (me)"));
        assert_eq!(state.lock().await.roster, vec!["alice", "bob"]);
    }

    #[tokio::test]
    async fn test_render_message_frame_numbers_history() {
        // テスト項目: メッセージフレームは履歴に追加され、番号付きで表示される
        // given (前提条件):
        let state = Mutex::new(ClientState::default());
        let text = r#"{"messageType":"message","data":"{\"from\":\"alice\",\"message\":\"hi\",\"time\":1672498800000}"}"#;

        // when (操作):
        let first = render_frame(text, "bob", &state).await;
        let second = render_frame(text, "bob", &state).await;

        // then (期待する結果):
        assert!(first.contains("[#0 "));
        assert!(second.contains("[#1 "));
        assert!(second.contains("alice: hi"));
        assert_eq!(state.lock().await.history.len(), 2);
    }

    #[tokio::test]
    async fn test_render_unparseable_frame_as_raw() {
        // テスト項目: 解釈できないフレームは生のまま表示され、状態は変わらない
        // given (前提条件):
        let state = Mutex::new(ClientState::default());
        let text = "hello?";

        // when (操作):
        let output = render_frame(text, "bob", &state).await;

        // then (期待する結果):
        assert!(output.contains("Received: hello?"));
        assert!(state.lock().await.history.is_empty());
    }
}
