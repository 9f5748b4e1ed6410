//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{domain::ConnectionId, ui::state::AppState};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the connection's outbound channel into the WebSocket sink.
///
/// When the socket stops accepting writes the task ends and drops `rx`, which
/// marks the connection as not open for broadcasts and sweeps.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();
    state.message_pusher.register_client(connection_id, tx).await;
    tracing::info!("Connection '{}' opened", connection_id);

    let (sender, mut receiver) = socket.split();
    let dispatcher = state.dispatcher.clone();

    // Inbound frames go to the dispatcher; nothing is processed on this task.
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error on '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received frame from '{}': {}", connection_id, text.as_str());
                    if !dispatcher.submit_frame(connection_id, text.as_str().to_owned()) {
                        break;
                    }
                }
                Message::Binary(data) => {
                    tracing::debug!(
                        "Ignoring {} byte binary frame from '{}'",
                        data.len(),
                        connection_id
                    );
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // The registry is left alone here; the next sweep evicts the participant.
    state.message_pusher.unregister_client(&connection_id).await;
    tracing::info!("Connection '{}' closed", connection_id);
}
