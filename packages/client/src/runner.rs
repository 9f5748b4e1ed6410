//! Client execution logic with reconnection support.

use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;

use super::{
    domain::{ClientState, should_attempt_reconnect},
    error::ClientError,
    session::run_client_session,
    ui::spawn_line_reader,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the WebSocket client with reconnection logic
///
/// The attempt counter starts over whenever a session had connected successfully.
pub async fn run_client(url: String, nickname: String) -> Result<(), ClientError> {
    let state = Arc::new(Mutex::new(ClientState::default()));
    let mut input_rx = spawn_line_reader(&nickname);
    let mut failed_attempts = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            url,
            nickname,
            failed_attempts + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        let error = match run_client_session(&url, &nickname, &state, &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) => e,
        };

        tracing::warn!("{}", error);
        if matches!(error, ClientError::ConnectionLost) {
            failed_attempts = 0;
        }
        failed_attempts += 1;

        if !should_attempt_reconnect(&error, failed_attempts, MAX_RECONNECT_ATTEMPTS) {
            tracing::error!(
                "Giving up after {} failed attempt(s). Exiting.",
                failed_attempts
            );
            return Err(error);
        }

        tracing::info!(
            "Reconnecting in {} seconds... (attempt {}/{})",
            RECONNECT_INTERVAL_SECS,
            failed_attempts + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
    }
}
