//! Server execution logic.

use std::{future::Future, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::{
    domain::MessagePusher,
    usecase::{RegisterParticipantUseCase, SendMessageUseCase, SweepConnectionsUseCase},
};

use super::{
    dispatcher::Dispatcher,
    handler::websocket::websocket_handler,
    router::MessageRouter,
    signal::shutdown_signal,
    state::AppState,
    sweeper::{DEFAULT_SWEEP_INTERVAL, LivenessSweeper},
};

/// WebSocket broadcast relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     register_participant_usecase,
///     send_message_usecase,
///     sweep_connections_usecase,
///     message_pusher,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    register_participant_usecase: Arc<RegisterParticipantUseCase>,
    send_message_usecase: Arc<SendMessageUseCase>,
    sweep_connections_usecase: Arc<SweepConnectionsUseCase>,
    /// トランスポート層の接続集合（WebSocket ハンドラが登録・解除する）
    message_pusher: Arc<dyn MessagePusher>,
    sweep_interval: Duration,
}

impl Server {
    pub fn new(
        register_participant_usecase: Arc<RegisterParticipantUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        sweep_connections_usecase: Arc<SweepConnectionsUseCase>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            register_participant_usecase,
            send_message_usecase,
            sweep_connections_usecase,
            message_pusher,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    /// Override the period of the liveness sweep.
    pub fn with_sweep_interval(mut self, sweep_interval: Duration) -> Self {
        self.sweep_interval = sweep_interval;
        self
    }

    /// Run the relay until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// The dispatcher and the liveness sweeper live exactly as long as this call.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();

        let router = MessageRouter::new(
            self.register_participant_usecase,
            self.send_message_usecase,
            self.sweep_connections_usecase,
        );
        let (dispatcher, dispatcher_handle) = Dispatcher::new(router);
        let dispatcher_task = tokio::spawn(dispatcher.run(cancel.clone()));

        let sweeper = LivenessSweeper::new(self.sweep_interval, dispatcher_handle.clone());
        let sweeper_task = tokio::spawn(sweeper.run(cancel.clone()));

        let app_state = Arc::new(AppState {
            dispatcher: dispatcher_handle,
            message_pusher: self.message_pusher,
        });

        let app = Router::new()
            .route("/", get(websocket_handler))
            .route("/ws", get(websocket_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        tracing::info!(
            "WebSocket relay server listening on {}",
            listener.local_addr()?
        );

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        cancel.cancel();
        if let Err(e) = dispatcher_task.await {
            tracing::warn!("Dispatcher task ended abnormally: {}", e);
        }
        if let Err(e) = sweeper_task.await {
            tracing::warn!("Sweeper task ended abnormally: {}", e);
        }

        tracing::info!("Server shutdown complete");
        result
    }
}
