//! WebSocket broadcast relay.
//!
//! Clients register a nickname and exchange messages that are broadcast to every
//! open connection. The roster is re-broadcast whenever it changes.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000
//! PORT=3000 cargo run --bin hiroba-server
//! ```

use std::sync::Arc;

use clap::Parser;
use hiroba_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryParticipantRepository,
    },
    ui::Server,
    usecase::{RegisterParticipantUseCase, SendMessageUseCase, SweepConnectionsUseCase},
};
use hiroba_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "WebSocket broadcast relay with nickname registry", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // 1. Repository (in-memory registry)
    let repository = Arc::new(InMemoryParticipantRepository::default());

    // 2. MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::default());

    // 3. UseCases
    let clock = Arc::new(SystemClock);
    let register_participant_usecase = Arc::new(RegisterParticipantUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock,
    ));
    let sweep_connections_usecase = Arc::new(SweepConnectionsUseCase::new(
        repository,
        message_pusher.clone(),
    ));

    // 4. Create and run the server
    let server = Server::new(
        register_participant_usecase,
        send_message_usecase,
        sweep_connections_usecase,
        message_pusher,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
