//! Terminal chat client for the Hiroba relay.
//!
//! Registers a nickname, prints the roster and incoming messages, and sends
//! each input line as a message. `/reply <n> <text>` replies to message `#n`.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-client -- --nickname Alice
//! cargo run --bin hiroba-client -- -n Bob -u ws://127.0.0.1:3000/ws
//! ```

use clap::Parser;
use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroba-client")]
#[command(about = "Terminal client for the Hiroba WebSocket relay", long_about = None)]
struct Args {
    /// Nickname to register with
    #[arg(short = 'n', long)]
    nickname: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = hiroba_client::run_client(args.url, args.nickname).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
