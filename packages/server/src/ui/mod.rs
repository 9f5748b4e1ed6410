//! UI layer: WebSocket endpoint, message routing and the relay event loop.

mod dispatcher;
mod handler;
pub mod router;
mod server;
mod signal;
mod state;
mod sweeper;

pub use router::{DiscardReason, MessageRouter, RouteOutcome};
pub use server::Server;
pub use sweeper::DEFAULT_SWEEP_INTERVAL;
