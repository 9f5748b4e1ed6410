//! Hiroba relay server library.
//!
//! Clients connect over WebSocket, register a nickname, and exchange short text
//! messages that are fanned out to every open connection. Disconnects are
//! detected by a periodic sweep that reconciles the registry against the
//! transport's open connections.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
