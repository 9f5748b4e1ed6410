//! Terminal client for the Hiroba relay.

pub mod domain;
pub mod error;
pub mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
