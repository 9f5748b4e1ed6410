//! Request handlers

pub mod websocket;
