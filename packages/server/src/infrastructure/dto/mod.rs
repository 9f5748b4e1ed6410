//! Data Transfer Objects (DTOs) for the relay protocol.
//!
//! - `websocket`: WebSocket frame DTOs
//! - `conversion`: DTO ↔ domain conversion, including the nested JSON payloads

pub mod conversion;
pub mod websocket;
