//! Infrastructure layer: wire DTOs and the WebSocket-backed MessagePusher.

pub mod dto;
pub mod message_pusher;
