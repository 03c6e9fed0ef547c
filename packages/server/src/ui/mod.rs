//! HTTP / WebSocket server.

mod config;
mod handler;
mod server;
mod signal;
mod state;

pub use config::ServerConfig;
pub use server::{Server, ServerError};
