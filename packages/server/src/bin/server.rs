//! Stagesync sync server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin stagesync-server
//! cargo run --bin stagesync-server -- --host 127.0.0.1 --port 3001 --allowed-origin http://localhost:3000
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use stagesync_server::{
    domain::Session,
    infrastructure::message_pusher::WebSocketMessagePusher,
    ui::{Server, ServerConfig},
    usecase::BroadcastCoordinator,
};
use stagesync_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "stagesync-server")]
#[command(about = "Shared-state sync server for musicians on stage", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = ServerConfig::DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = ServerConfig::DEFAULT_PORT)]
    port: u16,

    /// Origin allowed by CORS (`*` allows any origin)
    #[arg(long, env = "ALLOWED_ORIGIN", default_value = ServerConfig::ANY_ORIGIN)]
    allowed_origin: String,

    /// Directory of the built web client, served for every other path
    #[arg(long, env = "STATIC_DIR", default_value = ServerConfig::DEFAULT_STATIC_DIR)]
    static_dir: PathBuf,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            allowed_origin: args.allowed_origin,
            static_dir: args.static_dir,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = ServerConfig::from(Args::parse());

    // Initialize dependencies in order:
    // 1. MessagePusher
    // 2. Broadcast Coordinator (owns the session)
    // 3. Server

    // 1. Create MessagePusher (WebSocket implementation)
    let message_pusher = Box::new(WebSocketMessagePusher::new());

    // 2. Start the coordinator event loop
    let coordinator =
        BroadcastCoordinator::new(Session::new(), message_pusher, Arc::new(SystemClock)).spawn();

    // 3. Create and run the server
    let server = Server::new(coordinator, config);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
