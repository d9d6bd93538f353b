//! bough command-line client with reconnection support.
//!
//! Connects to a bough server, shows the thread ending at the newest
//! message, and lets you walk the tree and reply.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin bough-client -- --author alice
//! cargo run --bin bough-client -- -u ws://127.0.0.1:7777/ws -a bob
//! ```

use bough_shared::logger::setup_logger;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bough-client")]
#[command(about = "Tree-structured chat client", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:7777/ws")]
    url: String,

    /// Name attached to messages you send
    #[arg(short = 'a', long, default_value = "anonymous")]
    author: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = bough_client::run_client(args.url, args.author).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
