//! bough broadcast server.
//!
//! Accepts replies to a tree-structured conversation and broadcasts them to
//! every connected client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin bough-server
//! cargo run --bin bough-server -- --host 0.0.0.0 --port 7777 --recents 20
//! ```

use std::num::NonZeroUsize;

use bough_server::ui::Server;
use bough_shared::logger::setup_logger;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bough-server")]
#[command(about = "Tree-structured chat broadcast server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "7777")]
    port: u16,

    /// Number of recent message ids sent to newly connected clients
    #[arg(short = 'r', long, default_value = "10")]
    recents: NonZeroUsize,

    /// Content of the root message created at startup
    #[arg(long, default_value = "Root message")]
    root_content: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let server = match Server::bootstrap(args.recents, &args.root_content).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to create root message: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
