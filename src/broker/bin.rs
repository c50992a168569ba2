//! Lockbroker daemon binary
//!
//! A WebSocket server that grants exclusive locks on named resources to
//! multiple clients, with FIFO waiter queues and deferred grant delivery.
//!
//! # Usage
//!
//! ```bash
//! lockbroker-daemon --port 5555
//! lockbroker-daemon --port 5555 --host 127.0.0.1
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use lockbroker::broker::{dispatch, handle_connection, ReplyRouter};

/// Lock broker daemon
#[derive(Parser, Debug)]
#[command(name = "lockbroker-daemon")]
#[command(about = "Centralized lock broker for named resources")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5555")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lockbroker=info".parse().unwrap())
                .add_directive("lockbroker_daemon=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;

    // All resource state lives behind this one loop; connection tasks only
    // shuttle frames in and out
    let router = Arc::new(ReplyRouter::new());
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    tokio::spawn(dispatch::run(inbound_rx, Arc::clone(&router)));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Lock broker listening on ws://{}", addr);

    // Accept connections forever; a failed accept never takes the broker down
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                tracing::debug!("Accepted connection from {}", peer);
                let router = Arc::clone(&router);
                let inbound = inbound_tx.clone();
                tokio::spawn(async move {
                    handle_connection(stream, router, inbound).await;
                });
            }
            Err(e) => {
                tracing::error!("Failed to accept connection: {}", e);
            }
        }
    }
}
