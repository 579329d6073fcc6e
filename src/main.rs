//! fc-runtime entry point.
//!
//! Usage:
//!   fc-runtime                  # port 9000, 4 worker threads
//!   fc-runtime 9001             # custom port
//!   fc-runtime 9001 8           # custom port and worker threads

use clap::Parser;
use fc_runtime::echo::{EchoHandler, EchoHttpHandler};
use fc_runtime::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fc-runtime", about = "Function Compute custom-runtime server")]
struct Cli {
    /// Port to listen on
    #[arg(default_value_t = 9000)]
    port: u16,

    /// Number of worker threads
    #[arg(default_value_t = 4)]
    threads: usize,

    /// Address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RuntimeConfig::new()
        .host(cli.host)
        .port(cli.port)
        .worker_threads(cli.threads);

    // Registration completes before the listener exists.
    let registry = HandlerRegistry::new()
        .with_invocation_handler(Arc::new(EchoHandler::new()))?
        .with_http_handler(Arc::new(EchoHttpHandler::new()))?;

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .enable_all()
        .build()?
        .block_on(async move {
            tracing::info!(
                "Starting fc-runtime on {} with {} worker threads",
                config.bind_addr(),
                config.worker_threads
            );
            RuntimeServer::new(config, registry).run().await
        })
}
