//! apibind server binary.
//!
//! Serves the bundled greeting service behind the axum adapter.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use apibind::config::{load_config, ServerConfig};
use apibind::hello::hello_controller;
use apibind::lifecycle::{shutdown_on_signal, Shutdown};
use apibind::observability::init_logging;
use apibind::{Dispatcher, HttpServer};

#[derive(Parser)]
#[command(name = "apibind")]
#[command(about = "Serve declaratively defined HTTP APIs", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Add `Access-Control-Allow-Origin: *` to every response.
    #[arg(long)]
    cors: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if cli.cors {
        config = config.with_cors();
    }

    init_logging(&config.observability)?;

    tracing::info!("apibind v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_body_bytes = config.limits.max_body_bytes,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let dispatcher = Dispatcher::builder().controller(hello_controller()?).build()?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let signalled = shutdown.signalled();
    shutdown_on_signal(Arc::clone(&shutdown));

    let server = HttpServer::new(config, dispatcher);
    server.run(listener, signalled).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
