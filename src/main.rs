//! Trace ID injecting proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                trace-injector                 │
//!   Client Request    │  ┌─────────┐   ┌──────────────┐   ┌────────┐  │
//!   ──────────────────┼─▶│  http   │──▶│ trust check  │──▶│forward │──┼──▶ Upstream
//!                     │  │ server  │   │ + trace id   │   │/inspect│  │
//!                     │  └─────────┘   └──────────────┘   └────────┘  │
//!                     │                                               │
//!                     │  config (TOML, hot reload) · logging · metrics│
//!                     └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use trace_injector::config::{load_config, watcher::ConfigWatcher};
use trace_injector::http::HttpServer;
use trace_injector::lifecycle::{wait_for_termination, Shutdown};
use trace_injector::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "trace-injector")]
#[command(about = "HTTP proxy that assigns trace IDs to requests from untrusted origins", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "trace-injector.toml")]
    config: PathBuf,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,

    /// Reload the trace_id settings when the configuration file changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    logging::init_logging(&config.observability);

    if cli.check {
        tracing::info!(path = ?cli.config, "Configuration is valid");
        return Ok(());
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = ?config.upstream.address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validation already checked the address.
        if let Ok(addr) = config.observability.metrics_address.parse::<SocketAddr>() {
            metrics::init_metrics(addr);
        }
    }

    let (watcher, config_updates) = ConfigWatcher::new(&cli.config);
    let _watch_handle = if cli.watch { Some(watcher.run()?) } else { None };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_termination().await;
        signal_shutdown.trigger();
    });

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
