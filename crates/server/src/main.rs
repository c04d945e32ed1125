//! kex server - post-quantum key exchange over HTTP
//!
//! Serves the three KEM protocol operations (generate, encapsulate,
//! decapsulate) as a JSON API backed by ML-KEM-512. Keys, ciphertexts and
//! secrets are carried by the caller; the server keeps nothing between
//! requests.

use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use service::{http, Config, ServiceState};

/// kex server - post-quantum key exchange over HTTP
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on for HTTP requests
    #[arg(short, long, default_value = "5000")]
    port: u16,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Permit the insecure shape-only fallback provider when the real
    /// KEM primitive is not compiled in
    #[arg(long)]
    allow_insecure_fallback: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    let log_level: tracing::Level = args.log_level.parse().unwrap_or(tracing::Level::INFO);
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(non_blocking_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stderr_layer).init();

    tracing::info!("starting kex server");

    // Create configuration
    let listen_addr = SocketAddr::from_str(&format!("0.0.0.0:{}", args.port))?;
    let mut config = Config::default();
    config.api_listen_addr = Some(listen_addr);
    config.allow_insecure_fallback = args.allow_insecure_fallback;
    config.log_level = log_level;

    // Create state; this is where the provider selection happens, once,
    // before any request is served
    let state = match ServiceState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("failed to create service state: {}", e);
            std::process::exit(1);
        }
    };

    // Set up graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let graceful_shutdown = async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl+c");
        tracing::info!("received shutdown signal");
        let _ = shutdown_tx.send(());
    };
    tokio::spawn(graceful_shutdown);

    let http_config = http::Config {
        listen_addr,
        log_level,
    };

    http::run(http_config, state, shutdown_rx).await?;

    tracing::info!("server shutdown complete");
    Ok(())
}
