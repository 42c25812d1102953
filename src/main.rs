//! Site proxy.
//!
//! A transparent reverse proxy in front of a hosted site backend that
//! rewrites a few responses on the way through.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌───────────────────────────────────────────────────┐
//!                        │                    SITE PROXY                     │
//!   Client Request       │  ┌─────────┐    ┌─────────┐    ┌──────────────┐   │
//!   ─────────────────────┼─▶│   net   │───▶│  http   │───▶│   routing    │   │
//!                        │  │listener │    │ server  │    │              │   │
//!                        │  └─────────┘    └─────────┘    └──┬───┬───┬───┘   │
//!                        │                     / → 301 ──────┘   │   │       │
//!                        │                     robots.txt ───────┘   │       │
//!                        │           ┌──────────────┐               │       │
//!                        │           │   sitemap    │◀── sitemap.xml│       │
//!                        │           └──────┬───────┘               ▼       │
//!   Client Response      │  ┌───────────┐   │            ┌──────────────┐   │
//!   ◀────────────────────┼──│ transform │◀──┼────────────│   backend    │◀──┼── Site
//!                        │  │ json/html │   └───────────▶│    client    │───┼─▶ Backend
//!                        │  └───────────┘                └──────────────┘   │
//!                        └───────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use site_proxy::config::loader::load_config;
use site_proxy::lifecycle::{signals, Shutdown};
use site_proxy::observability::{logging, metrics};
use site_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "site-proxy")]
#[command(about = "Branded reverse proxy for a hosted site", long_about = None)]
struct Cli {
    /// TOML configuration file; environment variables override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    logging::init_logging(&config.observability)?;

    tracing::info!("site-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.site.backend_domain(),
        slug = %config.site.slug,
        tls = config.listener.tls.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(&shutdown);

    let tls = config.listener.tls.clone();
    let bind_address: SocketAddr = config.listener.bind_address.parse()?;
    let server = HttpServer::new(config)?;

    match tls {
        Some(tls) => {
            let rustls = site_proxy::net::tls::from_config(&tls).await?;
            server.run_tls(bind_address, rustls, shutdown.subscribe()).await?;
        }
        None => {
            let listener = TcpListener::bind(bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");
            server.run(listener, shutdown.subscribe()).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
