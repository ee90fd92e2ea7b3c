use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use atb_server::atb::{AtbClient, AtbConfig, MockAtbClient};
use atb_server::cache::CachedAtbClient;
use atb_server::config::Cli;
use atb_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        // Configured via RUST_LOG, defaulting to info
        .with(
            tracing_subscriber::fmt::layer().with_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            ),
        )
        .init();

    let cache_config = cli.cache_config();

    let atb = match &cli.mock_data {
        Some(dir) => {
            let mock = MockAtbClient::new(dir).context("failed to set up mock AtB data")?;
            info!(data_dir = %mock.data_dir().display(), "serving mock AtB data");
            CachedAtbClient::new(mock, &cache_config)
        }
        None => {
            let config = AtbConfig::from_file(&cli.config)
                .with_context(|| format!("failed to load {}", cli.config.display()))?
                .with_timeout(cli.timeout_secs);
            info!(url = %config.url, "using AtB InfoTransit");
            let client = AtbClient::new(config).context("failed to create AtB client")?;
            CachedAtbClient::new(client, &cache_config)
        }
    };

    let sweepers = atb.cache().spawn_sweepers(cache_config.cleanup_interval);

    let app = create_router(AppState::new(atb));

    let listener = tokio::net::TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("failed to bind {}", cli.listen))?;
    info!(
        stops_ttl = ?cache_config.stops_ttl,
        departures_ttl = ?cache_config.departures_ttl,
        "listening on http://{}",
        cli.listen
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    for sweeper in sweepers {
        sweeper.abort();
    }
    info!("shut down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Ctrl-C received; shutting down...");
}
