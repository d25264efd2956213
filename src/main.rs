//! Main entry point for the feed-harvester CLI.

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use feed_harvester::cli::Cli;
use feed_harvester::client::http::SearchHttpClient;
use feed_harvester::client::session::Session;
use feed_harvester::runner::Harvester;
use feed_harvester::shutdown::{SharedShutdown, ShutdownCoordinator};

/// Initialize tracing subscriber with optional JSON formatting.
fn init_tracing() {
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("feed_harvester=info"));

    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    // Ctrl+C stops the run at the next wait boundary, output stays intact
    let shutdown = ShutdownCoordinator::shared();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Ctrl+C received - finishing current step...");
                shutdown.request_shutdown();
            }
        }
    });

    if let Err(e) = run(cli, shutdown).await {
        error!("Run failed: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, shutdown: SharedShutdown) -> anyhow::Result<()> {
    let session = Session::load(&cli.cookies)
        .with_context(|| format!("failed to load session from {}", cli.cookies.display()))?;
    let client = SearchHttpClient::new(cli.base_url.clone(), &session)
        .context("failed to build feed client")?;

    let harvester = Harvester::new(
        client,
        cli.collector_config(),
        cli.output_dir.clone(),
        shutdown,
    );

    let summary = harvester
        .execute(&cli.subject, cli.start_date, cli.resolved_end_date())
        .await?;

    info!(
        total = summary.total_records,
        windows = summary.windows_completed,
        "collection completed"
    );
    Ok(())
}
