// Household Manager - Web Server

use anyhow::{Context, Result};
use clap::Parser;
use household::{router, AppState, Household, Settings};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "household-server", version, about = "Household Manager web front-end")]
struct Args {
    /// Settings file (defaults to ./household.toml when present)
    #[arg(long, env = "HOUSEHOLD_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, overriding `server.bind`
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref()).context("Failed to load settings")?;
    if let Some(bind) = args.bind {
        settings.server.bind = bind;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_directive()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let household =
        Household::load(settings.app.data_dir.as_deref()).context("Failed to load household data")?;
    tracing::info!(
        expenses = household.expenses.len(),
        tasks = household.tasks.len(),
        "household data loaded"
    );

    let addr = settings.server.bind.clone();
    let app = router(AppState::new(household, settings));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    tracing::info!("🚀 Server running on http://{addr}");
    tracing::info!("   API: http://{addr}/api/expenses");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
