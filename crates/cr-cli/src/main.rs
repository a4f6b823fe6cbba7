mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cr_config::Config;
use cr_engine::RatingEngine;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(db) = cli.db {
        config.storage.database_path = Some(db);
    }

    // Open the engine once (creates the database and table if needed)
    let engine = RatingEngine::open(&config).await?;
    tracing::debug!(codes = engine.table().len(), "rating engine ready");

    match cli.command {
        cli::Commands::Classify { text } => commands::classify::handle(&engine, &text),
        cli::Commands::Rating(cmd) => commands::rating::handle(cmd, &engine).await,
        cli::Commands::Markers(cmd) => commands::markers::handle(cmd, &engine).await,
        cli::Commands::Redact {
            input,
            allow,
            anonymous,
            report,
        } => commands::redact::handle(&engine, &input, &allow, anonymous, report),
        cli::Commands::Config => commands::show_config(&config),
    }
}
