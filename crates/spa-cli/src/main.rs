mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use spa_config::{Config, TOKEN_ENV};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?.with_env_overrides(std::env::var(TOKEN_ENV).ok()),
        None => Config::load()?,
    };

    match cli.command {
        cli::Commands::Serve { port, host } => commands::serve::handle(&config, host, port).await,
        cli::Commands::History {
            playlist,
            year,
            month,
            since,
            until,
            allow_duplicates,
            format,
        } => {
            let query = commands::history::build_query(year, month, since, until, allow_duplicates);
            commands::history::handle(&config, &playlist, query, &format).await
        }
        cli::Commands::Search { query, format } => {
            commands::search::handle(&config, &query, &format).await
        }
        cli::Commands::Resolve { url } => commands::resolve::handle(&url),
        cli::Commands::Playlist { playlist, format } => {
            commands::playlist::handle(&config, &playlist, &format).await
        }
        cli::Commands::Config => commands::config::handle(&config, cli.config.as_deref()),
    }
}
