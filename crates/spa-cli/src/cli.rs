use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spa")]
#[command(about = "Browse the history of archived playlists", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        #[arg(long)]
        port: Option<u16>,

        #[arg(long)]
        host: Option<String>,
    },

    /// Show the snapshot history of a playlist
    History {
        /// Playlist ID or sharing URL
        playlist: String,

        /// Year of the window (default: current year)
        #[arg(long)]
        year: Option<String>,

        /// Month of the window, 1-12 (default: current month)
        #[arg(long)]
        month: Option<String>,

        /// Start of a custom range (YYYY-MM-DD or RFC 3339), overrides year/month
        #[arg(long)]
        since: Option<String>,

        /// End of a custom range (default: now)
        #[arg(long)]
        until: Option<String>,

        /// Keep consecutive captures of the same snapshot
        #[arg(long)]
        allow_duplicates: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Search archived playlists by title
    Search {
        /// Title or fragment to look for
        query: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Extract the playlist ID from a sharing URL
    Resolve {
        url: String,
    },

    /// Show the latest archived state of a playlist
    Playlist {
        /// Playlist ID or sharing URL
        playlist: String,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Print the config file location and effective settings
    Config,
}
