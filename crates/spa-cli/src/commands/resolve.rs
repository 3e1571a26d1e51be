//! Resolve command - sharing URL to playlist ID

use anyhow::Result;
use spa_core::parse_playlist_url;

pub fn handle(url: &str) -> Result<()> {
    println!("{}", parse_playlist_url(url.trim())?);
    Ok(())
}
