//! Playlist command - latest archived state

use anyhow::Result;
use spa_config::Config;

pub async fn handle(config: &Config, playlist: &str, format: &str) -> Result<()> {
    let playlist_id = super::playlist_ref(playlist)?;
    let service = super::build_service(config)?;
    let summary = service.playlists.current(&playlist_id).await?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        _ => {
            println!("{}", summary.title);
            if !summary.description.is_empty() {
                println!("{}", summary.description);
            }
            println!();
            println!("ID:        {}", summary.id);
            println!("Snapshot:  {}", summary.snapshot_id);
            match summary.follower_count {
                Some(count) => println!("Followers: {}", count),
                None => println!("Followers: unknown"),
            }
            println!("Tracks:    {}", summary.track_count);
            if !summary.url.is_empty() {
                println!("URL:       {}", summary.url);
            }
        }
    }

    Ok(())
}
