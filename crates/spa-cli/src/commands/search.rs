//! Search command - find archived playlists by title

use anyhow::Result;
use spa_config::Config;

pub async fn handle(config: &Config, query: &str, format: &str) -> Result<()> {
    let service = super::build_service(config)?;
    let results = service.catalog.search(query).await?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        _ => {
            if results.is_empty() {
                println!("No archived playlists match '{}'.", query);
            } else {
                for (i, entry) in results.iter().enumerate() {
                    println!("{}. {} ({})", i + 1, entry.name, entry.id);
                }
            }
        }
    }

    Ok(())
}
