//! History command - snapshot history of one playlist

use anyhow::Result;
use spa_config::Config;
use spa_engine::HistoryQuery;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub fn build_query(
    year: Option<String>,
    month: Option<String>,
    since: Option<String>,
    until: Option<String>,
    allow_duplicates: bool,
) -> HistoryQuery {
    HistoryQuery {
        year,
        month,
        since_date: since,
        until_date: until,
        allow_duplicates: allow_duplicates.then(|| "yes".to_string()),
    }
}

pub async fn handle(config: &Config, playlist: &str, query: HistoryQuery, format: &str) -> Result<()> {
    let playlist_id = super::playlist_ref(playlist)?;
    let service = super::build_service(config)?;
    let history = service.history.resolve(&playlist_id, &query).await?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&history.entries)?);
        }
        _ => {
            println!(
                "History of {} from {} to {}",
                history.playlist_id,
                timestamp(history.window.since),
                timestamp(history.window.until)
            );
            println!("{} snapshots\n", history.entries.len());

            for entry in &history.entries {
                let followers = entry
                    .follower_count
                    .map(|count| count.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{}  {}  followers: {}  (revision {})",
                    timestamp(entry.captured_at),
                    entry.snapshot_id,
                    followers,
                    short_hash(&entry.revision_hash)
                );
            }
        }
    }

    Ok(())
}

fn timestamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_else(|_| at.to_string())
}

fn short_hash(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}
