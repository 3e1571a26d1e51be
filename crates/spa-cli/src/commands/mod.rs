pub mod config;
pub mod history;
pub mod playlist;
pub mod resolve;
pub mod search;
pub mod serve;

use std::sync::Arc;

use anyhow::Result;
use spa_config::Config;
use spa_core::parse_playlist_url;
use spa_engine::{ArchiveLayout, ArchiveService};
use spa_sources::{GitHubArchive, GitHubSettings};

/// Wire the GitHub-backed archive services from config
pub fn build_service(config: &Config) -> Result<Arc<ArchiveService>> {
    let archive = &config.archive;

    let settings = GitHubSettings {
        api_base: archive.api_base.clone(),
        raw_base: archive.raw_base.clone(),
        owner: archive.owner.clone(),
        repo: archive.repo.clone(),
        commit_author: archive.commit_author.clone(),
        token: archive.github_token.clone(),
        user_agent: archive.user_agent.clone(),
        timeout: archive.timeout(),
    };
    let layout = ArchiveLayout {
        branch: archive.branch.clone(),
        playlists_dir: archive.playlists_dir.clone(),
        listing_path: archive.listing_path.clone(),
        listing_heading: archive.listing_heading.clone(),
    };

    let provider = Arc::new(GitHubArchive::new(settings)?);
    Ok(Arc::new(ArchiveService::new(
        provider,
        layout,
        archive.epoch()?,
        config.search.options(),
    )))
}

/// Accept either a bare playlist ID or a sharing URL
pub fn playlist_ref(input: &str) -> Result<String> {
    let input = input.trim();
    if input.contains("://") {
        Ok(parse_playlist_url(input)?)
    } else {
        Ok(input.to_string())
    }
}
