//! Archive services consumed by the HTTP boundary and the CLI
//!
//! - `HistoryResolver`: deduplicated snapshot history of one playlist
//! - `Catalog`: title search over the archive's directory listing
//! - `PlaylistService`: current state of one playlist

pub mod catalog;
pub mod history;
pub mod playlist;

use std::sync::Arc;

use spa_core::SearchOptions;
use spa_sources::{BlobProvider, RevisionProvider};
use time::OffsetDateTime;

pub use catalog::Catalog;
pub use history::{CachePolicy, HistoryQuery, HistoryResolver, SnapshotHistory};
pub use playlist::PlaylistService;

/// File layout of the archive repository
#[derive(Debug, Clone)]
pub struct ArchiveLayout {
    /// Branch holding the latest state of every file
    pub branch: String,
    pub playlists_dir: String,
    pub listing_path: String,
    pub listing_heading: String,
}

impl ArchiveLayout {
    /// Deterministic path of a playlist's archived JSON document
    pub fn playlist_path(&self, playlist_id: &str) -> String {
        format!("{}/{}.json", self.playlists_dir.trim_end_matches('/'), playlist_id)
    }
}

impl Default for ArchiveLayout {
    fn default() -> Self {
        Self {
            branch: "main".to_string(),
            playlists_dir: "playlists/pretty".to_string(),
            listing_path: "README.md".to_string(),
            listing_heading: "## Playlists".to_string(),
        }
    }
}

/// All services over one archive
pub struct ArchiveService {
    pub history: HistoryResolver,
    pub catalog: Catalog,
    pub playlists: PlaylistService,
}

impl ArchiveService {
    pub fn new<P>(provider: Arc<P>, layout: ArchiveLayout, epoch: OffsetDateTime, search: SearchOptions) -> Self
    where
        P: RevisionProvider + BlobProvider + 'static,
    {
        let revisions: Arc<dyn RevisionProvider> = provider.clone();
        let blobs: Arc<dyn BlobProvider> = provider;

        Self {
            history: HistoryResolver::new(revisions, blobs.clone(), layout.clone(), epoch),
            catalog: Catalog::new(blobs.clone(), layout.clone(), search),
            playlists: PlaylistService::new(blobs, layout),
        }
    }
}
