use std::sync::Arc;

use spa_core::{ArchiveError, PlaylistDocument, PlaylistSummary, Result};
use spa_sources::BlobProvider;

use crate::ArchiveLayout;

/// Latest archived state of individual playlists
pub struct PlaylistService {
    blobs: Arc<dyn BlobProvider>,
    layout: ArchiveLayout,
}

impl PlaylistService {
    pub fn new(blobs: Arc<dyn BlobProvider>, layout: ArchiveLayout) -> Self {
        Self { blobs, layout }
    }

    pub async fn current(&self, playlist_id: &str) -> Result<PlaylistSummary> {
        let content = self
            .blobs
            .fetch_blob(&self.layout.branch, &self.layout.playlist_path(playlist_id))
            .await
            .map_err(|e| match e {
                ArchiveError::PlaylistNotFound(_) => {
                    ArchiveError::PlaylistNotFound(playlist_id.to_string())
                }
                other => other,
            })?;

        let document: PlaylistDocument = serde_json::from_str(&content)?;
        Ok(PlaylistSummary::from_document(playlist_id, &document))
    }
}
