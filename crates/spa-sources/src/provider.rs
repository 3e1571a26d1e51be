//! Provider traits

use async_trait::async_trait;
use spa_core::{DateWindow, Result, RevisionPage};

/// Commit history of archived files
#[async_trait]
pub trait RevisionProvider: Send + Sync {
    /// Revisions touching `resource_path` captured within `window`,
    /// newest first.
    async fn list_revisions(&self, resource_path: &str, window: &DateWindow)
    -> Result<RevisionPage>;
}

/// Content of archived files
#[async_trait]
pub trait BlobProvider: Send + Sync {
    /// Raw content of `resource_path` at `revision` (a commit hash or branch).
    ///
    /// A missing file is `ArchiveError::PlaylistNotFound`; any other failure
    /// is `ArchiveError::Upstream`.
    async fn fetch_blob(&self, revision: &str, resource_path: &str) -> Result<String>;
}
