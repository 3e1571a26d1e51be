//! Snapshot domain model

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{PlaylistDocument, Revision};

/// A playlist snapshot as observed at one revision of the archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    /// Identifier assigned by the streaming service, not the revision hash
    pub snapshot_id: String,
    pub revision_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub captured_at: OffsetDateTime,
    pub follower_count: Option<u64>,
}

impl SnapshotRecord {
    /// Pair a fetched playlist document with the revision it came from
    pub fn from_revision(revision: &Revision, document: &PlaylistDocument) -> Self {
        Self {
            snapshot_id: document.snapshot_id.clone(),
            revision_hash: revision.content_hash.clone(),
            captured_at: revision.captured_at,
            follower_count: document.num_followers,
        }
    }
}
