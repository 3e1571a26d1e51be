use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Invalid playlist URL: {0}")]
    InvalidPlaylistUrl(String),

    #[error("No archive entries for playlist {playlist_id} in the requested window")]
    NoArchiveEntries { playlist_id: String },

    #[error("Failed to fetch snapshot at revision {revision}: {reason}")]
    SnapshotFetchFailed { revision: String, reason: String },

    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
