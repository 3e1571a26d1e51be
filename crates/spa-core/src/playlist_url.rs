//! Playlist sharing URL parsing

use url::Url;

use crate::{ArchiveError, Result};

/// Host of the streaming service's public sharing links
pub const PLAYLIST_HOST: &str = "open.spotify.com";

const COLLECTION_SEGMENT: &str = "playlist";

/// Extracts playlist identifiers from sharing URLs of one host
#[derive(Debug, Clone)]
pub struct PlaylistUrlParser {
    host: String,
}

impl PlaylistUrlParser {
    pub fn new() -> Self {
        Self::with_host(PLAYLIST_HOST)
    }

    pub fn with_host(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    /// Accepts `https://<host>/playlist/<id>` (query and fragment ignored).
    /// The path must be exactly two non-empty segments.
    pub fn parse(&self, input: &str) -> Result<String> {
        let invalid = || ArchiveError::InvalidPlaylistUrl(input.to_string());

        let url = Url::parse(input.trim()).map_err(|_| invalid())?;
        if url.host_str() != Some(self.host.as_str()) {
            return Err(invalid());
        }

        let segments: Vec<&str> = url
            .path_segments()
            .ok_or_else(invalid)?
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            [collection, playlist_id] if *collection == COLLECTION_SEGMENT => {
                Ok((*playlist_id).to_string())
            }
            _ => Err(invalid()),
        }
    }
}

impl Default for PlaylistUrlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a sharing URL against the default host
pub fn parse_playlist_url(input: &str) -> Result<String> {
    PlaylistUrlParser::new().parse(input)
}

/// Optional-returning variant for presentation code that falls back silently
pub fn playlist_id_from_url(input: &str) -> Option<String> {
    parse_playlist_url(input).ok()
}
