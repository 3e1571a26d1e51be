//! Revision domain model

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One historical version of a playlist file in the archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub content_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub captured_at: OffsetDateTime,
}

impl Revision {
    pub fn new(content_hash: impl Into<String>, captured_at: OffsetDateTime) -> Self {
        Self {
            content_hash: content_hash.into(),
            captured_at,
        }
    }
}

/// Revisions returned by a single listing call, newest first
#[derive(Debug, Clone, Default)]
pub struct RevisionPage {
    pub revisions: Vec<Revision>,
    /// Validator of the upstream listing, forwarded to HTTP clients
    pub etag: Option<String>,
}

impl RevisionPage {
    pub fn new(revisions: Vec<Revision>) -> Self {
        Self {
            revisions,
            etag: None,
        }
    }

    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }
}
