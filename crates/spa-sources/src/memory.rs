//! In-memory archive for tests and offline use

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use spa_core::{ArchiveError, DateWindow, Result, Revision, RevisionPage};

use crate::provider::{BlobProvider, RevisionProvider};

/// A fixed archive: per-path revision lists plus blob contents.
///
/// Revisions are kept in insertion order and listed newest first only if
/// they were inserted that way, mirroring the provider contract.
#[derive(Debug, Clone, Default)]
pub struct StaticArchive {
    revisions: HashMap<String, Vec<Revision>>,
    blobs: HashMap<(String, String), String>,
    failing: HashSet<String>,
    etag: Option<String>,
    listing_fails: bool,
}

impl StaticArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a revision of `resource_path` along with its content
    pub fn with_revision(
        mut self,
        resource_path: &str,
        revision: Revision,
        content: impl Into<String>,
    ) -> Self {
        self.blobs.insert(
            (revision.content_hash.clone(), resource_path.to_string()),
            content.into(),
        );
        self.revisions
            .entry(resource_path.to_string())
            .or_default()
            .push(revision);
        self
    }

    /// Content reachable by revision or branch name, without history
    pub fn with_blob(mut self, revision: &str, resource_path: &str, content: impl Into<String>) -> Self {
        self.blobs
            .insert((revision.to_string(), resource_path.to_string()), content.into());
        self
    }

    /// Make every fetch at `revision` fail with an upstream error
    pub fn failing_revision(mut self, revision: &str) -> Self {
        self.failing.insert(revision.to_string());
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }
}

#[async_trait]
impl RevisionProvider for StaticArchive {
    async fn list_revisions(
        &self,
        resource_path: &str,
        window: &DateWindow,
    ) -> Result<RevisionPage> {
        if self.listing_fails {
            return Err(ArchiveError::Upstream(format!(
                "listing unavailable for {}",
                resource_path
            )));
        }

        let revisions = self
            .revisions
            .get(resource_path)
            .map(|all| {
                all.iter()
                    .filter(|revision| window.contains(revision.captured_at))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let page = RevisionPage::new(revisions);
        Ok(match &self.etag {
            Some(etag) => page.with_etag(etag.clone()),
            None => page,
        })
    }
}

#[async_trait]
impl BlobProvider for StaticArchive {
    async fn fetch_blob(&self, revision: &str, resource_path: &str) -> Result<String> {
        if self.failing.contains(revision) {
            return Err(ArchiveError::Upstream(format!("HTTP error 502: {}", revision)));
        }

        self.blobs
            .get(&(revision.to_string(), resource_path.to_string()))
            .cloned()
            .ok_or_else(|| ArchiveError::PlaylistNotFound(resource_path.to_string()))
    }
}
