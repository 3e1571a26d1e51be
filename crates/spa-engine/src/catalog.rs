//! Title search over the archive's directory listing

use std::sync::Arc;

use spa_core::{ArchiveEntry, ArchiveError, Result, SearchOptions, TitleMatcher, parse_listing};
use spa_sources::BlobProvider;
use tracing::debug;

use crate::ArchiveLayout;

pub struct Catalog {
    blobs: Arc<dyn BlobProvider>,
    layout: ArchiveLayout,
    matcher: TitleMatcher,
}

impl Catalog {
    pub fn new(blobs: Arc<dyn BlobProvider>, layout: ArchiveLayout, options: SearchOptions) -> Self {
        Self {
            blobs,
            layout,
            matcher: TitleMatcher::new(options),
        }
    }

    /// Every playlist listed on the archive's branch head
    pub async fn entries(&self) -> Result<Vec<ArchiveEntry>> {
        let document = self
            .blobs
            .fetch_blob(&self.layout.branch, &self.layout.listing_path)
            .await
            .map_err(|e| match e {
                ArchiveError::PlaylistNotFound(path) => {
                    ArchiveError::Upstream(format!("Directory listing {} is missing", path))
                }
                other => other,
            })?;

        let entries = parse_listing(&document, &self.layout.listing_heading);
        debug!("Parsed {} archive entries", entries.len());
        Ok(entries)
    }

    pub async fn search(&self, query: &str) -> Result<Vec<ArchiveEntry>> {
        // Skip the listing fetch for queries the matcher rejects outright
        if !self.matcher.accepts(query) {
            return Ok(Vec::new());
        }

        let entries = self.entries().await?;
        Ok(self.matcher.search(query, &entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spa_core::MatchPolicy;
    use spa_sources::StaticArchive;

    const README: &str = "# Archive\n\n## Playlists\n\n\
        - [Today's Top Hits](/playlists/pretty/tth.md)\n\
        - [RapCaviar](/playlists/pretty/rc.md)\n\
        - [Hit Rewind](/playlists/pretty/hr.md)\n";

    fn catalog(archive: StaticArchive, options: SearchOptions) -> Catalog {
        Catalog::new(Arc::new(archive), ArchiveLayout::default(), options)
    }

    #[tokio::test]
    async fn test_search_fuzzy() {
        let catalog = catalog(
            StaticArchive::new().with_blob("main", "README.md", README),
            SearchOptions::default(),
        );

        let results = catalog.search("rap caviar").await.unwrap();
        assert_eq!(results[0], ArchiveEntry::new("RapCaviar", "rc"));
    }

    #[tokio::test]
    async fn test_short_query_skips_listing() {
        // No listing available: a fetch would fail
        let catalog = catalog(StaticArchive::new(), SearchOptions::default());
        assert!(catalog.search("hi").await.unwrap().is_empty());
        assert!(matches!(
            catalog.search("hits").await,
            Err(ArchiveError::Upstream(_))
        ));
    }

    #[tokio::test]
    async fn test_search_phrases() {
        let catalog = catalog(
            StaticArchive::new().with_blob("main", "README.md", README),
            SearchOptions {
                policy: MatchPolicy::Phrases,
                ..Default::default()
            },
        );

        let results = catalog.search("hit").await.unwrap();
        let ids: Vec<&str> = results.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["tth", "hr"]);
    }

    #[tokio::test]
    async fn test_listing_without_section() {
        let catalog = catalog(
            StaticArchive::new().with_blob("main", "README.md", "# Nothing here\n"),
            SearchOptions::default(),
        );
        assert!(catalog.entries().await.unwrap().is_empty());
        assert!(catalog.search("anything").await.unwrap().is_empty());
    }
}
