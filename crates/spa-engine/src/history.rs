//! Snapshot history resolution
//!
//! query -> window -> revision listing -> concurrent blob fetches ->
//! snapshot records -> (optional) dedup -> cacheable history.

use std::sync::Arc;

use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use spa_core::{
    ArchiveError, DateWindow, MonthQuery, PlaylistDocument, RangeQuery, Result, Revision,
    SnapshotRecord, dedup_snapshots,
};
use spa_sources::{BlobProvider, RevisionProvider};
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::ArchiveLayout;

/// Raw query parameters of the history endpoint.
///
/// `sinceDate`/`untilDate` take precedence over `year`/`month` when either
/// is present.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub since_date: Option<String>,
    #[serde(default)]
    pub until_date: Option<String>,
    #[serde(default)]
    pub allow_duplicates: Option<String>,
}

impl HistoryQuery {
    pub fn window(&self, epoch: OffsetDateTime, now: OffsetDateTime) -> DateWindow {
        let range = RangeQuery {
            since_date: self.since_date.clone(),
            until_date: self.until_date.clone(),
        };
        if range.is_empty() {
            let month = MonthQuery {
                year: self.year.clone(),
                month: self.month.clone(),
            };
            DateWindow::from_month_query(&month, epoch, now)
        } else {
            DateWindow::from_range_query(&range, epoch, now)
        }
    }

    /// Duplicates are opt-in: `yes`, `true` or `1`
    pub fn allow_duplicates(&self) -> bool {
        matches!(
            self.allow_duplicates.as_deref().map(str::trim),
            Some("yes" | "true" | "1")
        )
    }
}

/// Cache lifetime of a history response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// The window is over; its history can no longer change
    Immutable,
    /// The window includes the present; refresh daily
    Daily,
}

impl CachePolicy {
    pub fn for_window(window: &DateWindow, now: OffsetDateTime) -> Self {
        if window.is_closed(now) {
            CachePolicy::Immutable
        } else {
            CachePolicy::Daily
        }
    }

    /// `Cache-Control` header value
    pub fn header_value(&self) -> &'static str {
        match self {
            CachePolicy::Immutable => "public, max-age=31536000, immutable",
            CachePolicy::Daily => "public, max-age=86400",
        }
    }
}

/// Resolved history of one playlist within one window
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    pub playlist_id: String,
    pub window: DateWindow,
    pub entries: Vec<SnapshotRecord>,
    pub cache_policy: CachePolicy,
    pub etag: Option<String>,
}

pub struct HistoryResolver {
    revisions: Arc<dyn RevisionProvider>,
    blobs: Arc<dyn BlobProvider>,
    layout: ArchiveLayout,
    epoch: OffsetDateTime,
}

impl HistoryResolver {
    pub fn new(
        revisions: Arc<dyn RevisionProvider>,
        blobs: Arc<dyn BlobProvider>,
        layout: ArchiveLayout,
        epoch: OffsetDateTime,
    ) -> Self {
        Self {
            revisions,
            blobs,
            layout,
            epoch,
        }
    }

    pub async fn resolve(&self, playlist_id: &str, query: &HistoryQuery) -> Result<SnapshotHistory> {
        self.resolve_at(playlist_id, query, OffsetDateTime::now_utc())
            .await
    }

    /// Resolve relative to a fixed "now"
    ///
    /// Fails with `NoArchiveEntries` when the window holds no revisions and
    /// with `SnapshotFetchFailed` as soon as any single snapshot cannot be
    /// fetched or decoded; partial histories are never returned.
    pub async fn resolve_at(
        &self,
        playlist_id: &str,
        query: &HistoryQuery,
        now: OffsetDateTime,
    ) -> Result<SnapshotHistory> {
        let window = query.window(self.epoch, now);
        let resource_path = self.layout.playlist_path(playlist_id);

        let page = self.revisions.list_revisions(&resource_path, &window).await?;
        if page.revisions.is_empty() {
            return Err(ArchiveError::NoArchiveEntries {
                playlist_id: playlist_id.to_string(),
            });
        }

        // try_join_all yields results in revision order whatever the
        // completion order, and drops the remaining fetches on first error
        let records = try_join_all(
            page.revisions
                .iter()
                .map(|revision| self.fetch_snapshot(revision, &resource_path)),
        )
        .await?;

        let fetched = records.len();
        let entries = if query.allow_duplicates() {
            records
        } else {
            dedup_snapshots(records)
        };
        debug!(
            "Resolved {} snapshots ({} revisions) for {}",
            entries.len(),
            fetched,
            playlist_id
        );

        Ok(SnapshotHistory {
            playlist_id: playlist_id.to_string(),
            window,
            entries,
            cache_policy: CachePolicy::for_window(&window, now),
            etag: page.etag,
        })
    }

    async fn fetch_snapshot(&self, revision: &Revision, resource_path: &str) -> Result<SnapshotRecord> {
        let failed = |reason: String| {
            warn!(
                "Snapshot fetch failed at {} for {}: {}",
                revision.content_hash, resource_path, reason
            );
            ArchiveError::SnapshotFetchFailed {
                revision: revision.content_hash.clone(),
                reason,
            }
        };

        let content = self
            .blobs
            .fetch_blob(&revision.content_hash, resource_path)
            .await
            .map_err(|e| failed(e.to_string()))?;

        let document: PlaylistDocument =
            serde_json::from_str(&content).map_err(|e| failed(e.to_string()))?;

        Ok(SnapshotRecord::from_revision(revision, &document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spa_core::ARCHIVE_EPOCH;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2024-06-15 12:00 UTC);

    fn query(pairs: &[(&str, &str)]) -> HistoryQuery {
        let mut q = HistoryQuery::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "year" => q.year = value,
                "month" => q.month = value,
                "sinceDate" => q.since_date = value,
                "untilDate" => q.until_date = value,
                "allowDuplicates" => q.allow_duplicates = value,
                other => panic!("unknown key {other}"),
            }
        }
        q
    }

    #[test]
    fn test_month_window_by_default() {
        let w = query(&[("year", "2023"), ("month", "2")]).window(ARCHIVE_EPOCH, NOW);
        assert_eq!(w.since, datetime!(2023-02-01 0:00 UTC));
        assert_eq!(w.until, datetime!(2023-03-01 0:00 UTC));
    }

    #[test]
    fn test_range_takes_precedence() {
        let w = query(&[("year", "2023"), ("sinceDate", "2022-05-10")]).window(ARCHIVE_EPOCH, NOW);
        assert_eq!(w.since, datetime!(2022-05-10 0:00 UTC));
        assert_eq!(w.until, NOW);
    }

    #[test]
    fn test_allow_duplicates_flag() {
        assert!(!HistoryQuery::default().allow_duplicates());
        assert!(query(&[("allowDuplicates", "yes")]).allow_duplicates());
        assert!(query(&[("allowDuplicates", "true")]).allow_duplicates());
        assert!(query(&[("allowDuplicates", "1")]).allow_duplicates());
        assert!(!query(&[("allowDuplicates", "no")]).allow_duplicates());
    }

    #[test]
    fn test_cache_policy() {
        let past = query(&[("year", "2023"), ("month", "2")]).window(ARCHIVE_EPOCH, NOW);
        assert_eq!(CachePolicy::for_window(&past, NOW), CachePolicy::Immutable);
        assert_eq!(
            CachePolicy::Immutable.header_value(),
            "public, max-age=31536000, immutable"
        );

        let current = HistoryQuery::default().window(ARCHIVE_EPOCH, NOW);
        assert_eq!(CachePolicy::for_window(&current, NOW), CachePolicy::Daily);
        assert_eq!(CachePolicy::Daily.header_value(), "public, max-age=86400");
    }
}
