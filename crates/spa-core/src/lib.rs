//! Core domain models and logic for spa
//!
//! This crate contains:
//! - Domain models (Revision, SnapshotRecord, DateWindow, ArchiveEntry)
//! - Query normalization (date windows, playlist URLs)
//! - Snapshot deduplication and title search
//!
//! Nothing in here performs I/O; the providers live in `spa-sources`.

pub mod dedup;
pub mod error;
pub mod playlist;
pub mod playlist_url;
pub mod revision;
pub mod search;
pub mod snapshot;
pub mod window;

pub use dedup::{dedup_by_key, dedup_snapshots};
pub use error::{ArchiveError, Result};
pub use playlist::{PlaylistDocument, PlaylistSummary};
pub use playlist_url::{PlaylistUrlParser, parse_playlist_url, playlist_id_from_url};
pub use revision::{Revision, RevisionPage};
pub use search::{ArchiveEntry, MatchPolicy, SearchOptions, TitleMatcher, parse_listing};
pub use snapshot::SnapshotRecord;
pub use window::{ARCHIVE_EPOCH, DateWindow, MonthQuery, RangeQuery};
