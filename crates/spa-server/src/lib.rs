pub mod error;
pub mod server;

pub use error::{ApiError, AppError};
pub use server::ArchiveServer;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use spa_core::{ARCHIVE_EPOCH, Revision, SearchOptions, SnapshotRecord};
    use spa_engine::{ArchiveLayout, ArchiveService};
    use spa_sources::StaticArchive;
    use std::sync::Arc;
    use time::macros::datetime;
    use tower::ServiceExt;

    const PATH: &str = "playlists/pretty/pl1.json";

    const LISTING: &str = "# Archive\n\n## Playlists\n\n\
        - [Today's Top Hits](playlists/pretty/37i9dQZF1DXcBWIGoYBM5M.md)\n\
        - [Top 50 \\- Global](playlists/pretty/37i9dQZEVXbMDoHDwVN2tF.md)\n\
        - [Peaceful Piano](playlists/pretty/37i9dQZF1DX4sWSpwq3LiO.md)\n\n\
        ## Contributing\n";

    fn snapshot_json(snapshot_id: &str, followers: u64) -> String {
        serde_json::json!({
            "snapshot_id": snapshot_id,
            "num_followers": followers,
            "original_name": "Playlist One",
            "unique_name": "Playlist One",
            "description": "Songs &amp; more",
            "url": "https://open.spotify.com/playlist/pl1",
            "tracks": [{"name": "Track", "url": "https://open.spotify.com/track/t1"}]
        })
        .to_string()
    }

    fn archive() -> StaticArchive {
        StaticArchive::new()
            .with_revision(PATH, Revision::new("r3", datetime!(2022-01-20 0:00 UTC)), snapshot_json("s2", 30))
            .with_revision(PATH, Revision::new("r2", datetime!(2022-01-12 0:00 UTC)), snapshot_json("s1", 20))
            .with_revision(PATH, Revision::new("r1", datetime!(2022-01-05 0:00 UTC)), snapshot_json("s1", 10))
            .with_blob("main", "README.md", LISTING)
            .with_blob("main", PATH, snapshot_json("s2", 31))
            .with_etag("\"abc123\"")
    }

    fn app(archive: StaticArchive) -> axum::Router {
        let service = ArchiveService::new(
            Arc::new(archive),
            ArchiveLayout::default(),
            ARCHIVE_EPOCH,
            SearchOptions::default(),
        );
        ArchiveServer::router(Arc::new(service))
    }

    async fn get(app: axum::Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_info() {
        let response = get(app(archive()), "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "spa");
    }

    #[tokio::test]
    async fn test_snapshots_past_month() {
        let response = get(app(archive()), "/api/playlists/pl1/snapshots?year=2022&month=1").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=31536000, immutable"
        );
        assert_eq!(response.headers()[header::ETAG], "\"abc123\"");

        let entries: Vec<SnapshotRecord> =
            serde_json::from_value(body_json(response).await).unwrap();
        let ids: Vec<(&str, &str)> = entries
            .iter()
            .map(|e| (e.snapshot_id.as_str(), e.revision_hash.as_str()))
            .collect();
        assert_eq!(ids, vec![("s2", "r3"), ("s1", "r1")]);
    }

    #[tokio::test]
    async fn test_snapshots_wire_format() {
        let response = get(
            app(archive()),
            "/api/playlists/pl1/snapshots?year=2022&month=1&allowDuplicates=yes",
        )
        .await;
        let body = body_json(response).await;
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["snapshotId"], "s2");
        assert_eq!(entries[0]["revisionHash"], "r3");
        assert_eq!(entries[0]["capturedAt"], "2022-01-20T00:00:00Z");
        assert_eq!(entries[0]["followerCount"], 30);
    }

    #[tokio::test]
    async fn test_snapshots_open_range_is_daily() {
        let response = get(app(archive()), "/api/playlists/pl1/snapshots?sinceDate=2022-01-01").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "public, max-age=86400");
    }

    #[tokio::test]
    async fn test_snapshots_not_archived() {
        let response = get(app(archive()), "/api/playlists/pl1/snapshots?year=2022&month=6").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_ARCHIVED");
    }

    #[tokio::test]
    async fn test_snapshots_fetch_failure_is_generic_500() {
        let response = get(
            app(archive().failing_revision("r2")),
            "/api/playlists/pl1/snapshots?year=2022&month=1",
        )
        .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Failed to load snapshots");
    }

    #[tokio::test]
    async fn test_playlist_summary() {
        let response = get(app(archive()), "/api/playlists/pl1").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], "pl1");
        assert_eq!(body["title"], "Playlist One");
        assert_eq!(body["description"], "Songs & more");
        assert_eq!(body["followerCount"], 31);
        assert_eq!(body["trackCount"], 1);

        let response = get(app(archive()), "/api/playlists/missing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search() {
        let response = get(app(archive()), "/api/search?name=piano").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body[0]["name"], "Peaceful Piano");
        assert_eq!(body[0]["id"], "37i9dQZF1DX4sWSpwq3LiO");

        let response = get(app(archive()), "/api/search?title=top%20hits").await;
        let body = body_json(response).await;
        assert_eq!(body[0]["name"], "Today's Top Hits");

        let response = get(app(archive()), "/api/search?name=ab").await;
        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_resolve() {
        let response = get(
            app(archive()),
            "/api/resolve?url=https%3A%2F%2Fopen.spotify.com%2Fplaylist%2F37i9dQZF1DXcBWIGoYBM5M%3Fsi%3Dabc",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["playlistId"], "37i9dQZF1DXcBWIGoYBM5M");

        let response = get(app(archive()), "/api/resolve?url=https%3A%2F%2Fexample.com%2Fplaylist%2Fx").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = get(app(archive()), "/api/resolve").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let response = app(archive())
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "https://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
