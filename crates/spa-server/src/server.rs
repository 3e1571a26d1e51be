use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;

use spa_core::{ArchiveEntry, ArchiveError, PlaylistSummary, PlaylistUrlParser};
use spa_engine::{ArchiveService, HistoryQuery};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

use crate::error::AppError;

pub struct ArchiveServer;

#[derive(Clone)]
struct AppState {
    service: Arc<ArchiveService>,
    url_parser: Arc<PlaylistUrlParser>,
}

impl ArchiveServer {
    pub async fn serve(service: Arc<ArchiveService>, host: &str, port: u16) -> anyhow::Result<()> {
        let app = Self::router(service);

        let addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&addr).await?;

        info!("Archive server listening on {}", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }

    pub fn router(service: Arc<ArchiveService>) -> Router {
        let app_state = AppState {
            service,
            url_parser: Arc::new(PlaylistUrlParser::new()),
        };

        // Browsing front-ends are served from other origins
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/", get(handle_info))
            .route("/api/playlists/:playlist_id", get(api_playlist))
            .route(
                "/api/playlists/:playlist_id/snapshots",
                get(api_playlist_snapshots),
            )
            .route("/api/search", get(api_search))
            .route("/api/resolve", get(api_resolve))
            .layer(cors)
            .with_state(app_state)
    }
}

/// GET handler for server info/health check
async fn handle_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "spa",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/playlists/:playlist_id/snapshots - Deduplicated snapshot history
async fn api_playlist_snapshots(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Response, AppError> {
    let history = state.service.history.resolve(&playlist_id, &query).await?;
    debug!(
        "Serving {} snapshots of {} ({:?})",
        history.entries.len(),
        playlist_id,
        history.cache_policy
    );

    let mut response = Json(history.entries).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(history.cache_policy.header_value()),
    );
    if let Some(etag) = history
        .etag
        .as_deref()
        .and_then(|etag| HeaderValue::from_str(etag).ok())
    {
        headers.insert(header::ETAG, etag);
    }

    Ok(response)
}

/// GET /api/playlists/:playlist_id - Current playlist summary
async fn api_playlist(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> Result<Json<PlaylistSummary>, AppError> {
    Ok(Json(state.service.playlists.current(&playlist_id).await?))
}

/// Query parameters for the search endpoint; `title` is an alias of `name`
#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

/// GET /api/search - Search archived playlists by title
async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ArchiveEntry>>, AppError> {
    let query = params.name.or(params.title).unwrap_or_default();
    Ok(Json(state.service.catalog.search(&query).await?))
}

#[derive(Deserialize)]
struct ResolveParams {
    #[serde(default)]
    url: Option<String>,
}

/// GET /api/resolve - Playlist ID of a sharing URL
async fn api_resolve(
    State(state): State<AppState>,
    Query(params): Query<ResolveParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let url = params
        .url
        .ok_or_else(|| ArchiveError::InvalidPlaylistUrl(String::new()))?;
    let playlist_id = state.url_parser.parse(&url)?;
    Ok(Json(serde_json::json!({ "playlistId": playlist_id })))
}
