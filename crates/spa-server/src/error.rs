//! HTTP error mapping

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use spa_core::ArchiveError;
use tracing::error;

/// API error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Handler error. Client errors echo their cause; server errors are logged
/// and answered with a generic message.
#[derive(Debug)]
pub struct AppError(pub ArchiveError);

impl From<ArchiveError> for AppError {
    fn from(err: ArchiveError) -> Self {
        AppError(err)
    }
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, ApiError) {
        match &self.0 {
            e @ ArchiveError::InvalidPlaylistUrl(_) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_PLAYLIST_URL", e.to_string()),
            ),
            e @ ArchiveError::NoArchiveEntries { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("NOT_ARCHIVED", e.to_string()),
            ),
            e @ ArchiveError::PlaylistNotFound(_) => (
                StatusCode::NOT_FOUND,
                ApiError::new("PLAYLIST_NOT_FOUND", e.to_string()),
            ),
            ArchiveError::SnapshotFetchFailed { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("SNAPSHOT_FETCH_FAILED", "Failed to load snapshots"),
            ),
            ArchiveError::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("UPSTREAM_ERROR", "Failed to reach the archive"),
            ),
            ArchiveError::Serialization(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", "Failed to read archived data"),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        if status.is_server_error() {
            error!("{}: {}", body.code, self.0);
        }
        (status, Json(body)).into_response()
    }
}
