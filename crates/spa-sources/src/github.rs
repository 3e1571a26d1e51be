use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, ETAG};
use serde::Deserialize;
use spa_core::{ArchiveError, DateWindow, Result, Revision, RevisionPage};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, warn};

use crate::provider::{BlobProvider, RevisionProvider};

/// GitHub's maximum page size for the commits listing
const COMMITS_PER_PAGE: &str = "100";

/// Where the archive repository lives and how to reach it
#[derive(Debug, Clone)]
pub struct GitHubSettings {
    pub api_base: String,
    pub raw_base: String,
    pub owner: String,
    pub repo: String,
    /// Only list commits by this author (the archive's bot account)
    pub commit_author: Option<String>,
    pub token: Option<String>,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            raw_base: "https://raw.githubusercontent.com".to_string(),
            owner: "mackorone".to_string(),
            repo: "spotify-playlist-archive".to_string(),
            commit_author: None,
            token: None,
            user_agent: concat!("spa/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Archive reader backed by the GitHub REST API and raw content host
pub struct GitHubArchive {
    client: reqwest::Client,
    settings: GitHubSettings,
}

impl GitHubArchive {
    pub fn new(settings: GitHubSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ArchiveError::Upstream(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &GitHubSettings {
        &self.settings
    }

    fn commits_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/commits",
            self.settings.api_base.trim_end_matches('/'),
            self.settings.owner,
            self.settings.repo
        )
    }

    fn raw_url(&self, revision: &str, resource_path: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.settings.raw_base.trim_end_matches('/'),
            self.settings.owner,
            self.settings.repo,
            revision,
            resource_path.trim_start_matches('/')
        )
    }

    fn commits_query(&self, resource_path: &str, window: &DateWindow) -> Result<Vec<(&'static str, String)>> {
        let mut query = vec![
            ("path", resource_path.to_string()),
            ("since", format_instant(window.since)?),
            ("until", format_instant(window.until)?),
            ("per_page", COMMITS_PER_PAGE.to_string()),
        ];
        if let Some(author) = &self.settings.commit_author {
            query.push(("author", author.clone()));
        }
        Ok(query)
    }
}

fn format_instant(instant: OffsetDateTime) -> Result<String> {
    instant
        .format(&Rfc3339)
        .map_err(|e| ArchiveError::Upstream(format!("Unformattable instant {}: {}", instant, e)))
}

/// Subset of one item of `GET /repos/{owner}/{repo}/commits`
#[derive(Debug, Deserialize)]
struct CommitListing {
    sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    #[serde(default)]
    author: Option<GitActor>,
    #[serde(default)]
    committer: Option<GitActor>,
}

#[derive(Debug, Deserialize)]
struct GitActor {
    #[serde(with = "time::serde::rfc3339")]
    date: OffsetDateTime,
}

impl CommitListing {
    fn into_revision(self) -> Option<Revision> {
        let captured_at = self
            .commit
            .author
            .or(self.commit.committer)
            .map(|actor| actor.date)?;
        Some(Revision::new(self.sha, captured_at))
    }
}

fn revisions_from_listing(listing: Vec<CommitListing>) -> Vec<Revision> {
    listing
        .into_iter()
        .filter_map(|commit| {
            let sha = commit.sha.clone();
            let revision = commit.into_revision();
            if revision.is_none() {
                warn!("Skipping commit {} without a date", sha);
            }
            revision
        })
        .collect()
}

#[async_trait]
impl RevisionProvider for GitHubArchive {
    async fn list_revisions(
        &self,
        resource_path: &str,
        window: &DateWindow,
    ) -> Result<RevisionPage> {
        let url = self.commits_url();
        debug!("Listing revisions of {} via {}", resource_path, url);

        let mut request = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json")
            .query(&self.commits_query(resource_path, window)?);
        if let Some(token) = &self.settings.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ArchiveError::Upstream(format!("Failed to list commits: {}", e)))?;

        if !response.status().is_success() {
            return Err(ArchiveError::Upstream(format!(
                "HTTP error {} listing commits of {}",
                response.status().as_u16(),
                resource_path
            )));
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let listing: Vec<CommitListing> = response
            .json()
            .await
            .map_err(|e| ArchiveError::Upstream(format!("Failed to read commit listing: {}", e)))?;

        let page = RevisionPage::new(revisions_from_listing(listing));
        debug!("Listed {} revisions of {}", page.revisions.len(), resource_path);

        Ok(match etag {
            Some(etag) => page.with_etag(etag),
            None => page,
        })
    }
}

#[async_trait]
impl BlobProvider for GitHubArchive {
    async fn fetch_blob(&self, revision: &str, resource_path: &str) -> Result<String> {
        let url = self.raw_url(revision, resource_path);
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ArchiveError::Upstream(format!("Failed to fetch {}: {}", url, e)))?;

        match response.status() {
            status if status.is_success() => response
                .text()
                .await
                .map_err(|e| ArchiveError::Upstream(format!("Failed to read {}: {}", url, e))),
            StatusCode::NOT_FOUND => Err(ArchiveError::PlaylistNotFound(resource_path.to_string())),
            status => Err(ArchiveError::Upstream(format!(
                "HTTP error {}: {}",
                status.as_u16(),
                url
            ))),
        }
    }
}
