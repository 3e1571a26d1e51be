use anyhow::Context;
use serde::{Deserialize, Serialize};
use spa_core::{MatchPolicy, SearchOptions};
use std::path::{Path, PathBuf};
use std::time::Duration;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Environment variable overriding `archive.github_token`
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Configuration for spa
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub archive: ArchiveConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    #[serde(default = "default_owner")]
    pub owner: String,

    #[serde(default = "default_repo")]
    pub repo: String,

    #[serde(default = "default_branch")]
    pub branch: String,

    #[serde(default = "default_playlists_dir")]
    pub playlists_dir: String,

    #[serde(default = "default_listing_path")]
    pub listing_path: String,

    #[serde(default = "default_listing_heading")]
    pub listing_heading: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_raw_base")]
    pub raw_base: String,

    /// Restrict the revision listing to commits by this author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,

    /// First day with archived data, `YYYY-MM-DD`
    #[serde(default = "default_epoch")]
    pub epoch: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub policy: MatchPolicy,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
            repo: default_repo(),
            branch: default_branch(),
            playlists_dir: default_playlists_dir(),
            listing_path: default_listing_path(),
            listing_heading: default_listing_heading(),
            api_base: default_api_base(),
            raw_base: default_raw_base(),
            commit_author: None,
            github_token: None,
            epoch: default_epoch(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            policy: MatchPolicy::default(),
            max_results: default_max_results(),
            min_query_len: default_min_query_len(),
            min_score: default_min_score(),
        }
    }
}

fn default_owner() -> String {
    "mackorone".to_string()
}

fn default_repo() -> String {
    "spotify-playlist-archive".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_playlists_dir() -> String {
    "playlists/pretty".to_string()
}

fn default_listing_path() -> String {
    "README.md".to_string()
}

fn default_listing_heading() -> String {
    "## Playlists".to_string()
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_raw_base() -> String {
    "https://raw.githubusercontent.com".to_string()
}

fn default_epoch() -> String {
    "2021-12-01".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("spa/", env!("CARGO_PKG_VERSION"), " (playlist archive browser)").to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    17380
}

fn default_max_results() -> usize {
    10
}

fn default_min_query_len() -> usize {
    3
}

fn default_min_score() -> f64 {
    0.3
}

impl ArchiveConfig {
    /// Midnight UTC of the configured epoch date
    pub fn epoch(&self) -> anyhow::Result<OffsetDateTime> {
        let date = Date::parse(self.epoch.trim(), format_description!("[year]-[month]-[day]"))
            .with_context(|| format!("Invalid archive epoch '{}', expected YYYY-MM-DD", self.epoch))?;
        Ok(date.midnight().assume_utc())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SearchConfig {
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            policy: self.policy,
            max_results: self.max_results,
            min_query_len: self.min_query_len,
            min_score: self.min_score,
        }
    }
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        let config = if path.exists() {
            Self::load_from(&path)?
        } else {
            // Create default config file
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(&path, content)?;
            config
        };

        Ok(config.with_env_overrides(std::env::var(TOKEN_ENV).ok()))
    }

    /// Load config from an explicit file, which must exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.archive.epoch()?;
        Ok(config)
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "spa", "spa") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.spa/config.toml")
        }
    }

    /// A non-empty token from the environment wins over the file
    pub fn with_env_overrides(mut self, token: Option<String>) -> Self {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.archive.github_token = Some(token);
        }
        self
    }
}
