//! Archived playlist documents and their presentation summary

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A playlist file as stored in the archive (`playlists/pretty/<id>.json`)
///
/// Only the fields the browser needs are modelled; unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistDocument {
    pub snapshot_id: String,
    #[serde(default)]
    pub num_followers: Option<u64>,
    #[serde(default)]
    pub original_name: String,
    #[serde(default)]
    pub unique_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub added_at: Option<String>,
}

impl PlaylistDocument {
    /// Title shown to users: the archive's unique name, with the original
    /// name in parentheses when the two differ.
    pub fn display_title(&self) -> String {
        if self.unique_name.is_empty() || self.unique_name == self.original_name {
            self.original_name.clone()
        } else {
            format!("{} ({})", self.unique_name, self.original_name)
        }
    }
}

/// Current state of a playlist, as returned to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub follower_count: Option<u64>,
    pub snapshot_id: String,
    pub url: String,
    pub track_count: usize,
}

impl PlaylistSummary {
    pub fn from_document(id: impl Into<String>, document: &PlaylistDocument) -> Self {
        Self {
            id: id.into(),
            title: document.display_title(),
            description: decode_entities(&document.description),
            follower_count: document.num_followers,
            snapshot_id: document.snapshot_id.clone(),
            url: document.url.clone(),
            track_count: document.tracks.len(),
        }
    }
}

fn numeric_entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&#([xX][0-9a-fA-F]+|[0-9]+);").expect("valid entity regex"))
}

/// Decode the HTML entities the streaming service emits in descriptions
pub fn decode_entities(text: &str) -> String {
    let text = numeric_entity_re().replace_all(text, |caps: &regex::Captures<'_>| {
        let raw = &caps[1];
        let code = match raw.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => raw.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    // &amp; goes last so "&amp;lt;" stays "&lt;"
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
