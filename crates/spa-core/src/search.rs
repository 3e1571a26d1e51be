//! Archive directory listing and title search

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A playlist listed in the archive's directory document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub name: String,
    pub id: String,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

fn entry_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*[-*]\s+\[(.+)\]\(([^)\s]+)\)\s*$").unwrap())
}

fn escape_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\(.)").unwrap())
}

/// Parse the entries listed under `heading` in a markdown directory document.
///
/// Entries are `- [Title](/playlists/pretty/<id>.md)` lines; the section runs
/// until the next heading. A missing or empty section yields no entries and
/// lines of any other shape are skipped.
pub fn parse_listing(document: &str, heading: &str) -> Vec<ArchiveEntry> {
    let heading = heading.trim();
    let mut lines = document.lines();

    if !lines.by_ref().any(|line| line.trim() == heading) {
        return Vec::new();
    }

    lines
        .take_while(|line| !line.trim_start().starts_with('#'))
        .filter_map(|line| {
            let caps = entry_line_re().captures(line)?;
            let name = escape_re().replace_all(caps[1].trim(), "$1").into_owned();
            let id = link_target_id(&caps[2])?;
            Some(ArchiveEntry::new(name, id))
        })
        .collect()
}

/// `/playlists/pretty/37i9dQZF1DX.md` -> `37i9dQZF1DX`
fn link_target_id(target: &str) -> Option<String> {
    let file = target.rsplit('/').next()?;
    let id = file.strip_suffix(".md").unwrap_or(file);
    (!id.is_empty()).then(|| id.to_string())
}

/// How a query is matched against titles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Case-insensitive containment of every whitespace-separated phrase
    Phrases,
    /// Approximate similarity ranking, top results only
    #[default]
    Fuzzy,
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub policy: MatchPolicy,
    /// Fuzzy policy: maximum results returned (default: 10)
    pub max_results: usize,
    /// Fuzzy policy: shorter queries return nothing (default: 3)
    pub min_query_len: usize,
    /// Fuzzy policy: entries scoring below are dropped (default: 0.3)
    pub min_score: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            policy: MatchPolicy::Fuzzy,
            max_results: 10,
            min_query_len: 3,
            min_score: 0.3,
        }
    }
}

pub struct TitleMatcher {
    options: SearchOptions,
}

impl TitleMatcher {
    pub fn new(options: SearchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn search(&self, query: &str, entries: &[ArchiveEntry]) -> Vec<ArchiveEntry> {
        match self.options.policy {
            MatchPolicy::Phrases => match_phrases(query, entries),
            MatchPolicy::Fuzzy => self.rank_fuzzy(query, entries),
        }
    }

    /// False when the query can never match under the current policy
    pub fn accepts(&self, query: &str) -> bool {
        match self.options.policy {
            MatchPolicy::Phrases => true,
            MatchPolicy::Fuzzy => normalize(query).chars().count() >= self.options.min_query_len,
        }
    }

    fn rank_fuzzy(&self, query: &str, entries: &[ArchiveEntry]) -> Vec<ArchiveEntry> {
        if !self.accepts(query) {
            return Vec::new();
        }
        let query = normalize(query);

        let mut scored: Vec<(f64, &ArchiveEntry)> = entries
            .iter()
            .map(|entry| (title_score(&query, &normalize(&entry.name)), entry))
            .filter(|(score, _)| *score >= self.options.min_score)
            .collect();

        scored.sort_by(|(a_score, a), (b_score, b)| {
            b_score
                .partial_cmp(a_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        scored.truncate(self.options.max_results);

        scored.into_iter().map(|(_, entry)| entry.clone()).collect()
    }
}

impl Default for TitleMatcher {
    fn default() -> Self {
        Self::new(SearchOptions::default())
    }
}

fn match_phrases(query: &str, entries: &[ArchiveEntry]) -> Vec<ArchiveEntry> {
    let phrases: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();

    entries
        .iter()
        .filter(|entry| {
            let name = entry.name.to_lowercase();
            phrases.iter().all(|phrase| name.contains(phrase.as_str()))
        })
        .cloned()
        .collect()
}

/// Lowercase with runs of whitespace collapsed to a single space
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Similarity in `[0, 1]` of a normalized query against a normalized title:
/// 1.0 on containment, otherwise the best of the whole-title similarity and
/// the similarity to any run of title words as long as the query.
fn title_score(query: &str, title: &str) -> f64 {
    if query.is_empty() || title.is_empty() {
        return 0.0;
    }
    if title.contains(query) {
        return 1.0;
    }

    let query_words = query.split_whitespace().count().max(1);
    let title_words: Vec<&str> = title.split_whitespace().collect();

    title_words
        .windows(query_words)
        .map(|run| similarity(query, &run.join(" ")))
        .fold(similarity(query, title), f64::max)
}

fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0usize; b.len() + 1];

    for (i, ac) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, bc) in b.iter().enumerate() {
            let cost = usize::from(ac != bc);
            cur[j + 1] = (prev[j + 1] + 1).min(cur[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[b.len()]
}
