//! Common types and data structures

use crate::constants::{DEFAULT_CSV_URL, DEFAULT_KEYWORDS};
use serde::{Deserialize, Serialize};

/// One parsed CSV data row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub url: String,
    pub title: String,
}

impl ImageRecord {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// Where the catalog CSV comes from. One strategy per deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogSource {
    /// One URL serving the complete dataset
    Url { url: String },
    /// Sequentially numbered parts; `{n}` in the template is replaced with 1..=count
    Parts { url_template: String, count: usize },
    /// A CSV file on disk
    File { path: String },
}

impl Default for CatalogSource {
    fn default() -> Self {
        CatalogSource::Url {
            url: DEFAULT_CSV_URL.to_string(),
        }
    }
}

impl CatalogSource {
    /// Short human-readable description for the status line
    pub fn describe(&self) -> String {
        match self {
            CatalogSource::Url { url } => url.clone(),
            CatalogSource::Parts { url_template, count } => {
                format!("{} ({} parts)", url_template, count)
            }
            CatalogSource::File { path } => path.clone(),
        }
    }
}

/// How the home view is built
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DefaultViewPolicy {
    /// Uniform random permutation of the whole catalog
    #[default]
    Shuffle,
    /// Keyword matches first, topped up to one page from the rest, then shuffled
    KeywordCurated { keywords: Vec<String> },
}

impl DefaultViewPolicy {
    pub fn curated_default() -> Self {
        DefaultViewPolicy::KeywordCurated {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Catalog load progress, shared with the background loader
#[derive(Debug, Clone, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded(LoadSummary),
    Failed(String),
}

/// Informational result of a successful load
#[derive(Debug, Clone)]
pub struct LoadSummary {
    pub count: usize,
    pub skipped: usize,
    pub loaded_at: chrono::DateTime<chrono::Local>,
}

/// Thumbnail fetch state for one image URL
#[derive(Clone)]
pub enum ThumbState {
    /// Requested by page request number `generation`
    Pending { generation: u64 },
    Ready(egui::ColorImage),
    Failed,
}
