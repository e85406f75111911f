//! User settings stored as settings.json in the app data directory

use crate::csv::ParseOptions;
use crate::types::{CatalogSource, DefaultViewPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Catalog
    pub source: CatalogSource,
    pub default_view: DefaultViewPolicy,
    pub require_url_scheme: bool,

    // View
    pub large_thumbnails: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            source: CatalogSource::default(),
            default_view: DefaultViewPolicy::default(),
            require_url_scheme: true,
            large_thumbnails: false,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            require_scheme: self.require_url_scheme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "lovelystock-settings-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = temp_dir("missing");
        std::fs::remove_file(dir.join("settings.json")).ok();
        assert_eq!(Settings::load(&dir), Settings::default());
    }

    #[test]
    fn save_then_load_keeps_policy_and_source() {
        let dir = temp_dir("persist");
        let settings = Settings {
            source: CatalogSource::Parts {
                url_template: "https://host/images{n}.csv".to_string(),
                count: 4,
            },
            default_view: DefaultViewPolicy::curated_default(),
            window_w: Some(1200.0),
            ..Settings::default()
        };
        settings.save(&dir);
        assert_eq!(Settings::load(&dir), settings);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = temp_dir("partial");
        std::fs::write(
            dir.join("settings.json"),
            r#"{ "default_view": { "kind": "keyword_curated", "keywords": ["love"] } }"#,
        )
        .unwrap();
        let settings = Settings::load(&dir);
        assert_eq!(
            settings.default_view,
            DefaultViewPolicy::KeywordCurated {
                keywords: vec!["love".to_string()]
            }
        );
        assert_eq!(settings.source, CatalogSource::default());
        assert!(settings.require_url_scheme);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = temp_dir("corrupt");
        std::fs::write(dir.join("settings.json"), "{ not json").unwrap();
        assert_eq!(Settings::load(&dir), Settings::default());
        std::fs::remove_dir_all(&dir).ok();
    }
}
