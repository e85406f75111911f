//! App module - contains the main application state and logic

mod gallery;
mod loader;
mod popup;
mod sidebar;
mod thumbnails;

use crate::catalog::{self, Catalog, NavError};
use crate::settings::Settings;
use crate::theme;
use crate::types::*;
use eframe::egui;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) settings: Settings,
    pub(crate) data_dir: PathBuf,
    pub(crate) catalog: Catalog,
    pub(crate) rng: StdRng,
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) client: reqwest::Client,
    // Catalog loading
    pub(crate) load_status: LoadStatus,
    pub(crate) load_slot: loader::LoadSlot,
    // Search
    pub(crate) search_query: String,
    pub(crate) search_due: Option<Instant>,
    pub(crate) active_query: Option<String>,
    // Pagination
    pub(crate) page_input: String,
    pub(crate) scroll_to_top: bool,
    // Thumbnails for the visible page
    pub(crate) thumb_states: Arc<Mutex<HashMap<String, ThumbState>>>,
    pub(crate) thumb_textures: HashMap<String, egui::TextureHandle>,
    pub(crate) thumb_cancel: Option<CancellationToken>,
    pub(crate) thumb_generation: u64,
    // Popup
    pub(crate) popup: Option<ImageRecord>,
    pub(crate) popup_state: Arc<Mutex<Option<ThumbState>>>,
    pub(crate) popup_texture: Option<egui::TextureHandle>,
    pub(crate) popup_cancel: Option<CancellationToken>,
    // Toast notification
    pub(crate) notices: Arc<Mutex<Vec<String>>>,
    pub(crate) toast_message: Option<String>,
    pub(crate) toast_start: Option<Instant>,
    // Settings panel
    pub(crate) show_settings: bool,
    pub(crate) keywords_input: String,
    // Window
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        data_dir: PathBuf,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let keywords_input = match &settings.default_view {
            DefaultViewPolicy::KeywordCurated { keywords } => keywords.join(", "),
            DefaultViewPolicy::Shuffle => crate::constants::DEFAULT_KEYWORDS.join(", "),
        };

        let mut app = Self {
            settings,
            data_dir,
            catalog: Catalog::default(),
            rng: StdRng::from_entropy(),
            runtime,
            client: reqwest::Client::new(),
            load_status: LoadStatus::Idle,
            load_slot: Arc::new(Mutex::new(None)),
            search_query: String::new(),
            search_due: None,
            active_query: None,
            page_input: "1".to_string(),
            scroll_to_top: false,
            thumb_states: Arc::new(Mutex::new(HashMap::new())),
            thumb_textures: HashMap::new(),
            thumb_cancel: None,
            thumb_generation: 0,
            popup: None,
            popup_state: Arc::new(Mutex::new(None)),
            popup_texture: None,
            popup_cancel: None,
            notices: Arc::new(Mutex::new(Vec::new())),
            toast_message: None,
            toast_start: None,
            show_settings: false,
            keywords_input,
            window_pos: None,
            window_size: None,
            needs_center: false,
        };

        app.start_load(&cc.egui_ctx);
        app
    }

    pub fn save_settings(&mut self) {
        self.settings.window_x = self.window_pos.map(|p| p.x);
        self.settings.window_y = self.window_pos.map(|p| p.y);
        self.settings.window_w = self.window_size.map(|s| s.x);
        self.settings.window_h = self.window_size.map(|s| s.y);
        self.settings.save(&self.data_dir);
    }

    // ------------------------------------------------------------------------
    // View operations. Each one resets the page to 1 through the catalog.
    // ------------------------------------------------------------------------

    /// Rebuild the home view and clear any search
    pub fn go_home(&mut self, ctx: &egui::Context) {
        self.search_query.clear();
        self.search_due = None;
        self.active_query = None;
        self.catalog
            .default_view(&self.settings.default_view, &mut self.rng);
        info!(
            len = self.catalog.view_len(),
            catalog = self.catalog.len(),
            "Home view"
        );
        self.refresh_page(ctx);
    }

    /// Search now. Always recomputes the view, so a repeated query returns to page 1.
    pub fn run_search(&mut self, ctx: &egui::Context) {
        self.search_due = None;
        let query = self.search_query.clone();
        let hits = self.catalog.search(&query);
        debug!(query = %query, hits, "Search");
        self.active_query = Some(query);
        self.refresh_page(ctx);
    }

    /// Search again after the debounce delay
    pub fn schedule_search(&mut self, ctx: &egui::Context) {
        let delay = Duration::from_millis(crate::constants::SEARCH_DEBOUNCE_MS);
        self.search_due = Some(Instant::now() + delay);
        ctx.request_repaint_after(delay);
    }

    pub fn poll_search(&mut self, ctx: &egui::Context) {
        if let Some(due) = self.search_due {
            let now = Instant::now();
            if now >= due {
                self.search_due = None;
                // Typing back to the shown query keeps the current page
                if debounce_changes_view(self.active_query.as_deref(), &self.search_query) {
                    self.run_search(ctx);
                }
            } else {
                ctx.request_repaint_after(due - now);
            }
        }
    }

    pub fn next_page(&mut self, ctx: &egui::Context) {
        if self.catalog.next() {
            self.refresh_page(ctx);
        }
    }

    pub fn previous_page(&mut self, ctx: &egui::Context) {
        if self.catalog.previous() {
            self.refresh_page(ctx);
        }
    }

    /// Apply the jump field. Rejected input restores the current page number.
    pub fn jump_to_page(&mut self, ctx: &egui::Context) {
        let result = catalog::parse_page_input(&self.page_input)
            .and_then(|target| self.catalog.go_to_page(target));
        match result {
            Ok(()) => self.refresh_page(ctx),
            Err(e) => {
                debug!(error = %e, "Page jump rejected");
                self.page_input = self.catalog.page_index().to_string();
                let message = match e {
                    NavError::NotANumber(_) => "Enter a page number".to_string(),
                    NavError::OutOfRange { total, .. } => {
                        format!("Pages run from 1 to {}", total)
                    }
                };
                self.show_toast(message);
            }
        }
    }

    fn refresh_page(&mut self, ctx: &egui::Context) {
        self.page_input = self.catalog.page_index().to_string();
        self.scroll_to_top = true;
        self.request_page_thumbnails(ctx);
    }

    // ------------------------------------------------------------------------
    // Toasts
    // ------------------------------------------------------------------------

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some(message.into());
        self.toast_start = Some(Instant::now());
    }

    /// Move messages posted by background tasks into the toast
    pub fn poll_notices(&mut self) {
        let latest = self.notices.lock().ok().and_then(|mut n| n.drain(..).last());
        if let Some(message) = latest {
            self.show_toast(message);
        }
    }
}

/// Whether a debounced search would show something other than the current view.
/// The home view counts as an empty query.
fn debounce_changes_view(active_query: Option<&str>, query: &str) -> bool {
    active_query.unwrap_or("") != query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_skips_the_query_already_shown() {
        assert!(!debounce_changes_view(Some("love"), "love"));
        assert!(debounce_changes_view(Some("love"), "lov"));
        assert!(debounce_changes_view(Some("love"), " love"));
    }

    #[test]
    fn debounce_treats_home_as_empty_query() {
        assert!(!debounce_changes_view(None, ""));
        assert!(debounce_changes_view(None, "heart"));
        assert!(debounce_changes_view(Some("heart"), ""));
    }
}
