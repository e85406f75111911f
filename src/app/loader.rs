//! Background catalog loading

use super::App;
use crate::constants::LOAD_FAILED_MESSAGE;
use crate::csv::ParseOutcome;
use crate::source::{self, LoadError};
use crate::types::*;
use eframe::egui;
use std::sync::{Arc, Mutex};
use tracing::{error, info};

/// Result of the most recent load attempt, filled by the loader task
pub(crate) type LoadSlot = Arc<Mutex<Option<Result<ParseOutcome, LoadError>>>>;

impl App {
    /// Fetch and parse the configured source on the runtime
    pub fn start_load(&mut self, ctx: &egui::Context) {
        if matches!(self.load_status, LoadStatus::Loading) {
            return;
        }
        self.load_status = LoadStatus::Loading;

        let client = self.client.clone();
        let source = self.settings.source.clone();
        let options = self.settings.parse_options();
        let slot = self.load_slot.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let result = source::load(&client, &source, &options).await;
            if let Ok(mut s) = slot.lock() {
                *s = Some(result);
            }
            ctx.request_repaint();
        });
    }

    /// Pick up a finished load. A success replaces the catalog and shows the home view.
    pub fn poll_load(&mut self, ctx: &egui::Context) {
        let finished = self.load_slot.lock().ok().and_then(|mut s| s.take());
        let Some(result) = finished else {
            return;
        };

        match result {
            Ok(outcome) => {
                let summary = LoadSummary {
                    count: outcome.records.len(),
                    skipped: outcome.skipped,
                    loaded_at: chrono::Local::now(),
                };
                info!(
                    count = summary.count,
                    skipped = summary.skipped,
                    "Catalog ready"
                );
                self.close_popup();
                self.catalog.load(outcome.records);
                self.load_status = LoadStatus::Loaded(summary);
                self.go_home(ctx);
            }
            Err(e) => {
                error!(error = %e, source = %self.settings.source.describe(), "Catalog load failed");
                self.load_status = LoadStatus::Failed(LOAD_FAILED_MESSAGE.to_string());
            }
        }
    }

    /// Switch to a new source and load it
    pub fn set_source(&mut self, ctx: &egui::Context, source: CatalogSource) {
        info!(source = %source.describe(), "Catalog source changed");
        self.settings.source = source;
        self.start_load(ctx);
    }

    /// Ask for a local CSV file and load it
    pub fn open_csv_file(&mut self, ctx: &egui::Context) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv", "txt"])
            .set_title("Open image listing")
            .pick_file()
        {
            let source = CatalogSource::File {
                path: path.to_string_lossy().to_string(),
            };
            self.set_source(ctx, source);
        }
    }
}
