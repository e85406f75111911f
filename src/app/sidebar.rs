//! Left sidebar: home, search, catalog status and settings

use super::App;
use crate::constants::*;
use crate::theme;
use crate::types::*;
use crate::ui::components::section_label;
use crate::utils::format_count;
use eframe::egui;

impl App {
    pub fn render_sidebar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.add_space(theme::SPACING_XL);

        // Title doubles as the home button
        let title = ui.add(
            egui::Label::new(
                egui::RichText::new(format!("{}  LovelyStock", egui_phosphor::regular::HEART))
                    .size(20.0)
                    .color(theme::ACCENT),
            )
            .sense(egui::Sense::click())
            .selectable(false),
        );
        if title.on_hover_text("Back to the home view").clicked() {
            self.go_home(ctx);
        }
        ui.add_space(theme::SPACING_LG);

        self.render_search_box(ui, ctx);
        ui.add_space(theme::SPACING_MD);

        let loaded = matches!(self.load_status, LoadStatus::Loaded(_));
        if ui
            .add_enabled(
                loaded,
                theme::button(format!("{}  Home", egui_phosphor::regular::HOUSE)),
            )
            .on_hover_text("Clear the search and reshuffle")
            .clicked()
        {
            self.go_home(ctx);
        }

        ui.add_space(theme::SPACING_LG);
        self.render_status(ui, ctx);

        ui.add_space(theme::SPACING_LG);
        let toggle = if self.show_settings {
            egui_phosphor::regular::CARET_DOWN
        } else {
            egui_phosphor::regular::CARET_RIGHT
        };
        if ui
            .add(
                egui::Label::new(
                    egui::RichText::new(format!("{}  SETTINGS", toggle))
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                )
                .sense(egui::Sense::click())
                .selectable(false),
            )
            .clicked()
        {
            self.show_settings = !self.show_settings;
        }
        if self.show_settings {
            ui.add_space(theme::SPACING_SM);
            self.render_settings(ui, ctx);
        }
    }

    fn render_search_box(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let mut submit = false;
        let mut clear = false;

        egui::Frame::new()
            .fill(theme::BG_INPUT)
            .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_SUBTLE))
            .corner_radius(theme::RADIUS_DEFAULT)
            .inner_margin(egui::Margin::symmetric(8, 8))
            .show(ui, |ui| {
                ui.spacing_mut().item_spacing.x = theme::SPACING_SM;
                ui.horizontal(|ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(egui_phosphor::regular::MAGNIFYING_GLASS)
                                .size(theme::FONT_BODY)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );
                    let clear_width = if self.search_query.is_empty() { 0.0 } else { 20.0 };
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.search_query)
                            .hint_text("Search titles...")
                            .frame(false)
                            .desired_width(ui.available_width() - clear_width),
                    );
                    if response.changed() {
                        self.schedule_search(ctx);
                    }
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        submit = true;
                    }
                    if !self.search_query.is_empty()
                        && ui
                            .add(
                                egui::Label::new(
                                    egui::RichText::new(egui_phosphor::regular::X)
                                        .size(theme::FONT_LABEL)
                                        .color(theme::TEXT_MUTED),
                                )
                                .sense(egui::Sense::click())
                                .selectable(false),
                            )
                            .clicked()
                    {
                        clear = true;
                    }
                });
            });

        if clear {
            self.go_home(ctx);
        } else if submit {
            self.run_search(ctx);
        }
    }

    fn render_status(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let mut reload = false;
        theme::section_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            section_label(ui, "CATALOG");
            ui.add_space(theme::SPACING_SM);
            match &self.load_status {
                LoadStatus::Idle | LoadStatus::Loading => {
                    ui.horizontal(|ui| {
                        ui.add(egui::Spinner::new().size(12.0));
                        ui.label(egui::RichText::new("Loading…").color(theme::TEXT_MUTED));
                    });
                }
                LoadStatus::Loaded(summary) => {
                    ui.label(
                        egui::RichText::new(format!("{} images", format_count(summary.count)))
                            .color(theme::STATUS_SUCCESS),
                    );
                    if summary.skipped > 0 {
                        ui.label(
                            egui::RichText::new(format!(
                                "{} rows skipped",
                                format_count(summary.skipped)
                            ))
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_DIM),
                        );
                    }
                    ui.label(
                        egui::RichText::new(format!(
                            "Loaded {}",
                            summary.loaded_at.format("%H:%M:%S")
                        ))
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                    );
                    if let Some(q) = self.active_query.as_deref().filter(|q| !q.trim().is_empty()) {
                        ui.label(
                            egui::RichText::new(format!(
                                "{} matching \u{201c}{}\u{201d}",
                                format_count(self.catalog.view_len()),
                                q
                            ))
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_MUTED),
                        );
                    }
                }
                LoadStatus::Failed(message) => {
                    ui.label(egui::RichText::new(message.as_str()).color(theme::STATUS_ERROR));
                }
            }
            ui.add_space(theme::SPACING_SM);
            ui.add(
                egui::Label::new(
                    egui::RichText::new(self.settings.source.describe())
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                )
                .truncate(),
            );
            let busy = matches!(self.load_status, LoadStatus::Loading);
            reload = ui
                .add_enabled(
                    !busy,
                    theme::button(format!("{}  Reload", egui_phosphor::regular::ARROW_CLOCKWISE)),
                )
                .clicked();
        });
        if reload {
            self.start_load(ctx);
        }
    }

    fn render_settings(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let mut open_file = false;
        let mut use_default_url = false;

        theme::section_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());

            section_label(ui, "HOME VIEW");
            let mut curated = matches!(
                self.settings.default_view,
                DefaultViewPolicy::KeywordCurated { .. }
            );
            let before = curated;
            ui.radio_value(&mut curated, false, "Shuffle everything");
            ui.radio_value(&mut curated, true, "Keywords first");
            let keywords_edit = ui.add_enabled(
                curated,
                egui::TextEdit::singleline(&mut self.keywords_input)
                    .hint_text("love, heart")
                    .desired_width(ui.available_width()),
            );
            if curated != before || keywords_edit.lost_focus() {
                self.settings.default_view = if curated {
                    let keywords = parse_keywords(&self.keywords_input);
                    if keywords.is_empty() {
                        DefaultViewPolicy::curated_default()
                    } else {
                        DefaultViewPolicy::KeywordCurated { keywords }
                    }
                } else {
                    DefaultViewPolicy::Shuffle
                };
            }

            ui.add_space(theme::SPACING_MD);
            section_label(ui, "GALLERY");
            ui.checkbox(&mut self.settings.large_thumbnails, "Large thumbnails");
            ui.checkbox(
                &mut self.settings.require_url_scheme,
                "Only http(s) image links",
            )
            .on_hover_text("Applies on the next reload");

            ui.add_space(theme::SPACING_MD);
            section_label(ui, "SOURCE");
            let busy = matches!(self.load_status, LoadStatus::Loading);
            ui.horizontal(|ui| {
                open_file = ui
                    .add_enabled(
                        !busy,
                        theme::button(format!("{}  Open CSV…", egui_phosphor::regular::FOLDER_OPEN)),
                    )
                    .clicked();
                use_default_url = ui
                    .add_enabled(
                        !busy && self.settings.source != CatalogSource::default(),
                        theme::button("Default"),
                    )
                    .on_hover_text(DEFAULT_CSV_URL)
                    .clicked();
            });
        });

        if open_file {
            self.open_csv_file(ctx);
        } else if use_default_url {
            self.set_source(ctx, CatalogSource::default());
        }
    }
}

/// Split a comma-separated keyword field
pub(crate) fn parse_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_trimmed_and_blank_entries_dropped() {
        assert_eq!(parse_keywords(" love, heart ,, "), ["love", "heart"]);
        assert!(parse_keywords("  ").is_empty());
    }
}
