//! Gallery rendering: thumbnail grid and pagination bar

use super::thumbnails::TileImage;
use super::App;
use crate::theme;
use crate::types::*;
use crate::ui::components::{paint_placeholder, paint_texture_fit};
use crate::utils::{format_count, truncate_title};
use eframe::egui;

impl App {
    /// Central area: load state, empty results, or the thumbnail grid
    pub fn render_gallery(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        match &self.load_status {
            LoadStatus::Idle | LoadStatus::Loading => {
                ui.centered_and_justified(|ui| {
                    ui.add(egui::Spinner::new().size(32.0).color(theme::ACCENT));
                });
                return;
            }
            LoadStatus::Failed(message) => {
                let message = message.clone();
                let mut retry = false;
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() * 0.35);
                    ui.label(
                        egui::RichText::new(egui_phosphor::regular::WARNING_CIRCLE)
                            .size(40.0)
                            .color(theme::STATUS_ERROR),
                    );
                    ui.add_space(theme::SPACING_MD);
                    ui.label(
                        egui::RichText::new(message)
                            .size(theme::FONT_BODY)
                            .color(theme::TEXT_SECONDARY),
                    );
                    ui.add_space(theme::SPACING_LG);
                    retry = ui.add(theme::button_accent("Retry")).clicked();
                });
                if retry {
                    self.start_load(ctx);
                }
                return;
            }
            LoadStatus::Loaded(_) => {}
        }

        if self.catalog.view_len() == 0 {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.4);
                let text = match self.active_query.as_deref() {
                    Some(q) if !q.trim().is_empty() => format!("No images match \u{201c}{}\u{201d}", q),
                    _ => "No images".to_string(),
                };
                ui.label(egui::RichText::new(text).color(theme::TEXT_MUTED));
            });
            return;
        }

        self.render_grid(ui);
    }

    fn render_grid(&mut self, ui: &mut egui::Ui) {
        let tile = if self.settings.large_thumbnails {
            theme::TILE_LARGE
        } else {
            theme::TILE_SMALL
        };
        let spacing = theme::SPACING_MD;
        let available = ui.available_width();
        let cols = ((available + spacing) / (tile + spacing)).floor().max(1.0);
        let tile_w = ((available - spacing * (cols - 1.0)) / cols).floor();
        let tile_h = tile_w + theme::CAPTION_HEIGHT;

        let records: Vec<ImageRecord> = self
            .catalog
            .current_page()
            .records
            .into_iter()
            .cloned()
            .collect();
        let mut clicked: Option<ImageRecord> = None;

        let mut scroll_area = egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .id_salt("gallery_scroll");
        if std::mem::take(&mut self.scroll_to_top) {
            scroll_area = scroll_area.vertical_scroll_offset(0.0);
        }

        scroll_area.show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.spacing_mut().item_spacing = egui::vec2(spacing, spacing);
                for record in &records {
                    let (rect, response) =
                        ui.allocate_exact_size(egui::vec2(tile_w, tile_h), egui::Sense::click());

                    if ui.is_rect_visible(rect) {
                        let image_rect = egui::Rect::from_min_size(rect.min, egui::vec2(tile_w, tile_w));
                        let caption_rect = egui::Rect::from_min_max(
                            egui::pos2(rect.min.x, image_rect.max.y),
                            rect.max,
                        );
                        let painter = ui.painter();
                        let fill = if response.hovered() {
                            theme::BG_HOVER
                        } else {
                            theme::BG_ELEVATED
                        };
                        painter.rect_filled(image_rect, theme::RADIUS_DEFAULT, fill);

                        match self.thumbnail(&record.url) {
                            TileImage::Texture(tex) => {
                                paint_texture_fit(painter, image_rect.shrink(2.0), &tex)
                            }
                            TileImage::Broken => paint_placeholder(
                                painter,
                                image_rect,
                                egui_phosphor::regular::IMAGE_BROKEN,
                            ),
                            TileImage::Loading => {
                                let spinner_rect = egui::Rect::from_center_size(
                                    image_rect.center(),
                                    egui::vec2(20.0, 20.0),
                                );
                                egui::Spinner::new()
                                    .color(theme::TEXT_DIM)
                                    .paint_at(ui, spinner_rect);
                            }
                        }

                        let painter = ui.painter();
                        if response.hovered() {
                            painter.rect_stroke(
                                image_rect,
                                theme::RADIUS_DEFAULT,
                                egui::Stroke::new(theme::STROKE_DEFAULT * 2.0, theme::ACCENT),
                                egui::StrokeKind::Inside,
                            );
                        }

                        let max_chars = (tile_w / 7.0) as usize;
                        painter.text(
                            caption_rect.left_center() + egui::vec2(2.0, 0.0),
                            egui::Align2::LEFT_CENTER,
                            truncate_title(&record.title, max_chars.max(4)),
                            egui::FontId::proportional(theme::FONT_SMALL),
                            theme::TEXT_MUTED,
                        );
                    }

                    let response = if record.title.is_empty() {
                        response
                    } else {
                        response.on_hover_text(record.title.as_str())
                    };
                    if response.clicked() {
                        clicked = Some(record.clone());
                    }
                }
            });
        });

        if let Some(record) = clicked {
            self.open_popup(ui.ctx(), record);
        }
    }

    /// Bottom bar: previous / page field / next, plus the visible range
    pub fn render_pagination(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let (page_index, total, view_len, shown) = {
            let page = self.catalog.current_page();
            (page.index, page.total_pages, page.view_len, page.records.len())
        };
        let page_size = self.catalog.page_size();

        let mut go_previous = false;
        let mut go_next = false;
        let mut jump = false;

        ui.horizontal_centered(|ui| {
            if view_len > 0 {
                let first = (page_index - 1) * page_size + 1;
                let last = first + shown - 1;
                ui.label(
                    egui::RichText::new(format!(
                        "{}–{} of {}",
                        format_count(first),
                        format_count(last),
                        format_count(view_len)
                    ))
                    .size(theme::FONT_LABEL)
                    .color(theme::TEXT_DIM),
                );
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                go_next = ui
                    .add_enabled(
                        page_index < total,
                        theme::button(egui_phosphor::regular::CARET_RIGHT),
                    )
                    .on_hover_text("Next page")
                    .clicked();

                ui.label(
                    egui::RichText::new(format!("/ {}", total))
                        .size(theme::FONT_LABEL)
                        .color(theme::TEXT_MUTED),
                );

                let field = ui.add(
                    egui::TextEdit::singleline(&mut self.page_input)
                        .desired_width(44.0)
                        .horizontal_align(egui::Align::Center),
                );
                if field.lost_focus() {
                    if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        jump = true;
                    } else {
                        // Abandoned edit: show the real page again
                        self.page_input = page_index.to_string();
                    }
                }

                go_previous = ui
                    .add_enabled(
                        page_index > 1,
                        theme::button(egui_phosphor::regular::CARET_LEFT),
                    )
                    .on_hover_text("Previous page")
                    .clicked();
            });
        });

        if go_previous {
            self.previous_page(ctx);
        } else if go_next {
            self.next_page(ctx);
        } else if jump {
            self.jump_to_page(ctx);
        }
    }
}
