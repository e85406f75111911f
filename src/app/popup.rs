//! Image popup: large preview with download / open actions

use super::App;
use crate::theme;
use crate::types::*;
use crate::ui::components::{paint_placeholder, paint_texture_fit};
use crate::utils::suggested_file_name;
use eframe::egui;
use futures::{Stream, StreamExt};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// Save the image at `url` to `dest`, streaming the body
async fn download_image(client: &reqwest::Client, url: &str, dest: &Path) -> Result<u64, String> {
    let response = client.get(url).send().await.map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }
    write_stream(response.bytes_stream(), dest).await
}

/// Write each chunk to `dest` as it arrives. A failed chunk removes the partial file.
async fn write_stream<S, B, E>(mut stream: S, dest: &Path) -> Result<u64, String>
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| e.to_string())?;
    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let result = match chunk {
            Ok(data) => {
                let data = data.as_ref();
                file.write_all(data)
                    .await
                    .map(|()| data.len() as u64)
                    .map_err(|e| e.to_string())
            }
            Err(e) => Err(e.to_string()),
        };
        match result {
            Ok(len) => written += len,
            Err(e) => {
                drop(file);
                tokio::fs::remove_file(dest).await.ok();
                return Err(e);
            }
        }
    }
    file.flush().await.map_err(|e| e.to_string())?;
    Ok(written)
}

impl App {
    pub fn open_popup(&mut self, ctx: &egui::Context, record: ImageRecord) {
        self.load_popup_image(ctx, record.url.clone());
        self.popup = Some(record);
    }

    pub fn close_popup(&mut self) {
        if let Some(token) = self.popup_cancel.take() {
            token.cancel();
        }
        self.popup = None;
        self.popup_texture = None;
        if let Ok(mut s) = self.popup_state.lock() {
            *s = None;
        }
    }

    /// Ask where to save the popup image and download it in the background
    fn save_popup_image(&mut self, record: &ImageRecord) {
        let Some(dest) = rfd::FileDialog::new()
            .set_file_name(suggested_file_name(&record.url))
            .save_file()
        else {
            return;
        };

        let client = self.client.clone();
        let url = record.url.clone();
        let notices = self.notices.clone();
        self.runtime.spawn(async move {
            let message = match download_image(&client, &url, &dest).await {
                Ok(size) => {
                    info!(url = %url, path = %dest.display(), size, "Image saved");
                    format!("Saved {}", dest.display())
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Image download failed");
                    "Download failed".to_string()
                }
            };
            if let Ok(mut n) = notices.lock() {
                n.push(message);
            }
        });
    }

    pub fn render_popup(&mut self, ctx: &egui::Context) {
        let Some(record) = self.popup.clone() else {
            return;
        };
        let mut close = ctx.input(|i| i.key_pressed(egui::Key::Escape));

        // Dim backdrop; clicking it closes the popup
        let screen = ctx.screen_rect();
        egui::Area::new(egui::Id::new("popup_dim"))
            .fixed_pos(screen.min)
            .order(egui::Order::Middle)
            .interactable(true)
            .show(ctx, |ui| {
                let resp = ui.allocate_response(screen.size(), egui::Sense::click());
                ui.painter()
                    .rect_filled(screen, 0.0, egui::Color32::from_black_alpha(170));
                if resp.clicked() {
                    close = true;
                }
            });

        let max_w = screen.width() * theme::POPUP_MAX_FRACTION;
        let max_h = screen.height() * theme::POPUP_MAX_FRACTION;
        let image_size = egui::vec2(max_w, (max_h - 90.0).max(120.0));
        let failed = matches!(
            self.popup_state.lock().ok().as_deref(),
            Some(Some(ThumbState::Failed))
        );

        let mut save = false;
        egui::Window::new("image_popup")
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .order(egui::Order::Foreground)
            .frame(theme::modal_frame())
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .max_width(max_w)
            .show(ctx, |ui| {
                let (rect, _) = ui.allocate_exact_size(image_size, egui::Sense::hover());
                if let Some(tex) = &self.popup_texture {
                    paint_texture_fit(ui.painter(), rect, tex);
                } else if failed {
                    paint_placeholder(ui.painter(), rect, egui_phosphor::regular::IMAGE_BROKEN);
                } else {
                    let spinner_rect =
                        egui::Rect::from_center_size(rect.center(), egui::vec2(32.0, 32.0));
                    egui::Spinner::new()
                        .color(theme::ACCENT)
                        .paint_at(ui, spinner_rect);
                }

                ui.add_space(theme::SPACING_MD);
                // Title is plain text, never interpreted
                let title = if record.title.is_empty() {
                    "Untitled"
                } else {
                    record.title.as_str()
                };
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(title)
                            .size(theme::FONT_BODY)
                            .color(theme::TEXT_PRIMARY),
                    )
                    .wrap(),
                );

                ui.add_space(theme::SPACING_SM);
                ui.horizontal(|ui| {
                    if ui
                        .add(theme::button_accent(format!(
                            "{}  Download",
                            egui_phosphor::regular::DOWNLOAD_SIMPLE
                        )))
                        .clicked()
                    {
                        save = true;
                    }
                    if ui
                        .add(theme::button(format!(
                            "{}  Open in browser",
                            egui_phosphor::regular::ARROW_SQUARE_OUT
                        )))
                        .clicked()
                    {
                        if let Err(e) = open::that(&record.url) {
                            warn!(url = %record.url, error = %e, "Failed to open browser");
                        }
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.add(theme::button(egui_phosphor::regular::X)).clicked() {
                            close = true;
                        }
                    });
                });
            });

        if save {
            self.save_popup_image(&record);
        }
        if close {
            self.close_popup();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("lovelystock-popup-{}-{}", name, std::process::id()))
    }

    #[tokio::test]
    async fn chunks_are_written_in_order() {
        let dest = temp_file("ok.png");
        let chunks: Vec<Result<Vec<u8>, String>> =
            vec![Ok(b"\x89PNG".to_vec()), Ok(Vec::new()), Ok(b"rest".to_vec())];

        let written = write_stream(futures::stream::iter(chunks), &dest)
            .await
            .unwrap();

        assert_eq!(written, 8);
        assert_eq!(std::fs::read(&dest).unwrap(), b"\x89PNGrest");
        std::fs::remove_file(&dest).ok();
    }

    #[tokio::test]
    async fn failed_chunk_removes_partial_file() {
        let dest = temp_file("broken.png");
        let chunks: Vec<Result<Vec<u8>, String>> =
            vec![Ok(b"part".to_vec()), Err("connection reset".to_string())];

        let result = write_stream(futures::stream::iter(chunks), &dest).await;

        assert_eq!(result, Err("connection reset".to_string()));
        assert!(!dest.exists());
    }
}
