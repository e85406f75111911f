//! Thumbnail and popup image loading

use super::App;
use crate::constants::*;
use crate::types::ThumbState;
use eframe::egui;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// What a gallery tile should draw
pub(crate) enum TileImage {
    Texture(egui::TextureHandle),
    Loading,
    Broken,
}

/// Download an image and decode it to at most `max_edge` pixels on its longest side
async fn fetch_image(
    client: &reqwest::Client,
    url: &str,
    max_edge: u32,
) -> Result<egui::ColorImage, String> {
    let response = client.get(url).send().await.map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }
    let bytes = response.bytes().await.map_err(|e| e.to_string())?;
    tokio::task::spawn_blocking(move || decode_image(&bytes, max_edge))
        .await
        .map_err(|e| e.to_string())?
}

pub(crate) fn decode_image(bytes: &[u8], max_edge: u32) -> Result<egui::ColorImage, String> {
    let img = image::load_from_memory(bytes).map_err(|e| e.to_string())?;
    let img = if img.width() > max_edge || img.height() > max_edge {
        img.thumbnail(max_edge, max_edge)
    } else {
        img
    };
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Record the outcome of one thumbnail task from page request `generation`
fn settle_thumbnail(
    states: &mut HashMap<String, ThumbState>,
    url: String,
    generation: u64,
    result: Option<Result<egui::ColorImage, String>>,
) {
    match result {
        // Forget cancelled requests so a later visit retries them. A newer
        // request for the same url owns its entry.
        None => {
            let owned = matches!(
                states.get(&url),
                Some(ThumbState::Pending { generation: g }) if *g == generation
            );
            if owned {
                states.remove(&url);
            }
        }
        Some(Ok(image)) => {
            states.insert(url, ThumbState::Ready(image));
        }
        Some(Err(e)) => {
            debug!(url = %url, error = %e, "Thumbnail failed");
            states.insert(url, ThumbState::Failed);
        }
    }
}

impl App {
    /// Start fetching thumbnails for the current page, cancelling the previous page's requests
    pub fn request_page_thumbnails(&mut self, ctx: &egui::Context) {
        if let Some(token) = self.thumb_cancel.take() {
            token.cancel();
        }

        let page_urls: HashSet<String> = self
            .catalog
            .current_page()
            .records
            .iter()
            .map(|r| r.url.clone())
            .collect();

        // Only the visible page keeps its textures
        self.thumb_textures.retain(|url, _| page_urls.contains(url));

        self.thumb_generation += 1;
        let generation = self.thumb_generation;

        let to_fetch: Vec<String> = {
            let Ok(mut states) = self.thumb_states.lock() else {
                return;
            };
            states.retain(|url, _| page_urls.contains(url));
            // Pending entries belong to the cancelled request and are fetched again
            let missing: Vec<String> = page_urls
                .iter()
                .filter(|url| {
                    !self.thumb_textures.contains_key(*url)
                        && !matches!(
                            states.get(*url),
                            Some(ThumbState::Ready(_) | ThumbState::Failed)
                        )
                })
                .cloned()
                .collect();
            for url in &missing {
                states.insert(url.clone(), ThumbState::Pending { generation });
            }
            missing
        };

        if to_fetch.is_empty() {
            return;
        }
        debug!(count = to_fetch.len(), "Fetching thumbnails");

        let token = CancellationToken::new();
        self.thumb_cancel = Some(token.clone());
        let states = self.thumb_states.clone();
        let client = self.client.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let semaphore = Arc::new(tokio::sync::Semaphore::new(THUMBNAIL_CONCURRENCY));
            let mut handles = vec![];

            for url in to_fetch {
                let sem = semaphore.clone();
                let client = client.clone();
                let states = states.clone();
                let ctx = ctx.clone();
                let token = token.clone();

                handles.push(tokio::spawn(async move {
                    let result = tokio::select! {
                        _ = token.cancelled() => None,
                        result = async {
                            let _permit = sem.acquire().await.ok();
                            fetch_image(&client, &url, THUMBNAIL_MAX_EDGE).await
                        } => Some(result),
                    };

                    if let Ok(mut s) = states.lock() {
                        settle_thumbnail(&mut s, url, generation, result);
                    }
                    ctx.request_repaint();
                }));
            }

            for handle in handles {
                handle.await.ok();
            }
        });
    }

    /// Upload decoded thumbnails to the GPU
    pub fn poll_thumbnails(&mut self, ctx: &egui::Context) {
        let Ok(mut states) = self.thumb_states.lock() else {
            return;
        };
        let ready: Vec<String> = states
            .iter()
            .filter(|(_, s)| matches!(s, ThumbState::Ready(_)))
            .map(|(url, _)| url.clone())
            .collect();
        for url in ready {
            if let Some(ThumbState::Ready(image)) = states.remove(&url) {
                let tex = ctx.load_texture(&url, image, egui::TextureOptions::LINEAR);
                self.thumb_textures.insert(url, tex);
            }
        }
    }

    pub fn thumbnail(&self, url: &str) -> TileImage {
        if let Some(tex) = self.thumb_textures.get(url) {
            return TileImage::Texture(tex.clone());
        }
        let failed = self
            .thumb_states
            .lock()
            .map(|s| matches!(s.get(url), Some(ThumbState::Failed)))
            .unwrap_or(false);
        if failed {
            TileImage::Broken
        } else {
            TileImage::Loading
        }
    }

    /// Fetch the large version of the popup image
    pub fn load_popup_image(&mut self, ctx: &egui::Context, url: String) {
        if let Some(token) = self.popup_cancel.take() {
            token.cancel();
        }
        self.popup_texture = None;
        // Empty slot while the request runs
        if let Ok(mut s) = self.popup_state.lock() {
            *s = None;
        }

        let token = CancellationToken::new();
        self.popup_cancel = Some(token.clone());
        let slot = self.popup_state.clone();
        let client = self.client.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let state = tokio::select! {
                _ = token.cancelled() => return,
                result = fetch_image(&client, &url, POPUP_MAX_EDGE) => match result {
                    Ok(image) => ThumbState::Ready(image),
                    Err(e) => {
                        debug!(url = %url, error = %e, "Popup image failed");
                        ThumbState::Failed
                    }
                },
            };
            if token.is_cancelled() {
                return;
            }
            if let Ok(mut s) = slot.lock() {
                *s = Some(state);
            }
            ctx.request_repaint();
        });
    }

    pub fn poll_popup_image(&mut self, ctx: &egui::Context) {
        let Ok(mut slot) = self.popup_state.lock() else {
            return;
        };
        if matches!(*slot, Some(ThumbState::Ready(_))) {
            if let Some(ThumbState::Ready(image)) = slot.take() {
                self.popup_texture =
                    Some(ctx.load_texture("popup", image, egui::TextureOptions::LINEAR));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 80, 255]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    const URL: &str = "https://img.example/1.jpg";

    fn pending(generation: u64) -> HashMap<String, ThumbState> {
        HashMap::from([(URL.to_string(), ThumbState::Pending { generation })])
    }

    #[test]
    fn cancelled_task_clears_its_own_entry() {
        let mut states = pending(3);
        settle_thumbnail(&mut states, URL.to_string(), 3, None);
        assert!(states.is_empty());
    }

    #[test]
    fn cancelled_task_leaves_newer_request_alone() {
        let mut states = pending(4);
        settle_thumbnail(&mut states, URL.to_string(), 3, None);
        assert!(matches!(
            states.get(URL),
            Some(ThumbState::Pending { generation: 4 })
        ));
    }

    #[test]
    fn finished_tasks_store_their_result() {
        let mut states = pending(1);
        let image = egui::ColorImage::new([2, 2], egui::Color32::WHITE);
        settle_thumbnail(&mut states, URL.to_string(), 1, Some(Ok(image)));
        assert!(matches!(states.get(URL), Some(ThumbState::Ready(_))));

        settle_thumbnail(&mut states, URL.to_string(), 2, Some(Err("HTTP 404".to_string())));
        assert!(matches!(states.get(URL), Some(ThumbState::Failed)));
    }

    #[test]
    fn large_images_are_downscaled() {
        let image = decode_image(&png(800, 400), 320).unwrap();
        assert_eq!(image.size, [320, 160]);
    }

    #[test]
    fn small_images_keep_their_size() {
        let image = decode_image(&png(40, 30), 320).unwrap();
        assert_eq!(image.size, [40, 30]);
    }

    #[test]
    fn garbage_bytes_fail() {
        assert!(decode_image(b"<html>not found</html>", 320).is_err());
    }
}
