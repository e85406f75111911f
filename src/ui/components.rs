//! Reusable UI components

use crate::theme;
use eframe::egui;

/// Largest rect with the aspect ratio of `content` centered inside `container`
pub fn fit_rect(container: egui::Rect, content: egui::Vec2) -> egui::Rect {
    if content.x <= 0.0 || content.y <= 0.0 {
        return container;
    }
    let scale = (container.width() / content.x).min(container.height() / content.y);
    egui::Rect::from_center_size(container.center(), content * scale)
}

/// Paint a texture letterboxed inside `rect`
pub fn paint_texture_fit(painter: &egui::Painter, rect: egui::Rect, tex: &egui::TextureHandle) {
    let target = fit_rect(rect, tex.size_vec2());
    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    painter.image(tex.id(), target, uv, egui::Color32::WHITE);
}

/// Centered icon standing in for an image that failed to load
pub fn paint_placeholder(painter: &egui::Painter, rect: egui::Rect, icon: &str) {
    painter.rect_filled(rect, theme::RADIUS_DEFAULT, theme::BG_SURFACE);
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        icon,
        egui::FontId::proportional((rect.height() * 0.3).clamp(14.0, 48.0)),
        theme::TEXT_DIM,
    );
}

/// Sidebar section heading
pub fn section_label(ui: &mut egui::Ui, text: &str) {
    ui.add(
        egui::Label::new(
            egui::RichText::new(text)
                .size(theme::FONT_SMALL)
                .color(theme::TEXT_DIM),
        )
        .selectable(false),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_content_is_letterboxed() {
        let container = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        let fitted = fit_rect(container, egui::vec2(400.0, 200.0));
        assert_eq!(fitted.size(), egui::vec2(100.0, 50.0));
        assert_eq!(fitted.center(), container.center());
    }

    #[test]
    fn degenerate_content_fills_container() {
        let container = egui::Rect::from_min_size(egui::pos2(5.0, 5.0), egui::vec2(80.0, 60.0));
        assert_eq!(fit_rect(container, egui::Vec2::ZERO), container);
    }
}
