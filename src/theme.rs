//! Centralized theme constants for LovelyStock Gallery
//! All colors, sizes, and styling should reference these constants

use egui::Color32;

// =============================================================================
// COLORS - Backgrounds
// =============================================================================
pub const BG_BASE: Color32 = Color32::from_rgb(0x0c, 0x0a, 0x0e);
pub const BG_ELEVATED: Color32 = Color32::from_rgb(0x1a, 0x16, 0x1d);
pub const BG_INPUT: Color32 = Color32::from_rgb(0x15, 0x12, 0x18);
pub const BG_SURFACE: Color32 = Color32::from_rgb(0x2a, 0x24, 0x2e);
pub const BG_HOVER: Color32 = Color32::from_rgb(0x24, 0x14, 0x1c); // faint rose hover

// =============================================================================
// COLORS - Accent (Rose)
// =============================================================================
pub const ACCENT: Color32 = Color32::from_rgb(0xfb, 0x71, 0x85); // rose-400
pub const ACCENT_DARK: Color32 = Color32::from_rgb(0x4c, 0x05, 0x19); // rose-950, text on accent

// =============================================================================
// COLORS - Text
// =============================================================================
pub const TEXT_PRIMARY: Color32 = Color32::WHITE;
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(0xe7, 0xe2, 0xe8);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(0xa8, 0xa0, 0xab);
pub const TEXT_DIM: Color32 = Color32::from_rgb(0x76, 0x6e, 0x7a);

// =============================================================================
// COLORS - Borders & status
// =============================================================================
pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(0x2a, 0x24, 0x2e);
pub const BORDER_DEFAULT: Color32 = Color32::from_rgb(0x44, 0x3c, 0x48);
pub const STATUS_SUCCESS: Color32 = Color32::from_rgb(0x34, 0xd3, 0x99);
pub const STATUS_ERROR: Color32 = Color32::from_rgb(0xf8, 0x71, 0x71);

pub const BTN_DEFAULT: Color32 = Color32::from_rgb(0x3a, 0x33, 0x3e);

// =============================================================================
// DIMENSIONS
// =============================================================================
pub const SIDEBAR_WIDTH: f32 = 260.0;
pub const PAGINATION_HEIGHT: f32 = 48.0;
pub const TILE_SMALL: f32 = 140.0;
pub const TILE_LARGE: f32 = 220.0;
pub const CAPTION_HEIGHT: f32 = 20.0;
pub const POPUP_MAX_FRACTION: f32 = 0.85;

pub const RADIUS_DEFAULT: f32 = 4.0;
pub const RADIUS_LARGE: f32 = 8.0;
pub const STROKE_DEFAULT: f32 = 1.0;

pub const SPACING_SM: f32 = 4.0;
pub const SPACING_MD: f32 = 8.0;
pub const SPACING_LG: f32 = 12.0;
pub const SPACING_XL: f32 = 16.0;

pub const FONT_BODY: f32 = 14.0;
pub const FONT_LABEL: f32 = 13.0;
pub const FONT_SMALL: f32 = 11.0;

// =============================================================================
// HELPER - Apply global visuals
// =============================================================================
pub fn apply_visuals(ctx: &egui::Context) {
    ctx.set_visuals(egui::Visuals {
        dark_mode: true,
        panel_fill: BG_BASE,
        window_fill: BG_ELEVATED,
        extreme_bg_color: BG_INPUT,
        faint_bg_color: BG_ELEVATED,
        hyperlink_color: ACCENT,
        selection: egui::style::Selection {
            bg_fill: Color32::from_rgb(0x5a, 0x2a, 0x38),
            stroke: egui::Stroke::new(STROKE_DEFAULT, ACCENT),
        },
        window_stroke: egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE),
        window_corner_radius: egui::CornerRadius::same(RADIUS_LARGE as u8),
        interact_cursor: Some(egui::CursorIcon::PointingHand),
        ..egui::Visuals::dark()
    });

    ctx.style_mut(|style| {
        style.interaction.selectable_labels = false;
        style.spacing.item_spacing = egui::vec2(SPACING_MD, 6.0);
        style.spacing.button_padding = egui::vec2(SPACING_LG, 6.0);
        style.spacing.scroll.bar_width = 6.0;
    });
}

// =============================================================================
// HELPER - Frames
// =============================================================================
pub fn section_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(BG_INPUT)
        .stroke(egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE))
        .corner_radius(RADIUS_DEFAULT)
        .inner_margin(egui::Margin::same(SPACING_LG as i8))
}

pub fn modal_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(BG_ELEVATED)
        .stroke(egui::Stroke::new(STROKE_DEFAULT, BORDER_DEFAULT))
        .corner_radius(RADIUS_LARGE)
        .inner_margin(egui::Margin::same(SPACING_XL as i8))
}

// =============================================================================
// HELPER - Buttons
// =============================================================================

/// Default gray button
pub fn button(text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(text.into())
        .fill(BTN_DEFAULT)
        .corner_radius(RADIUS_DEFAULT)
}

/// Rose button for primary actions
pub fn button_accent(text: impl Into<String>) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.into()).color(ACCENT_DARK))
        .fill(ACCENT)
        .corner_radius(RADIUS_DEFAULT)
}
