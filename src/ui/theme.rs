//! Theme constants for the Macanan GUI

use egui::Color32;

// Board colors - earthy tones
pub const BOARD_BG: Color32 = Color32::from_rgb(214, 190, 150);
pub const EDGE_LINE: Color32 = Color32::from_rgb(92, 64, 36);
pub const NODE_DOT: Color32 = Color32::from_rgb(70, 48, 28);

// Pieces
pub const MEN_PIECE: Color32 = Color32::from_rgb(245, 242, 232);
pub const MEN_OUTLINE: Color32 = Color32::from_rgb(120, 110, 95);
pub const TIGER_PIECE: Color32 = Color32::from_rgb(230, 130, 30);
pub const TIGER_STRIPE: Color32 = Color32::from_rgb(40, 28, 18);

// Markers
pub const LAST_MOVE_MARKER: Color32 = Color32::from_rgb(230, 60, 60);
pub const SELECTED_RING: Color32 = Color32::from_rgb(60, 140, 230);
pub const WIN_HIGHLIGHT: Color32 = Color32::from_rgb(50, 220, 50);

pub fn legal_target() -> Color32 {
    Color32::from_rgba_unmultiplied(60, 180, 90, 110)
}

pub fn hover_ring() -> Color32 {
    Color32::from_rgba_unmultiplied(40, 40, 40, 120)
}

// Panel colors - dark modern theme
pub const PANEL_BG: Color32 = Color32::from_rgb(25, 27, 31);
pub const CARD_BG: Color32 = Color32::from_rgb(35, 38, 43);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 165, 175);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 125, 135);

// Status colors
pub const STATUS_OK: Color32 = Color32::from_rgb(80, 200, 120);
pub const STATUS_WARNING: Color32 = Color32::from_rgb(255, 180, 50);
pub const STATUS_CRITICAL: Color32 = Color32::from_rgb(255, 70, 70);

// Sizes
pub const BOARD_MARGIN: f32 = 36.0;
pub const PIECE_RADIUS: f32 = 15.0;
pub const NODE_RADIUS: f32 = 4.0;
pub const EDGE_WIDTH: f32 = 2.0;
pub const LAST_MOVE_MARKER_RADIUS: f32 = 4.0;
/// Clicks farther than this from every node are ignored
pub const CLICK_RADIUS: f32 = 22.0;
