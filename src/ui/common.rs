//! # UI Common Components and Utilities
//!
//! Shared palette and frame helpers for the visualizer window. The palette is
//! a fixed dark theme; pressed and active states use the highlight colors so
//! they read at a glance from across a desk.

use eframe::egui::{self, Color32, Frame, Stroke};

/// Centralized color palette for the dark theme.
///
/// Colors are organized from darkest to lightest background, followed by the
/// state colors used for pressed buttons and connection status.
pub struct UiColors;

impl UiColors {
    /// Primary background color for main content areas (RGB: 30, 30, 30)
    pub const MAIN_BG: Color32 = Color32::from_rgb(30, 30, 30);

    /// Secondary background color for nested components (RGB: 25, 25, 25)
    pub const INNER_BG: Color32 = Color32::from_rgb(25, 25, 25);

    /// Deepest background color, used behind the artwork (RGB: 20, 20, 20)
    pub const EXTREME_BG: Color32 = Color32::from_rgb(20, 20, 20);

    /// Border color for component separation (RGB: 60, 60, 60)
    pub const BORDER: Color32 = Color32::from_rgb(60, 60, 60);

    /// Connected status and pressed button fill (RGB: 50, 200, 20) - Green
    pub const ACTIVE: Color32 = Color32::from_rgb(50, 200, 20);

    /// Disconnected status indicator color (RGB: 200, 50, 20) - Red
    pub const INACTIVE: Color32 = Color32::from_rgb(200, 50, 20);

    /// Stick indicator color (RGB: 230, 180, 40) - Amber
    pub const STICK: Color32 = Color32::from_rgb(230, 180, 40);
}

/// Creates a styled frame with consistent visual parameters.
pub fn create_frame(bg_color: Color32, border_color: Color32) -> Frame {
    Frame::new()
        .stroke(Stroke::new(1.0, border_color))
        .fill(bg_color)
        .inner_margin(4)
        .outer_margin(2)
}

/// Fill for a button element in the given state
pub fn button_fill(pressed: bool) -> Color32 {
    if pressed {
        UiColors::ACTIVE
    } else {
        UiColors::INNER_BG
    }
}

/// Text for a button element; dark on the bright pressed fill
pub fn button_text(label: &str, pressed: bool) -> egui::RichText {
    let text = egui::RichText::new(label).monospace();
    if pressed {
        text.color(Color32::BLACK).strong()
    } else {
        text
    }
}
