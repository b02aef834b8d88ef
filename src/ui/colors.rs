//! Centralized color constants for the UI.
//!
//! This module provides consistent colors across the globe and its panels.

use eframe::egui::Color32;

/// General UI colors for labels and values.
pub mod ui {
    use super::Color32;

    /// Muted gray for labels.
    pub const LABEL: Color32 = Color32::from_rgb(100, 100, 100);
    /// Slightly brighter for values.
    pub const VALUE: Color32 = Color32::from_rgb(160, 160, 160);
    /// Emphasized color for the active tab and the selected country.
    pub const ACTIVE: Color32 = Color32::from_rgb(100, 180, 255);
    /// Status line when something failed to load.
    pub const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
    /// Placeholder text such as "No export data available".
    pub const DIM: Color32 = Color32::from_rgb(120, 120, 130);
}

/// Colors for the globe.
pub mod map {
    use super::Color32;

    /// Selected country fill (#4CAF50).
    pub const HIGHLIGHT: Color32 = Color32::from_rgb(0x4c, 0xaf, 0x50);
    /// Every other country (#ccc).
    pub const NEUTRAL: Color32 = Color32::from_rgb(0xcc, 0xcc, 0xcc);
    /// Sphere background behind the countries.
    pub const OCEAN: Color32 = Color32::from_rgb(0xe8, 0xf4, 0xfa);
    /// Country borders and the globe outline.
    pub const BORDER: Color32 = Color32::from_rgb(0x88, 0x88, 0x88);
    /// Export flow lines (#ff0000 at 0.7 opacity).
    pub const EXPORT_FLOW: Color32 = Color32::from_rgba_premultiplied(178, 0, 0, 178);
    /// Import flow lines (#0000ff at 0.7 opacity).
    pub const IMPORT_FLOW: Color32 = Color32::from_rgba_premultiplied(0, 0, 178, 178);
    /// Canvas behind the globe.
    pub const BACKGROUND: Color32 = Color32::from_rgb(250, 250, 250);
}
