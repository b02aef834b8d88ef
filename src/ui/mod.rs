//! UI modules for the trade globe.
//!
//! The UI is split into distinct panels:
//! - Top bar: title, country selector, view tabs and status
//! - Side panel: trade partners or product categories of the selection
//! - Central canvas: the globe of the active tab

mod canvas;
pub mod colors;
mod panels;
mod top_bar;

pub use canvas::render_canvas;
pub use panels::{
    format_millions, product_sections, render_side_panel, trade_sections, PanelRow, PanelSection,
};
pub use top_bar::render_top_bar;
