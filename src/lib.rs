//! Trade Globe - an interactive globe for exploring a country's trade.
//!
//! Shows a rotatable orthographic globe of the world. Selecting a country
//! highlights it, draws export and import flow lines to its trade partners
//! and lists its partners and product categories.

pub mod api;
mod app;
pub mod geo;
pub mod session;
pub mod state;
pub mod ui;

pub use app::GlobeApp;
