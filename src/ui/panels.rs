//! Side panel UI: trade partner and product lists for the selected country.

use super::colors;
use crate::api::{ProductData, ProductEntry, TradeData, TradePartner};
use crate::state::{AppState, LoadState, ViewTab};
use eframe::egui::{self, RichText, ScrollArea};

#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    pub label: String,
    pub value: String,
}

/// One titled list, e.g. "Top Export Partners".
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSection {
    pub title: &'static str,
    pub rows: Vec<PanelRow>,
    /// Shown instead of the rows when there are none.
    pub empty_message: &'static str,
}

/// Formats a trade value in millions of dollars, e.g. `$5.00M`.
pub fn format_millions(value: f64) -> String {
    format!("${:.2}M", value / 1_000_000.0)
}

const NO_EXPORTS: &str = "No export data available";
const NO_IMPORTS: &str = "No import data available";

/// Partner lists; failed loads show as empty.
pub fn trade_sections(trade: Option<&TradeData>) -> [PanelSection; 2] {
    let empty = TradeData::default();
    let trade = trade.unwrap_or(&empty);
    let rows = |partners: &[TradePartner]| -> Vec<PanelRow> {
        partners
            .iter()
            .map(|p| PanelRow {
                label: p.country_name.clone(),
                value: format_millions(p.value),
            })
            .collect()
    };
    [
        PanelSection {
            title: "Top Export Partners",
            rows: rows(&trade.exports),
            empty_message: NO_EXPORTS,
        },
        PanelSection {
            title: "Top Import Partners",
            rows: rows(&trade.imports),
            empty_message: NO_IMPORTS,
        },
    ]
}

/// Product category lists; failed loads show as empty.
pub fn product_sections(products: Option<&ProductData>) -> [PanelSection; 2] {
    let empty = ProductData::default();
    let products = products.unwrap_or(&empty);
    let rows = |entries: &[ProductEntry]| -> Vec<PanelRow> {
        entries
            .iter()
            .map(|p| PanelRow {
                label: p.product_name.clone(),
                value: format_millions(p.value),
            })
            .collect()
    };
    [
        PanelSection {
            title: "Top Export Categories",
            rows: rows(&products.exports),
            empty_message: NO_EXPORTS,
        },
        PanelSection {
            title: "Top Import Categories",
            rows: rows(&products.imports),
            empty_message: NO_IMPORTS,
        },
    ]
}

pub fn render_side_panel(ctx: &egui::Context, state: &AppState) {
    egui::SidePanel::right("trade_panel")
        .resizable(true)
        .default_width(260.0)
        .min_width(200.0)
        .max_width(400.0)
        .show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                let Some(code) = state.shown_country() else {
                    ui.label(RichText::new("Select a country").color(colors::ui::DIM));
                    return;
                };

                let name = state.country_name(code).unwrap_or(code.as_str());
                ui.heading(RichText::new(name).color(colors::ui::ACTIVE));
                ui.separator();

                match state.tab {
                    ViewTab::Partners => {
                        if !render_loading(ui, &state.trade) {
                            let trade = state.trade.loaded().map(|t| &t.data);
                            render_sections(ui, &trade_sections(trade));
                        }
                    }
                    ViewTab::Products => {
                        if !render_loading(ui, &state.products) {
                            let products = state.products.loaded().map(|p| &p.data);
                            render_sections(ui, &product_sections(products));
                        }
                    }
                }
            });
        });
}

/// Shows a spinner while loading; returns true if it did.
fn render_loading<T>(ui: &mut egui::Ui, load: &LoadState<T>) -> bool {
    if load.is_loading() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(RichText::new("Loading...").color(colors::ui::LABEL));
        });
        return true;
    }
    false
}

fn render_sections(ui: &mut egui::Ui, sections: &[PanelSection]) {
    for section in sections {
        ui.label(RichText::new(section.title).strong().size(14.0));
        ui.add_space(4.0);

        if section.rows.is_empty() {
            ui.label(RichText::new(section.empty_message).color(colors::ui::DIM));
        } else {
            egui::Grid::new(section.title)
                .num_columns(2)
                .striped(true)
                .show(ui, |ui| {
                    for row in &section.rows {
                        ui.label(&row.label);
                        ui.label(
                            RichText::new(&row.value)
                                .monospace()
                                .color(colors::ui::VALUE),
                        );
                        ui.end_row();
                    }
                });
        }
        ui.add_space(10.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_millions() {
        assert_eq!(format_millions(5_000_000.0), "$5.00M");
        assert_eq!(format_millions(1_234_567.0), "$1.23M");
        assert_eq!(format_millions(0.0), "$0.00M");
    }

    #[test]
    fn test_trade_sections_keep_order() {
        let trade = TradeData {
            exports: vec![
                TradePartner {
                    country_code: "124".into(),
                    country_name: "Canada".to_string(),
                    value: 5_000_000.0,
                },
                TradePartner {
                    country_code: "484".into(),
                    country_name: "Mexico".to_string(),
                    value: 9_000_000.0,
                },
            ],
            imports: Vec::new(),
        };
        let [exports, imports] = trade_sections(Some(&trade));
        assert_eq!(exports.title, "Top Export Partners");
        assert_eq!(
            exports.rows[0],
            PanelRow {
                label: "Canada".to_string(),
                value: "$5.00M".to_string()
            }
        );
        assert_eq!(exports.rows[1].label, "Mexico");
        assert!(imports.rows.is_empty());
        assert_eq!(imports.empty_message, "No import data available");
    }

    #[test]
    fn test_failed_trade_shows_fallback() {
        let [exports, imports] = trade_sections(None);
        assert_eq!(exports.title, "Top Export Partners");
        assert!(exports.rows.is_empty() && imports.rows.is_empty());
        assert_eq!(exports.empty_message, "No export data available");
        assert_eq!(imports.empty_message, "No import data available");
    }

    #[test]
    fn test_failed_load_shows_empty_sections() {
        let [exports, imports] = product_sections(None);
        assert!(exports.rows.is_empty() && imports.rows.is_empty());
        assert_eq!(exports.empty_message, "No export data available");
        assert_eq!(imports.title, "Top Import Categories");

        let products = ProductData {
            exports: vec![ProductEntry {
                product_name: "Machinery".to_string(),
                value: 2_500_000.0,
            }],
            imports: Vec::new(),
        };
        let [exports, _] = product_sections(Some(&products));
        assert_eq!(exports.rows[0].value, "$2.50M");
    }
}
