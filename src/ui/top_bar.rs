//! Top bar UI: app title, country selector, view tabs and status.

use super::colors;
use crate::geo::CountryCode;
use crate::session::{Fetcher, Session};
use crate::state::{LoadState, ViewTab};
use eframe::egui::{self, Color32, RichText};

pub fn render_top_bar(ctx: &egui::Context, session: &mut Session, fetcher: &mut dyn Fetcher) {
    egui::TopBottomPanel::top("top_bar")
        .exact_height(36.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(
                    RichText::new("Trade Globe")
                        .strong()
                        .size(16.0)
                        .color(Color32::WHITE),
                );

                ui.separator();

                if let Some(code) = render_country_selector(ui, session) {
                    session.select_country(code, fetcher);
                }

                ui.separator();

                let current = session.state().tab;
                for tab in ViewTab::all() {
                    let text = if *tab == current {
                        RichText::new(tab.label()).color(colors::ui::ACTIVE)
                    } else {
                        RichText::new(tab.label())
                    };
                    if ui.selectable_label(*tab == current, text).clicked() {
                        session.set_tab(*tab);
                    }
                }

                ui.separator();

                let state = session.state();
                let failed = state.countries.is_failed() || session.boundaries().is_failed();
                let status_color = if failed {
                    colors::ui::ERROR
                } else {
                    Color32::GRAY
                };
                ui.label(
                    RichText::new(&state.status_message)
                        .size(13.0)
                        .color(status_color),
                );
            });
        });
}

/// Country dropdown; follows the current selection. Returns a newly chosen code.
fn render_country_selector(ui: &mut egui::Ui, session: &Session) -> Option<CountryCode> {
    let state = session.state();
    let countries = match &state.countries {
        LoadState::Loaded(countries) => countries,
        LoadState::Failed(_) => {
            ui.label(RichText::new("Error loading countries").color(colors::ui::ERROR));
            return None;
        }
        LoadState::Idle | LoadState::Loading => {
            ui.spinner();
            return None;
        }
    };

    let current = state.selection.current();
    let selected_text = current
        .map(|code| state.country_name(code).unwrap_or(code.as_str()).to_string())
        .unwrap_or_else(|| "Select a country".to_string());

    let mut chosen = None;
    egui::ComboBox::from_id_salt("country_selector")
        .selected_text(selected_text)
        .width(200.0)
        .show_ui(ui, |ui| {
            for country in countries {
                let is_current = current == Some(&country.country_code);
                if ui
                    .selectable_label(is_current, &country.country_name)
                    .clicked()
                {
                    chosen = Some(country.country_code.clone());
                }
            }
        });
    chosen
}
