//! eframe application: wires the session to the fetcher and the UI panels.

use crate::api::{ApiChannel, Endpoints};
use crate::session::Session;
use crate::state::{url_state, GlobeSettings};
use crate::ui;
use eframe::egui;

pub struct GlobeApp {
    /// All application state
    session: Session,

    /// Channel for background fetches
    api: ApiChannel,
}

impl GlobeApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = GlobeSettings::load();
        // Persist so the stored copy always has every field.
        settings.save();
        log::info!(
            "Trade API at {}, boundaries from {}",
            settings.api_base_url,
            settings.boundaries_url
        );

        let mut api = ApiChannel::new(cc.egui_ctx.clone(), Endpoints::from_settings(&settings));
        let mut session = Session::new(settings, url_state::parse_from_url());
        session.start(&mut api);

        Self { session, api }
    }
}

impl eframe::App for GlobeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed fetches
        while let Some(response) = self.api.try_recv() {
            self.session.handle_response(response, &mut self.api);
        }

        ui::render_top_bar(ctx, &mut self.session, &mut self.api);
        ui::render_side_panel(ctx, self.session.state());
        ui::render_canvas(ctx, &mut self.session, &mut self.api);
    }
}
