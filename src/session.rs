//! Session coordinator.
//!
//! Owns all application state. UI events and fetch results come in through
//! the methods below; each one mutates state, issues fetches through the
//! injected [`Fetcher`] and synchronously redraws the affected maps.

use crate::api::{ApiRequest, ApiResponse, CountryData};
use crate::geo::{
    render_map, CountryCode, CountryGeometryIndex, MapId, MapInputs, MapScene, RotationState,
    Viewport, WorldBoundaries,
};
use crate::state::url_state::{self, UrlParams};
use crate::state::{AppState, GlobeSettings, LoadState, RotationController, ViewTab};
use eframe::egui::Pos2;

/// Issues requests; results come back later as [`ApiResponse`]s.
pub trait Fetcher {
    fn fetch(&mut self, request: ApiRequest);
}

pub struct Session {
    settings: GlobeSettings,
    state: AppState,
    boundaries: LoadState<WorldBoundaries>,
    index: CountryGeometryIndex,
    primary_map: MapScene,
    products_map: MapScene,
    /// Country from the URL, selected once the country list arrives
    pending_country: Option<CountryCode>,
}

impl Session {
    pub fn new(settings: GlobeSettings, url: UrlParams) -> Self {
        // The URL stores the view center; rotating by its negation centers it.
        let rotation = RotationState::new(-url.lon.unwrap_or(0.0), -url.lat.unwrap_or(0.0), 0.0);
        let state = AppState::new(RotationController::new(rotation, settings.drag_sensitivity));

        Self {
            settings,
            state,
            boundaries: LoadState::Idle,
            index: CountryGeometryIndex::new(),
            primary_map: MapScene::default(),
            products_map: MapScene::default(),
            pending_country: url.country.map(CountryCode::new),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn index(&self) -> &CountryGeometryIndex {
        &self.index
    }

    pub fn boundaries(&self) -> &LoadState<WorldBoundaries> {
        &self.boundaries
    }

    pub fn scene(&self, map: MapId) -> &MapScene {
        match map {
            MapId::Primary => &self.primary_map,
            MapId::Products => &self.products_map,
        }
    }

    /// Requests the boundaries and the country list.
    pub fn start(&mut self, fetcher: &mut dyn Fetcher) {
        self.boundaries = LoadState::Loading;
        self.state.countries = LoadState::Loading;
        fetcher.fetch(ApiRequest::Boundaries);
        fetcher.fetch(ApiRequest::Countries);
    }

    /// Selects `code` and fetches its trade partners and products.
    ///
    /// Re-selecting the current country fetches again.
    pub fn select_country(&mut self, code: CountryCode, fetcher: &mut dyn Fetcher) {
        log::info!("Selected country {}", code);
        let generation = self.state.selection.select(code.clone());

        self.state.trade = LoadState::Loading;
        self.state.products = LoadState::Loading;
        self.state.status_message = match self.state.country_name(&code) {
            Some(name) => format!("Loading trade data for {}...", name),
            None => format!("Loading trade data for {}...", code),
        };

        fetcher.fetch(ApiRequest::Trade {
            code: code.clone(),
            generation,
        });
        fetcher.fetch(ApiRequest::Products { code, generation });

        self.push_url();
        self.redraw_all();
    }

    /// Switches tab and redraws that tab's map only.
    pub fn set_tab(&mut self, tab: ViewTab) {
        if self.state.tab == tab {
            return;
        }
        self.state.tab = tab;
        self.redraw(tab.map_id());
    }

    pub fn drag_start(&mut self, pos: Pos2) {
        self.state.rotation.on_drag_start(pos);
    }

    pub fn drag_move(&mut self, pos: Pos2) {
        if self.state.rotation.on_drag_move(pos) {
            self.redraw_all();
        }
    }

    pub fn drag_end(&mut self) {
        if self.state.rotation.is_dragging() {
            self.state.rotation.on_drag_end();
            self.push_url();
        }
    }

    /// Handles a click at `pos` (map-local coordinates).
    ///
    /// Returns the selected code if the click landed on a known country.
    pub fn click(
        &mut self,
        map: MapId,
        pos: Pos2,
        fetcher: &mut dyn Fetcher,
    ) -> Option<CountryCode> {
        let feature = self.scene(map).hit_test(pos)?;
        let Some(code) = self.index.code_for_feature(feature).cloned() else {
            log::debug!("Feature {} has no country in the trade data", feature);
            return None;
        };
        self.select_country(code.clone(), fetcher);
        Some(code)
    }

    /// Updates a map's surface size, redrawing it if the size changed.
    pub fn resize(&mut self, map: MapId, viewport: Viewport) {
        let scene = match map {
            MapId::Primary => &mut self.primary_map,
            MapId::Products => &mut self.products_map,
        };
        if scene.set_viewport(viewport) {
            self.redraw(map);
        }
    }

    /// Applies a completed fetch.
    pub fn handle_response(&mut self, response: ApiResponse, fetcher: &mut dyn Fetcher) {
        match response {
            ApiResponse::Boundaries(Ok(boundaries)) => {
                log::info!("Loaded {} country boundaries", boundaries.len());
                self.boundaries = LoadState::Loaded(boundaries);
                self.rebuild_index();
                self.update_ready_status();
                self.redraw_all();
            }
            ApiResponse::Boundaries(Err(e)) => {
                log::error!("Failed to load world boundaries: {}", e);
                self.boundaries = LoadState::Failed(e.to_string());
                self.state.status_message = format!("Error loading map: {}", e);
                self.redraw_all();
            }
            ApiResponse::Countries(Ok(countries)) if countries.is_empty() => {
                log::error!("Country list is empty");
                self.state.countries = LoadState::Failed("empty country list".to_string());
                self.state.status_message = "Error loading countries".to_string();
            }
            ApiResponse::Countries(Ok(countries)) => {
                log::info!("Loaded {} countries", countries.len());
                self.state.countries = LoadState::Loaded(countries);
                self.rebuild_index();
                self.update_ready_status();
                self.redraw_all();
                if let Some(code) = self.pending_country.take() {
                    self.select_country(code, fetcher);
                }
            }
            ApiResponse::Countries(Err(e)) => {
                log::error!("Error loading countries: {}", e);
                self.state.countries = LoadState::Failed(e.to_string());
                self.state.status_message = "Error loading countries".to_string();
            }
            ApiResponse::Trade {
                code,
                generation,
                result,
            } => {
                if self.is_stale(generation) {
                    log::debug!(
                        "Discarding stale trade data for {} (generation {})",
                        code,
                        generation
                    );
                    return;
                }
                self.state.trade = match result {
                    Ok(trade) => {
                        self.state.status_message = "Ready".to_string();
                        LoadState::Loaded(CountryData::new(code, trade))
                    }
                    Err(e) => {
                        log::error!("Error fetching trade data for {}: {}", code, e);
                        self.state.status_message = format!("Error fetching trade data: {}", e);
                        LoadState::Failed(e.to_string())
                    }
                };
                self.redraw(MapId::Primary);
            }
            ApiResponse::Products {
                code,
                generation,
                result,
            } => {
                if self.is_stale(generation) {
                    log::debug!(
                        "Discarding stale product data for {} (generation {})",
                        code,
                        generation
                    );
                    return;
                }
                self.state.products = match result {
                    Ok(products) => LoadState::Loaded(CountryData::new(code, products)),
                    Err(e) => {
                        log::error!("Error fetching product data for {}: {}", code, e);
                        LoadState::Failed(e.to_string())
                    }
                };
            }
        }
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.settings.discard_stale_responses && !self.state.selection.is_current(generation)
    }

    fn rebuild_index(&mut self) {
        let (Some(boundaries), Some(countries)) =
            (self.boundaries.loaded(), self.state.countries.loaded())
        else {
            return;
        };
        self.index =
            CountryGeometryIndex::build(boundaries, countries.iter().map(|c| &c.country_code));
        log::info!(
            "{} of {} countries matched to boundaries",
            self.index.len(),
            countries.len()
        );
    }

    fn update_ready_status(&mut self) {
        if self.boundaries.loaded().is_some() && self.state.countries.loaded().is_some() {
            self.state.status_message = "Ready".to_string();
        }
    }

    fn push_url(&self) {
        let rotation = self.state.rotation.rotation();
        url_state::push_to_url(
            self.state.selection.current().map(|c| c.as_str()),
            -rotation.longitude,
            -rotation.latitude,
        );
    }

    /// Redraws one map instance from the current state.
    pub fn redraw(&mut self, map: MapId) {
        let inputs = MapInputs {
            rotation: self.state.rotation.rotation(),
            scale: self.settings.globe_scale,
            selection: self.state.selection.current(),
            boundaries: self.boundaries.loaded(),
            index: &self.index,
            trade: self.state.trade.loaded(),
        };
        let scene = match map {
            MapId::Primary => &mut self.primary_map,
            MapId::Products => &mut self.products_map,
        };
        if let Some(flows) = render_map(map, &inputs, scene) {
            log::trace!("{:?} flows: {:?}", map, flows);
        }
    }

    pub fn redraw_all(&mut self) {
        for map in MapId::all() {
            self.redraw(*map);
        }
    }
}
