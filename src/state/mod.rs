//! Application state management.
//!
//! This module contains all state structures used throughout the application.
//! State is organized into logical groupings that correspond to different
//! areas of functionality.

mod rotation;
mod selection;
mod settings;
pub mod url_state;

use crate::api::{Country, CountryData, ProductData, TradeData};
use crate::geo::CountryCode;

pub use rotation::{RotationController, DEFAULT_DRAG_SENSITIVITY};
pub use selection::{SelectionState, ViewTab};
pub use settings::{GlobeSettings, DEFAULT_BOUNDARIES_URL, DEFAULT_GLOBE_SCALE};

/// Progress of one piece of remote data.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }
}

/// Root application state containing all sub-states.
#[derive(Default)]
pub struct AppState {
    /// Globe orientation and drag handling, shared by both maps
    pub rotation: RotationController,

    /// Selected country and its request generation
    pub selection: SelectionState,

    /// Tab currently shown
    pub tab: ViewTab,

    /// Country list for the selector
    pub countries: LoadState<Vec<Country>>,

    /// Trade partners, tagged with the country they were fetched for
    pub trade: LoadState<CountryData<TradeData>>,

    /// Product categories, tagged with the country they were fetched for
    pub products: LoadState<CountryData<ProductData>>,

    /// Application status message displayed in top bar
    pub status_message: String,
}

impl AppState {
    pub fn new(rotation: RotationController) -> Self {
        Self {
            rotation,
            status_message: "Loading map...".to_string(),
            ..Default::default()
        }
    }

    /// Display name of a country code, if the country list has it.
    pub fn country_name(&self, code: &CountryCode) -> Option<&str> {
        self.countries
            .loaded()?
            .iter()
            .find(|c| &c.country_code == code)
            .map(|c| c.country_name.as_str())
    }

    /// Country whose data the active tab shows.
    ///
    /// Normally the selection; when stale responses are kept, a late
    /// response shows under the country it was fetched for.
    pub fn shown_country(&self) -> Option<&CountryCode> {
        let loaded = match self.tab {
            ViewTab::Partners => self.trade.loaded().map(|t| &t.code),
            ViewTab::Products => self.products.loaded().map(|p| &p.code),
        };
        loaded.or_else(|| self.selection.current())
    }
}
