//! Selected country and active tab.

use crate::geo::{CountryCode, MapId};

/// The two views of the page.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTab {
    #[default]
    Partners,
    Products,
}

impl ViewTab {
    pub fn label(&self) -> &'static str {
        match self {
            ViewTab::Partners => "Trade Partners",
            ViewTab::Products => "Products",
        }
    }

    pub fn all() -> &'static [ViewTab] {
        &[ViewTab::Partners, ViewTab::Products]
    }

    /// Map instance shown on this tab.
    pub fn map_id(&self) -> MapId {
        match self {
            ViewTab::Partners => MapId::Primary,
            ViewTab::Products => MapId::Products,
        }
    }
}

/// Current selection plus the generation of its fetches.
///
/// Every call to [`SelectionState::select`] starts a new generation, even for
/// the country that is already selected, so responses can be matched to the
/// selection they were issued for.
#[derive(Default, Debug, Clone)]
pub struct SelectionState {
    current: Option<CountryCode>,
    generation: u64,
}

impl SelectionState {
    pub fn current(&self) -> Option<&CountryCode> {
        self.current.as_ref()
    }

    /// Selects `code` and returns the new generation.
    pub fn select(&mut self, code: CountryCode) -> u64 {
        self.current = Some(code);
        self.generation += 1;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current.is_some() && generation == self.generation
    }
}
