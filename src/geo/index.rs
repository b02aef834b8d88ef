//! Country code ↔ boundary feature index.

use super::boundaries::WorldBoundaries;
use super::codes::{CountryCode, FeatureId, ResolutionError};
use geo_types::Coord;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct IndexedCountry {
    feature: FeatureId,
    centroid: Option<Coord<f64>>,
}

/// Maps trade-API country codes to boundary features and back.
///
/// Built once both the boundaries and the country list are available, and
/// never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct CountryGeometryIndex {
    by_code: HashMap<CountryCode, IndexedCountry>,
    by_feature: HashMap<FeatureId, CountryCode>,
}

impl CountryGeometryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index for `codes` against `boundaries`.
    ///
    /// Codes that do not resolve to a feature are logged and left out.
    pub fn build<'a>(
        boundaries: &WorldBoundaries,
        codes: impl IntoIterator<Item = &'a CountryCode>,
    ) -> Self {
        let mut index = Self::new();
        let mut omitted = 0usize;

        for code in codes {
            if let Err(e) = index.insert(boundaries, code) {
                log::debug!("Country omitted from map: {}", e);
                omitted += 1;
            }
        }

        if omitted > 0 {
            log::warn!(
                "{} countries have no matching boundary feature and are not clickable",
                omitted
            );
        }
        index
    }

    /// Resolves one code and records it.
    ///
    /// A code already present keeps its first mapping. If another code
    /// already claimed the feature, reverse lookup keeps returning that one.
    pub fn insert(
        &mut self,
        boundaries: &WorldBoundaries,
        code: &CountryCode,
    ) -> Result<FeatureId, ResolutionError> {
        if let Some(existing) = self.by_code.get(code) {
            return Ok(existing.feature);
        }

        let id = code.feature_id()?;
        let feature = boundaries
            .feature(id)
            .ok_or_else(|| ResolutionError::NoFeature(code.clone(), id))?;

        self.by_code.insert(
            code.clone(),
            IndexedCountry {
                feature: id,
                centroid: feature.centroid,
            },
        );
        self.by_feature.entry(id).or_insert_with(|| code.clone());
        Ok(id)
    }

    /// Reverse lookup: which country code owns this feature.
    pub fn code_for_feature(&self, feature: FeatureId) -> Option<&CountryCode> {
        self.by_feature.get(&feature)
    }

    pub fn feature_for_code(&self, code: &CountryCode) -> Option<FeatureId> {
        self.by_code.get(code).map(|c| c.feature)
    }

    /// Centroid of the feature matched to `code`, in lon/lat degrees.
    pub fn centroid(&self, code: &CountryCode) -> Option<Coord<f64>> {
        self.by_code.get(code).and_then(|c| c.centroid)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
