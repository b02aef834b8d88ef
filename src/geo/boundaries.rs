//! World-boundaries dataset: country polygons keyed by feature id.

use super::codes::FeatureId;
use geo_types::Coord;
use geojson::{feature::Id, Feature, FeatureCollection, GeoJson, Geometry, Value};
use glam::DVec3;
use std::collections::HashMap;
use topojson::TopoJson;

/// Rings of one polygon; the first ring is the exterior, the rest are holes.
pub type PolygonRings = Vec<Vec<Coord<f64>>>;

/// A single country boundary.
#[derive(Debug, Clone)]
pub struct CountryFeature {
    /// Numeric id; features without one are drawn but cannot be selected
    pub id: Option<FeatureId>,
    /// Name carried by the dataset, if any
    pub name: Option<String>,
    /// One entry per polygon of the (multi)polygon boundary
    pub polygons: Vec<PolygonRings>,
    /// Spherical centroid of the boundary
    pub centroid: Option<Coord<f64>>,
}

impl CountryFeature {
    /// Creates a feature and computes its centroid.
    pub fn new(id: Option<FeatureId>, name: Option<String>, polygons: Vec<PolygonRings>) -> Self {
        let centroid = spherical_centroid(&polygons);
        Self {
            id,
            name,
            polygons,
            centroid,
        }
    }
}

/// Immutable set of country boundaries, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct WorldBoundaries {
    features: Vec<CountryFeature>,
    by_id: HashMap<FeatureId, usize>,
}

impl WorldBoundaries {
    /// Builds the set from already-decoded features.
    ///
    /// When two features share an id, lookups resolve to the first one.
    pub fn from_features(features: Vec<CountryFeature>) -> Self {
        let mut by_id = HashMap::with_capacity(features.len());
        for (idx, feature) in features.iter().enumerate() {
            if let Some(id) = feature.id {
                by_id.entry(id).or_insert(idx);
            }
        }
        Self { features, by_id }
    }

    /// Parses a TopoJSON topology or a GeoJSON document.
    ///
    /// For TopoJSON, `object_key` names the geometry collection holding the
    /// country boundaries (`countries` in the world-atlas files).
    pub fn parse(text: &str, object_key: &str) -> Result<Self, String> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| format!("Invalid boundaries JSON: {}", e))?;

        let collection = if value.get("type").and_then(|t| t.as_str()) == Some("Topology") {
            Self::topology_to_collection(text, object_key)?
        } else {
            match GeoJson::from_json_value(value)
                .map_err(|e| format!("Failed to parse GeoJSON: {}", e))?
            {
                GeoJson::FeatureCollection(fc) => fc,
                GeoJson::Feature(f) => FeatureCollection {
                    bbox: None,
                    features: vec![f],
                    foreign_members: None,
                },
                GeoJson::Geometry(_) => {
                    return Err("Boundaries must be features, not a bare geometry".to_string())
                }
            }
        };

        let features: Vec<CountryFeature> = collection
            .features
            .iter()
            .filter_map(convert_feature)
            .collect();

        if features.is_empty() {
            return Err("Boundaries dataset contains no polygon features".to_string());
        }

        Ok(Self::from_features(features))
    }

    fn topology_to_collection(text: &str, object_key: &str) -> Result<FeatureCollection, String> {
        let topology = match text
            .parse::<TopoJson>()
            .map_err(|e| format!("Failed to parse TopoJSON: {}", e))?
        {
            TopoJson::Topology(topology) => topology,
            TopoJson::Geometry(_) => {
                return Err("TopoJSON document is not a topology".to_string())
            }
        };

        let key = object_key.to_string();
        topojson::to_geojson(&topology, &key)
            .map_err(|e| format!("Failed to decode TopoJSON object {:?}: {}", object_key, e))
    }

    pub fn features(&self) -> &[CountryFeature] {
        &self.features
    }

    pub fn feature(&self, id: FeatureId) -> Option<&CountryFeature> {
        self.by_id.get(&id).map(|&idx| &self.features[idx])
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn convert_feature(feature: &Feature) -> Option<CountryFeature> {
    let id = match &feature.id {
        Some(Id::String(s)) => FeatureId::parse(s),
        Some(Id::Number(n)) => n.as_u64().and_then(|n| n.try_into().ok()).map(FeatureId),
        None => None,
    };

    let name = feature
        .properties
        .as_ref()
        .and_then(|p| p.get("name").or_else(|| p.get("NAME")))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    let polygons = feature.geometry.as_ref().map(convert_geometry)?;
    if polygons.is_empty() {
        log::debug!("Skipping boundary feature {:?} without polygons", id);
        return None;
    }

    Some(CountryFeature::new(id, name, polygons))
}

fn convert_geometry(geometry: &Geometry) -> Vec<PolygonRings> {
    match &geometry.value {
        Value::Polygon(rings) => convert_rings(rings).into_iter().collect(),
        Value::MultiPolygon(polygons) => polygons.iter().filter_map(|p| convert_rings(p)).collect(),
        Value::GeometryCollection(geometries) => {
            geometries.iter().flat_map(convert_geometry).collect()
        }
        // Points and lines carry no area to fill or click.
        _ => Vec::new(),
    }
}

fn convert_rings(rings: &[Vec<Vec<f64>>]) -> Option<PolygonRings> {
    if rings.is_empty() {
        return None;
    }
    Some(
        rings
            .iter()
            .map(|ring| {
                ring.iter()
                    .filter(|c| c.len() >= 2)
                    .map(|c| Coord { x: c[0], y: c[1] })
                    .collect()
            })
            .collect(),
    )
}

fn to_cartesian(coord: Coord<f64>) -> DVec3 {
    let lambda = coord.x.to_radians();
    let phi = coord.y.to_radians();
    let cos_phi = phi.cos();
    DVec3::new(cos_phi * lambda.cos(), cos_phi * lambda.sin(), phi.sin())
}

/// Spherical centroid of a (multi)polygon, in lon/lat degrees.
///
/// Integrates over the enclosed surface through its boundary edges. Ring
/// winding differs between datasets, so the result is oriented towards the
/// boundary itself: country polygons are always smaller than a hemisphere.
/// Falls back to the length-weighted boundary centroid when the enclosed
/// area vanishes.
pub fn spherical_centroid(polygons: &[PolygonRings]) -> Option<Coord<f64>> {
    let mut surface = DVec3::ZERO;
    let mut boundary = DVec3::ZERO;

    for ring in polygons.iter().flatten() {
        let mut points: Vec<DVec3> = ring.iter().map(|c| to_cartesian(*c)).collect();
        if points.len() >= 2 && points.first() == points.last() {
            points.pop();
        }
        let n = points.len();
        if n < 2 {
            continue;
        }

        for i in 0..n {
            let a = points[i];
            let b = points[(i + 1) % n];
            let cross = a.cross(b);
            let m = cross.length();
            let arc = m.atan2(a.dot(b));
            if m > f64::EPSILON {
                surface += cross * (arc / m);
            }
            boundary += (a + b) * arc;
        }
    }

    let mut direction = surface;
    if direction.length() < 1e-12 {
        direction = boundary;
    } else if direction.dot(boundary) < 0.0 {
        direction = -direction;
    }

    let length = direction.length();
    if length < 1e-12 || !length.is_finite() {
        return None;
    }

    Some(Coord {
        x: direction.y.atan2(direction.x).to_degrees(),
        y: (direction.z / length).clamp(-1.0, 1.0).asin().to_degrees(),
    })
}
