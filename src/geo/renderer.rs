//! Globe rendering.
//!
//! Renders the sphere, country polygons and (on the primary map) trade flow
//! lines into a [`RenderTarget`]. Rendering is a pure function of its inputs:
//! the projection is rebuilt on every call and nothing is cached between
//! calls.

use super::boundaries::{CountryFeature, WorldBoundaries};
use super::codes::{CountryCode, FeatureId};
use super::flows::{render_flows, FlowDirection, FlowSummary};
use super::index::CountryGeometryIndex;
use super::projection::{OrthographicProjection, RotationState, Viewport};
use crate::api::{CountryData, TradeData};
use crate::ui::colors;
use eframe::egui::{Color32, Pos2};

/// Projected outline of one polygon: exterior ring first, then holes.
pub type ScreenPolygon = Vec<Vec<Pos2>>;

/// The two map instances sharing one rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapId {
    /// Partners tab; the only instance that draws flow lines.
    Primary,
    /// Products tab.
    Products,
}

impl MapId {
    pub fn all() -> &'static [MapId] {
        &[MapId::Primary, MapId::Products]
    }

    pub fn draws_flows(&self) -> bool {
        matches!(self, MapId::Primary)
    }
}

/// Drawing surface of a single map instance.
pub trait RenderTarget {
    /// Current size of the surface.
    fn viewport(&self) -> Viewport;

    /// Removes everything previously drawn, flows included.
    fn clear(&mut self);

    fn draw_sphere(&mut self, center: Pos2, radius: f32, fill: Color32);

    /// Draws one country; `polygons` are already clipped and projected.
    fn draw_country(
        &mut self,
        feature: Option<FeatureId>,
        polygons: Vec<ScreenPolygon>,
        fill: Color32,
    );

    /// Removes previously drawn flow lines only.
    fn clear_flows(&mut self);

    fn draw_flow(&mut self, from: Pos2, to: Pos2, direction: FlowDirection);
}

/// Everything a map instance is drawn from.
#[derive(Clone, Copy)]
pub struct MapInputs<'a> {
    pub rotation: RotationState,
    pub scale: f64,
    pub selection: Option<&'a CountryCode>,
    pub boundaries: Option<&'a WorldBoundaries>,
    pub index: &'a CountryGeometryIndex,
    /// Partners to draw flows for, keyed by the country they were fetched for
    pub trade: Option<&'a CountryData<TradeData>>,
}

impl MapInputs<'_> {
    /// Fill color of a feature: highlighted iff it resolves to the selection.
    pub fn fill_for(&self, feature: &CountryFeature) -> Color32 {
        let selected = match (feature.id, self.selection) {
            (Some(id), Some(selection)) => self.index.code_for_feature(id) == Some(selection),
            _ => false,
        };
        if selected {
            colors::map::HIGHLIGHT
        } else {
            colors::map::NEUTRAL
        }
    }
}

/// Redraws one map instance from scratch.
///
/// Returns the flow summary when flows were drawn (primary instance with
/// trade data). Flows start at the country the trade data belongs to.
pub fn render_map(
    map: MapId,
    inputs: &MapInputs<'_>,
    target: &mut dyn RenderTarget,
) -> Option<FlowSummary> {
    let viewport = target.viewport();
    let projection = OrthographicProjection::new(inputs.scale, inputs.rotation, viewport);

    target.clear();

    let Some(boundaries) = inputs.boundaries else {
        log::debug!("{:?} map not drawn: world boundaries are not loaded", map);
        return None;
    };

    let radius = projection.scale() as f32;
    target.draw_sphere(projection.center(), radius, colors::map::OCEAN);

    for feature in boundaries.features() {
        let polygons = project_feature(feature, &projection);
        if polygons.is_empty() {
            continue;
        }
        target.draw_country(feature.id, polygons, inputs.fill_for(feature));
    }

    if !map.draws_flows() {
        return None;
    }
    let trade = inputs.trade?;
    Some(render_flows(&trade.code, &trade.data, &projection, inputs.index, target))
}

/// Clips and projects every polygon of a feature, dropping the hidden ones.
fn project_feature(
    feature: &CountryFeature,
    projection: &OrthographicProjection,
) -> Vec<ScreenPolygon> {
    let mut out = Vec::with_capacity(feature.polygons.len());
    for rings in &feature.polygons {
        let Some((exterior, holes)) = rings.split_first() else {
            continue;
        };
        let exterior = projection.project_ring(exterior);
        if exterior.is_empty() {
            continue;
        }

        let mut polygon = Vec::with_capacity(rings.len());
        polygon.push(exterior);
        polygon.extend(
            holes
                .iter()
                .map(|hole| projection.project_ring(hole))
                .filter(|hole| !hole.is_empty()),
        );
        out.push(polygon);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TradePartner;
    use crate::geo::boundaries::PolygonRings;
    use crate::geo::scene::MapScene;
    use geo_types::Coord;

    fn square(lon: f64, lat: f64) -> PolygonRings {
        let corners = [
            (lon - 2.0, lat - 2.0),
            (lon + 2.0, lat - 2.0),
            (lon + 2.0, lat + 2.0),
            (lon - 2.0, lat + 2.0),
            (lon - 2.0, lat - 2.0),
        ];
        vec![corners.into_iter().map(Coord::from).collect()]
    }

    fn world() -> WorldBoundaries {
        WorldBoundaries::from_features(vec![
            CountryFeature::new(Some(FeatureId(840)), None, vec![square(-98.0, 39.0)]),
            CountryFeature::new(Some(FeatureId(124)), None, vec![square(-106.0, 56.0)]),
            // Far side of the globe when looking at America.
            CountryFeature::new(Some(FeatureId(36)), None, vec![square(134.0, -25.0)]),
            CountryFeature::new(None, None, vec![square(-80.0, 20.0)]),
        ])
    }

    fn index(world: &WorldBoundaries) -> CountryGeometryIndex {
        let codes: Vec<CountryCode> = ["840", "124", "036"]
            .into_iter()
            .map(CountryCode::from)
            .collect();
        CountryGeometryIndex::build(world, &codes)
    }

    /// United States exporting to Canada.
    fn trade() -> CountryData<TradeData> {
        CountryData::new(
            "840".into(),
            TradeData {
                exports: vec![TradePartner {
                    country_code: "124".into(),
                    country_name: "Canada".to_string(),
                    value: 5_000_000.0,
                }],
                imports: Vec::new(),
            },
        )
    }

    fn america() -> RotationState {
        RotationState::new(100.0, -40.0, 0.0)
    }

    #[test]
    fn test_selected_country_is_highlighted() {
        let world = world();
        let index = index(&world);
        let selection = CountryCode::from("840");
        let inputs = MapInputs {
            rotation: america(),
            scale: 250.0,
            selection: Some(&selection),
            boundaries: Some(&world),
            index: &index,
            trade: None,
        };
        let mut scene = MapScene::new(Viewport::new(800.0, 600.0));
        render_map(MapId::Products, &inputs, &mut scene);

        // Australia is hidden; the id-less feature is still drawn.
        assert_eq!(scene.countries().len(), 3);
        for shape in scene.countries() {
            let expected = if shape.feature == Some(FeatureId(840)) {
                colors::map::HIGHLIGHT
            } else {
                colors::map::NEUTRAL
            };
            assert_eq!(shape.fill, expected);
        }
        assert!(scene.sphere().is_some());
    }

    #[test]
    fn test_missing_boundaries_renders_nothing() {
        let index = CountryGeometryIndex::new();
        let inputs = MapInputs {
            rotation: america(),
            scale: 250.0,
            selection: None,
            boundaries: None,
            index: &index,
            trade: None,
        };
        let mut scene = MapScene::new(Viewport::new(800.0, 600.0));
        assert!(render_map(MapId::Primary, &inputs, &mut scene).is_none());
        assert!(scene.sphere().is_none());
        assert!(scene.countries().is_empty());
        assert_eq!(scene.revision(), 1);
    }

    #[test]
    fn test_redraw_is_idempotent() {
        let world = world();
        let index = index(&world);
        let selection = CountryCode::from("840");
        let trade = trade();
        let inputs = MapInputs {
            rotation: america(),
            scale: 250.0,
            selection: Some(&selection),
            boundaries: Some(&world),
            index: &index,
            trade: Some(&trade),
        };
        let mut scene = MapScene::new(Viewport::new(800.0, 600.0));
        render_map(MapId::Primary, &inputs, &mut scene);
        let first = scene.clone();
        render_map(MapId::Primary, &inputs, &mut scene);

        assert_eq!(first.sphere(), scene.sphere());
        assert_eq!(first.countries(), scene.countries());
        assert_eq!(first.flows(), scene.flows());
        assert_eq!(scene.flows().len(), 1);
    }

    #[test]
    fn test_only_primary_draws_flows() {
        let world = world();
        let index = index(&world);
        let selection = CountryCode::from("840");
        let trade = trade();
        let inputs = MapInputs {
            rotation: america(),
            scale: 250.0,
            selection: Some(&selection),
            boundaries: Some(&world),
            index: &index,
            trade: Some(&trade),
        };

        let mut primary = MapScene::new(Viewport::new(800.0, 600.0));
        let mut products = MapScene::new(Viewport::new(800.0, 600.0));
        let summary = render_map(MapId::Primary, &inputs, &mut primary).unwrap();
        assert!(render_map(MapId::Products, &inputs, &mut products).is_none());

        assert_eq!(summary.drawn, 1);
        assert_eq!(primary.flows().len(), 1);
        assert!(products.flows().is_empty());
    }

    #[test]
    fn test_selection_without_trade_clears_flows() {
        let world = world();
        let index = index(&world);
        let selection = CountryCode::from("840");
        let trade = trade();
        let mut inputs = MapInputs {
            rotation: america(),
            scale: 250.0,
            selection: Some(&selection),
            boundaries: Some(&world),
            index: &index,
            trade: Some(&trade),
        };
        let mut scene = MapScene::new(Viewport::new(800.0, 600.0));
        render_map(MapId::Primary, &inputs, &mut scene);
        assert_eq!(scene.flows().len(), 1);

        inputs.trade = None;
        render_map(MapId::Primary, &inputs, &mut scene);
        assert!(scene.flows().is_empty());
    }

    #[test]
    fn test_flows_start_at_the_trade_country() {
        let world = world();
        let index = index(&world);
        // Canada is selected but the partners belong to the United States.
        let selection = CountryCode::from("124");
        let trade = trade();
        let inputs = MapInputs {
            rotation: america(),
            scale: 250.0,
            selection: Some(&selection),
            boundaries: Some(&world),
            index: &index,
            trade: Some(&trade),
        };
        let mut scene = MapScene::new(Viewport::new(800.0, 600.0));
        render_map(MapId::Primary, &inputs, &mut scene);

        let projection = OrthographicProjection::new(250.0, america(), Viewport::new(800.0, 600.0));
        let origin = index.centroid(&"840".into()).unwrap();
        let partner = index.centroid(&"124".into()).unwrap();
        let flow = &scene.flows()[0];
        assert_eq!(Some(flow.from), projection.project(origin));
        assert_eq!(Some(flow.to), projection.project(partner));
    }
}
