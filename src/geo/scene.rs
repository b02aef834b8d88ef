//! Retained display list for one map instance.
//!
//! The renderer writes into a [`MapScene`]; the canvas paints it with egui
//! and uses it to hit-test clicks against exactly what was drawn.

use super::codes::FeatureId;
use super::flows::FlowDirection;
use super::projection::Viewport;
use super::renderer::{RenderTarget, ScreenPolygon};
use crate::ui::colors;
use earcutr::earcut;
use eframe::egui::{epaint::Mesh, Color32, Painter, Pos2, Shape, Stroke, Vec2};

const BORDER_WIDTH: f32 = 0.5;
const FLOW_WIDTH: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Pos2,
    pub radius: f32,
    pub fill: Color32,
}

/// One filled polygon, triangulated for painting and hit-testing.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    /// Exterior ring followed by holes
    pub rings: ScreenPolygon,
    /// Vertices of all rings, flattened in ring order
    pub vertices: Vec<Pos2>,
    /// Triangle indices into `vertices`
    pub triangles: Vec<[usize; 3]>,
}

impl PolygonShape {
    fn new(rings: ScreenPolygon) -> Self {
        let mut coords = Vec::new();
        let mut hole_indices = Vec::new();
        let mut vertices = Vec::new();

        for (i, ring) in rings.iter().enumerate() {
            if i > 0 {
                hole_indices.push(vertices.len());
            }
            for p in ring {
                coords.push(p.x as f64);
                coords.push(p.y as f64);
                vertices.push(*p);
            }
        }

        let triangles = match earcut(&coords, &hole_indices, 2) {
            Ok(indices) => indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect(),
            Err(e) => {
                log::debug!("Polygon triangulation failed: {:?}", e);
                Vec::new()
            }
        };

        Self {
            rings,
            vertices,
            triangles,
        }
    }

    fn contains(&self, pos: Pos2) -> bool {
        self.triangles.iter().any(|&[a, b, c]| {
            point_in_triangle(pos, self.vertices[a], self.vertices[b], self.vertices[c])
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryShape {
    pub feature: Option<FeatureId>,
    pub fill: Color32,
    pub polygons: Vec<PolygonShape>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowLine {
    pub from: Pos2,
    pub to: Pos2,
    pub direction: FlowDirection,
}

/// Display list of one map instance, in local (viewport) coordinates.
#[derive(Debug, Clone, Default)]
pub struct MapScene {
    viewport: Viewport,
    sphere: Option<Sphere>,
    countries: Vec<CountryShape>,
    flows: Vec<FlowLine>,
    /// Incremented on every full clear
    revision: u64,
}

impl MapScene {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Updates the surface size. Returns true if it changed.
    pub fn set_viewport(&mut self, viewport: Viewport) -> bool {
        if self.viewport == viewport {
            return false;
        }
        self.viewport = viewport;
        true
    }

    pub fn sphere(&self) -> Option<&Sphere> {
        self.sphere.as_ref()
    }

    pub fn countries(&self) -> &[CountryShape] {
        &self.countries
    }

    pub fn flows(&self) -> &[FlowLine] {
        &self.flows
    }

    /// Number of times the scene has been redrawn.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Feature under `pos` (local coordinates), topmost first.
    ///
    /// Returns `None` for the ocean and for features without an id.
    pub fn hit_test(&self, pos: Pos2) -> Option<FeatureId> {
        self.countries
            .iter()
            .rev()
            .find(|country| country.polygons.iter().any(|p| p.contains(pos)))
            .and_then(|country| country.feature)
    }

    /// Paints the scene with its local origin at `origin`.
    pub fn paint(&self, painter: &Painter, origin: Pos2) {
        let offset = origin.to_vec2();
        let border = Stroke::new(BORDER_WIDTH, colors::map::BORDER);

        if let Some(sphere) = &self.sphere {
            painter.circle(sphere.center + offset, sphere.radius, sphere.fill, border);
        }

        for country in &self.countries {
            for polygon in &country.polygons {
                painter.add(fill_mesh(polygon, country.fill, offset));
                for ring in &polygon.rings {
                    let points = ring.iter().map(|p| *p + offset).collect();
                    painter.add(Shape::closed_line(points, border));
                }
            }
        }

        for flow in &self.flows {
            let color = match flow.direction {
                FlowDirection::Export => colors::map::EXPORT_FLOW,
                FlowDirection::Import => colors::map::IMPORT_FLOW,
            };
            let stroke = Stroke::new(FLOW_WIDTH, color);
            painter.arrow(flow.from + offset, flow.to - flow.from, stroke);
        }
    }
}

impl RenderTarget for MapScene {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn clear(&mut self) {
        self.sphere = None;
        self.countries.clear();
        self.flows.clear();
        self.revision += 1;
    }

    fn draw_sphere(&mut self, center: Pos2, radius: f32, fill: Color32) {
        self.sphere = Some(Sphere {
            center,
            radius,
            fill,
        });
    }

    fn draw_country(
        &mut self,
        feature: Option<FeatureId>,
        polygons: Vec<ScreenPolygon>,
        fill: Color32,
    ) {
        let polygons = polygons.into_iter().map(PolygonShape::new).collect();
        self.countries.push(CountryShape {
            feature,
            fill,
            polygons,
        });
    }

    fn clear_flows(&mut self) {
        self.flows.clear();
    }

    fn draw_flow(&mut self, from: Pos2, to: Pos2, direction: FlowDirection) {
        self.flows.push(FlowLine {
            from,
            to,
            direction,
        });
    }
}

fn fill_mesh(polygon: &PolygonShape, fill: Color32, offset: Vec2) -> Shape {
    let mut mesh = Mesh::default();
    for p in &polygon.vertices {
        mesh.colored_vertex(*p + offset, fill);
    }
    for &[a, b, c] in &polygon.triangles {
        mesh.add_triangle(a as u32, b as u32, c as u32);
    }
    Shape::mesh(mesh)
}

/// Barycentric point-in-triangle test; degenerate triangles contain nothing.
fn point_in_triangle(p: Pos2, a: Pos2, b: Pos2, c: Pos2) -> bool {
    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;

    let dot00 = v0.dot(v0);
    let dot01 = v0.dot(v1);
    let dot02 = v0.dot(v2);
    let dot11 = v1.dot(v1);
    let dot12 = v1.dot(v2);

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom.abs() < 1e-8 {
        return false;
    }
    let inv = 1.0 / denom;
    let u = (dot11 * dot02 - dot01 * dot12) * inv;
    let v = (dot00 * dot12 - dot01 * dot02) * inv;
    u >= 0.0 && v >= 0.0 && u + v <= 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Pos2> {
        vec![
            Pos2::new(x0, y0),
            Pos2::new(x1, y0),
            Pos2::new(x1, y1),
            Pos2::new(x0, y1),
        ]
    }

    /// Draws a square country spanning `min..max` on both axes.
    fn draw_square(scene: &mut MapScene, feature: Option<u32>, min: f32, max: f32) {
        let rings = vec![rect(min, min, max, max)];
        scene.draw_country(feature.map(FeatureId), vec![rings], colors::map::NEUTRAL);
    }

    #[test]
    fn test_hit_test_uses_filled_area() {
        let mut scene = MapScene::new(Viewport::new(200.0, 200.0));
        scene.clear();
        draw_square(&mut scene, Some(1), 10.0, 50.0);

        assert_eq!(scene.hit_test(Pos2::new(30.0, 30.0)), Some(FeatureId(1)));
        assert_eq!(scene.hit_test(Pos2::new(60.0, 30.0)), None);
    }

    #[test]
    fn test_hit_test_respects_holes() {
        let mut scene = MapScene::new(Viewport::new(200.0, 200.0));
        scene.draw_country(
            Some(FeatureId(1)),
            vec![vec![rect(0.0, 0.0, 100.0, 100.0), rect(40.0, 40.0, 60.0, 60.0)]],
            colors::map::NEUTRAL,
        );
        assert_eq!(scene.hit_test(Pos2::new(20.0, 20.0)), Some(FeatureId(1)));
        assert_eq!(scene.hit_test(Pos2::new(50.0, 50.0)), None);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut scene = MapScene::new(Viewport::new(200.0, 200.0));
        draw_square(&mut scene, Some(1), 0.0, 100.0);
        draw_square(&mut scene, Some(2), 40.0, 60.0);
        draw_square(&mut scene, None, 80.0, 90.0);

        assert_eq!(scene.hit_test(Pos2::new(50.0, 50.0)), Some(FeatureId(2)));
        assert_eq!(scene.hit_test(Pos2::new(10.0, 10.0)), Some(FeatureId(1)));
        assert_eq!(scene.hit_test(Pos2::new(85.0, 85.0)), None);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut scene = MapScene::new(Viewport::new(200.0, 200.0));
        scene.draw_sphere(Pos2::new(100.0, 100.0), 50.0, colors::map::OCEAN);
        draw_square(&mut scene, Some(1), 0.0, 10.0);
        scene.draw_flow(Pos2::ZERO, Pos2::new(5.0, 5.0), FlowDirection::Export);

        scene.clear_flows();
        assert!(scene.flows().is_empty());
        assert_eq!(scene.countries().len(), 1);

        scene.clear();
        assert!(scene.sphere().is_none());
        assert!(scene.countries().is_empty());
        assert_eq!(scene.revision(), 1);
    }

    #[test]
    fn test_set_viewport_reports_change() {
        let mut scene = MapScene::new(Viewport::new(200.0, 200.0));
        assert!(!scene.set_viewport(Viewport::new(200.0, 200.0)));
        assert!(scene.set_viewport(Viewport::new(300.0, 200.0)));
        assert_eq!(scene.viewport(), Viewport::new(300.0, 200.0));
    }
}
