//! Orthographic globe projection and hemisphere clipping.
//!
//! Handles converting geographic coordinates (lon/lat, degrees) to screen
//! positions on a globe seen from infinite distance. Exactly one hemisphere
//! is visible; the clip angle is fixed at 90 degrees.

use eframe::egui::{Pos2, Rect};
use geo_types::Coord;
use glam::DVec3;

/// Angular distance from the view center beyond which points are hidden.
pub const CLIP_ANGLE_DEG: f64 = 90.0;

/// Tolerance so points exactly on the limb count as visible.
const LIMB_EPSILON: f64 = 1e-12;

/// Angular step used when closing clipped rings along the limb.
const LIMB_ARC_STEP: f64 = 5.0 * std::f64::consts::PI / 180.0;

/// Globe orientation in degrees: (longitude, latitude, roll).
///
/// Angles are deliberately left unwrapped; trigonometry handles any range.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationState {
    pub longitude: f64,
    pub latitude: f64,
    pub roll: f64,
}

impl RotationState {
    pub fn new(longitude: f64, latitude: f64, roll: f64) -> Self {
        Self {
            longitude,
            latitude,
            roll,
        }
    }
}

/// Size of the surface a map instance is drawn on, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.width(), rect.height())
    }

    /// Center of the viewport in local coordinates.
    pub fn center(&self) -> Pos2 {
        Pos2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Orthographic projection for converting geographic to screen coordinates.
///
/// Rotation follows the usual globe convention: the longitude rotation is
/// applied first, then latitude and roll. A rotation of `(100, -40, 0)`
/// therefore brings `(-100, 40)` to the center of the view.
#[derive(Debug, Clone)]
pub struct OrthographicProjection {
    /// Globe radius in pixels
    scale: f64,
    /// Screen position of the globe center
    translate: Pos2,
    rotation: RotationState,
    delta_lambda: f64,
    sin_phi: f64,
    cos_phi: f64,
    sin_gamma: f64,
    cos_gamma: f64,
}

impl OrthographicProjection {
    /// Builds a projection for the current rotation, centered in the viewport.
    pub fn new(scale: f64, rotation: RotationState, viewport: Viewport) -> Self {
        let phi = rotation.latitude.to_radians();
        let gamma = rotation.roll.to_radians();
        Self {
            scale,
            translate: viewport.center(),
            rotation,
            delta_lambda: rotation.longitude.to_radians(),
            sin_phi: phi.sin(),
            cos_phi: phi.cos(),
            sin_gamma: gamma.sin(),
            cos_gamma: gamma.cos(),
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn center(&self) -> Pos2 {
        self.translate
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    /// Rotates a lon/lat coordinate into view space.
    ///
    /// In view space +x points at the viewer, +y to screen right and +z to
    /// screen up; the visible hemisphere is `x >= 0`.
    pub fn to_view(&self, coord: Coord<f64>) -> DVec3 {
        let lambda = coord.x.to_radians() + self.delta_lambda;
        let phi = coord.y.to_radians();

        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();

        let k = z * self.cos_phi + x * self.sin_phi;
        DVec3::new(
            x * self.cos_phi - z * self.sin_phi,
            y * self.cos_gamma - k * self.sin_gamma,
            k * self.cos_gamma + y * self.sin_gamma,
        )
    }

    /// Converts a lon/lat coordinate to a screen position.
    ///
    /// Points on the far hemisphere still project (onto the disk); use
    /// [`Self::is_visible`] to filter them. Returns `None` when the input
    /// does not produce a finite position.
    pub fn project(&self, coord: Coord<f64>) -> Option<Pos2> {
        let pos = self.view_to_screen(self.to_view(coord));
        (pos.x.is_finite() && pos.y.is_finite()).then_some(pos)
    }

    /// True iff the point lies within the clip angle of the view center.
    pub fn is_visible(&self, coord: Coord<f64>) -> bool {
        let view = self.to_view(coord);
        view.is_finite() && view.x >= CLIP_ANGLE_DEG.to_radians().cos() - LIMB_EPSILON
    }

    /// Projects a closed ring, clipped to the visible hemisphere.
    ///
    /// Edges crossing the limb are cut at the limb and the gap between an
    /// exit and the following entry is closed with points along the limb.
    /// A ring entirely on the far side yields an empty vector.
    pub fn project_ring(&self, ring: &[Coord<f64>]) -> Vec<Pos2> {
        let mut view: Vec<DVec3> = ring.iter().map(|c| self.to_view(*c)).collect();
        if view.len() >= 2 && view.first() == view.last() {
            view.pop();
        }

        let clipped = clip_to_hemisphere(&view);
        if clipped.len() < 3 {
            return Vec::new();
        }

        clipped.into_iter().map(|v| self.view_to_screen(v)).collect()
    }

    fn view_to_screen(&self, view: DVec3) -> Pos2 {
        Pos2::new(
            (self.translate.x as f64 + self.scale * view.y) as f32,
            (self.translate.y as f64 - self.scale * view.z) as f32,
        )
    }
}

#[derive(Clone, Copy, PartialEq)]
enum VertexKind {
    Inside,
    Exit,
    Entry,
}

/// Sutherland-Hodgman clip of a closed view-space ring against `x >= 0`.
fn clip_to_hemisphere(points: &[DVec3]) -> Vec<DVec3> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }

    let mut clipped: Vec<(DVec3, VertexKind)> = Vec::with_capacity(n + 8);
    for i in 0..n {
        let previous = points[(i + n - 1) % n];
        let current = points[i];
        let previous_in = previous.x >= 0.0;
        let current_in = current.x >= 0.0;

        if current_in {
            if !previous_in {
                clipped.push((limb_crossing(previous, current), VertexKind::Entry));
            }
            clipped.push((current, VertexKind::Inside));
        } else if previous_in {
            clipped.push((limb_crossing(previous, current), VertexKind::Exit));
        }
    }

    let m = clipped.len();
    let mut out = Vec::with_capacity(m * 2);
    for i in 0..m {
        let (point, kind) = clipped[i];
        out.push(point);
        let (next, next_kind) = clipped[(i + 1) % m];
        if kind == VertexKind::Exit && next_kind == VertexKind::Entry {
            push_limb_arc(&mut out, point, next);
        }
    }
    out
}

/// Point where the chord `a -> b` crosses the view plane, pushed onto the limb.
fn limb_crossing(a: DVec3, b: DVec3) -> DVec3 {
    let t = a.x / (a.x - b.x);
    let p = a + (b - a) * t;
    let r = (p.y * p.y + p.z * p.z).sqrt();
    if r <= f64::EPSILON {
        return DVec3::new(0.0, 1.0, 0.0);
    }
    DVec3::new(0.0, p.y / r, p.z / r)
}

/// Appends intermediate limb points between `from` and `to` (both exclusive).
fn push_limb_arc(out: &mut Vec<DVec3>, from: DVec3, to: DVec3) {
    let start = from.z.atan2(from.y);
    let delta = shortest_angular_delta(start, to.z.atan2(to.y));
    let steps = (delta.abs() / LIMB_ARC_STEP).ceil() as usize;
    for step in 1..steps {
        let angle = start + delta * step as f64 / steps as f64;
        out.push(DVec3::new(0.0, angle.cos(), angle.sin()));
    }
}

/// Returns the shortest angular delta from `from` to `to`, in range -PI..PI.
fn shortest_angular_delta(from: f64, to: f64) -> f64 {
    let mut delta = to - from;
    if delta > std::f64::consts::PI {
        delta -= std::f64::consts::TAU;
    } else if delta < -std::f64::consts::PI {
        delta += std::f64::consts::TAU;
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 500.0)
    }

    #[test]
    fn test_rotation_center_projects_to_viewport_center() {
        let projection =
            OrthographicProjection::new(250.0, RotationState::new(100.0, -40.0, 0.0), viewport());
        let pos = projection.project(coord(-100.0, 40.0)).unwrap();
        assert!((pos.x - 400.0).abs() < 1e-3);
        assert!((pos.y - 250.0).abs() < 1e-3);
    }

    #[test]
    fn test_unrotated_axes() {
        let projection = OrthographicProjection::new(250.0, RotationState::default(), viewport());
        // East of center is to the right, north of center is up.
        let east = projection.project(coord(90.0, 0.0)).unwrap();
        assert!((east.x - 650.0).abs() < 1e-3);
        assert!((east.y - 250.0).abs() < 1e-3);
        let north = projection.project(coord(0.0, 90.0)).unwrap();
        assert!((north.x - 400.0).abs() < 1e-3);
        assert!((north.y - 0.0).abs() < 1e-3);
    }

    #[test]
    fn test_visibility_by_hemisphere() {
        let projection = OrthographicProjection::new(250.0, RotationState::default(), viewport());
        assert!(projection.is_visible(coord(10.0, 10.0)));
        assert!(projection.is_visible(coord(90.0, 0.0)));
        assert!(!projection.is_visible(coord(-170.0, -10.0)));
        assert!(!projection.is_visible(coord(180.0, 0.0)));
    }

    #[test]
    fn test_unwrapped_rotation_matches_wrapped() {
        let wrapped =
            OrthographicProjection::new(250.0, RotationState::new(30.0, 10.0, 0.0), viewport());
        let unwrapped =
            OrthographicProjection::new(250.0, RotationState::new(750.0, 10.0, 0.0), viewport());
        let a = wrapped.project(coord(12.0, 48.0)).unwrap();
        let b = unwrapped.project(coord(12.0, 48.0)).unwrap();
        assert!((a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3);
    }

    #[test]
    fn test_far_side_ring_is_dropped() {
        let projection = OrthographicProjection::new(250.0, RotationState::default(), viewport());
        let ring = vec![
            coord(170.0, -5.0),
            coord(175.0, -5.0),
            coord(175.0, 5.0),
            coord(170.0, 5.0),
            coord(170.0, -5.0),
        ];
        assert!(projection.project_ring(&ring).is_empty());
    }

    #[test]
    fn test_ring_crossing_limb_stays_on_disk() {
        let projection = OrthographicProjection::new(250.0, RotationState::default(), viewport());
        let ring = vec![
            coord(60.0, -20.0),
            coord(120.0, -20.0),
            coord(120.0, 20.0),
            coord(60.0, 20.0),
            coord(60.0, -20.0),
        ];
        let projected = projection.project_ring(&ring);
        assert!(projected.len() >= 4);
        let center = projection.center();
        for pos in &projected {
            let r = (*pos - center).length();
            assert!(r <= 250.0 + 1e-2, "point off the globe: {:?}", pos);
        }
        // Part of the ring was pushed onto the limb.
        let on_limb = |pos: &Pos2| ((*pos - center).length() - 250.0).abs() < 1e-2;
        assert!(projected.iter().any(on_limb));
    }

    #[test]
    fn test_visible_ring_is_unchanged() {
        let projection = OrthographicProjection::new(250.0, RotationState::default(), viewport());
        let ring = vec![
            coord(-5.0, -5.0),
            coord(5.0, -5.0),
            coord(5.0, 5.0),
            coord(-5.0, 5.0),
            coord(-5.0, -5.0),
        ];
        assert_eq!(projection.project_ring(&ring).len(), 4);
    }
}
