//! Globe geometry and rendering.
//!
//! This module provides the world-boundaries dataset, the country code
//! index, the orthographic projection and the renderers that draw a map
//! instance into a [`RenderTarget`].

mod boundaries;
mod codes;
mod flows;
mod index;
mod projection;
mod renderer;
mod scene;

pub use boundaries::{spherical_centroid, CountryFeature, PolygonRings, WorldBoundaries};
pub use codes::{CountryCode, FeatureId, ResolutionError};
pub use flows::{render_flows, FlowDirection, FlowSummary};
pub use index::CountryGeometryIndex;
pub use projection::{OrthographicProjection, RotationState, Viewport, CLIP_ANGLE_DEG};
pub use renderer::{render_map, MapId, MapInputs, RenderTarget, ScreenPolygon};
pub use scene::{CountryShape, FlowLine, MapScene, PolygonShape, Sphere};
