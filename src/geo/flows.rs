//! Trade flow lines between country centroids.

use super::codes::CountryCode;
use super::index::CountryGeometryIndex;
use super::projection::OrthographicProjection;
use super::renderer::RenderTarget;
use crate::api::{TradeData, TradePartner};
use geo_types::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDirection {
    /// Selected country → partner.
    Export,
    /// Partner → selected country.
    Import,
}

/// What happened to the partners of one flow pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowSummary {
    pub drawn: usize,
    /// Skipped because an endpoint is on the far side of the globe.
    pub hidden: usize,
    /// Skipped because the partner has no centroid.
    pub unresolved: usize,
}

/// Replaces the flow lines of `target` with the flows of `country`.
///
/// Exports are drawn first, then imports, each in received order. A line is
/// drawn only when both endpoints are on the visible hemisphere.
pub fn render_flows(
    country: &CountryCode,
    trade: &TradeData,
    projection: &OrthographicProjection,
    index: &CountryGeometryIndex,
    target: &mut dyn RenderTarget,
) -> FlowSummary {
    target.clear_flows();

    let mut summary = FlowSummary::default();
    let Some(origin) = index.centroid(country) else {
        log::debug!("No centroid for country {}, skipping flows", country);
        return summary;
    };

    let passes: [(&[TradePartner], FlowDirection); 2] = [
        (&trade.exports, FlowDirection::Export),
        (&trade.imports, FlowDirection::Import),
    ];

    for (partners, direction) in passes {
        for partner in partners {
            let Some(other) = index.centroid(&partner.country_code) else {
                summary.unresolved += 1;
                continue;
            };
            let (from, to) = match direction {
                FlowDirection::Export => (origin, other),
                FlowDirection::Import => (other, origin),
            };
            if draw_segment(projection, target, from, to, direction) {
                summary.drawn += 1;
            } else {
                summary.hidden += 1;
            }
        }
    }

    if summary.unresolved > 0 {
        log::debug!(
            "{} trade partners of {} have no boundary feature",
            summary.unresolved,
            country
        );
    }
    summary
}

fn draw_segment(
    projection: &OrthographicProjection,
    target: &mut dyn RenderTarget,
    from: Coord<f64>,
    to: Coord<f64>,
    direction: FlowDirection,
) -> bool {
    if !projection.is_visible(from) || !projection.is_visible(to) {
        return false;
    }
    match (projection.project(from), projection.project(to)) {
        (Some(a), Some(b)) => {
            target.draw_flow(a, b, direction);
            true
        }
        _ => false,
    }
}
