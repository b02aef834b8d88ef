//! Central canvas UI: the globe of the active tab.

use super::colors;
use crate::geo::Viewport;
use crate::session::{Fetcher, Session};
use eframe::egui::{self, Pos2, Rect, Sense};

pub fn render_canvas(ctx: &egui::Context, session: &mut Session, fetcher: &mut dyn Fetcher) {
    egui::CentralPanel::default()
        .frame(egui::Frame::new().fill(colors::map::BACKGROUND))
        .show(ctx, |ui| {
            let available_size = ui.available_size();

            // Allocate the full available space for the canvas
            let (response, painter) = ui.allocate_painter(available_size, Sense::click_and_drag());
            let rect = response.rect;

            let map = session.state().tab.map_id();
            session.resize(map, Viewport::from_rect(rect));

            handle_canvas_interaction(&response, &rect, session, fetcher);

            session.scene(map).paint(&painter, rect.min);
        });
}

/// Pointer position relative to the canvas origin.
fn local_pointer(response: &egui::Response, rect: &Rect) -> Option<Pos2> {
    response.interact_pointer_pos().map(|pos| to_local(pos, rect))
}

fn to_local(pos: Pos2, rect: &Rect) -> Pos2 {
    (pos - rect.min).to_pos2()
}

/// Where a drag is anchored, in canvas coordinates.
///
/// egui reports a drag only once the pointer has moved past its drag
/// threshold, so the anchor is the press position rather than the pointer.
fn drag_anchor(press_origin: Option<Pos2>, pointer: Option<Pos2>, rect: &Rect) -> Option<Pos2> {
    press_origin.or(pointer).map(|pos| to_local(pos, rect))
}

fn handle_canvas_interaction(
    response: &egui::Response,
    rect: &Rect,
    session: &mut Session,
    fetcher: &mut dyn Fetcher,
) {
    if response.drag_started() {
        let press_origin = response.ctx.input(|i| i.pointer.press_origin());
        if let Some(anchor) = drag_anchor(press_origin, response.interact_pointer_pos(), rect) {
            session.drag_start(anchor);
        }
    }

    if response.dragged() {
        if let Some(pos) = local_pointer(response, rect) {
            session.drag_move(pos);
        }
    }

    if response.drag_stopped() {
        session.drag_end();
    }

    if response.clicked() {
        if let Some(pos) = local_pointer(response, rect) {
            let map = session.state().tab.map_id();
            session.click(map, pos, fetcher);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_anchored_at_press() {
        let rect = Rect::from_min_size(Pos2::new(10.0, 40.0), egui::vec2(800.0, 600.0));
        let press = Some(Pos2::new(110.0, 140.0));
        let pointer = Some(Pos2::new(116.0, 140.0));

        assert_eq!(drag_anchor(press, pointer, &rect), Some(Pos2::new(100.0, 100.0)));
        assert_eq!(drag_anchor(None, pointer, &rect), Some(Pos2::new(106.0, 100.0)));
        assert_eq!(drag_anchor(None, None, &rect), None);
    }
}
