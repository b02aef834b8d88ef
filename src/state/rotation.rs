//! Drag-driven globe rotation.

use crate::geo::RotationState;
use eframe::egui::Pos2;

/// Pixels of drag per degree of rotation.
pub const DEFAULT_DRAG_SENSITIVITY: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum DragState {
    Idle,
    Dragging { anchor: Pos2 },
}

/// Converts pointer drags into [`RotationState`] changes.
///
/// Horizontal drags turn the globe around its axis, vertical drags tilt it.
/// Angles accumulate without wrapping.
#[derive(Debug, Clone)]
pub struct RotationController {
    rotation: RotationState,
    drag: DragState,
    sensitivity: f64,
}

impl Default for RotationController {
    fn default() -> Self {
        Self::new(RotationState::default(), DEFAULT_DRAG_SENSITIVITY)
    }
}

impl RotationController {
    pub fn new(rotation: RotationState, sensitivity: f64) -> Self {
        let sensitivity = if sensitivity.is_finite() && sensitivity > 0.0 {
            sensitivity
        } else {
            log::warn!(
                "Invalid drag sensitivity {}, using {}",
                sensitivity,
                DEFAULT_DRAG_SENSITIVITY
            );
            DEFAULT_DRAG_SENSITIVITY
        };
        Self {
            rotation,
            drag: DragState::Idle,
            sensitivity,
        }
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn on_drag_start(&mut self, pos: Pos2) {
        self.drag = DragState::Dragging { anchor: pos };
    }

    /// Applies the movement since the last drag event.
    ///
    /// Returns true if the rotation changed; moves while idle are ignored.
    pub fn on_drag_move(&mut self, pos: Pos2) -> bool {
        let DragState::Dragging { anchor } = self.drag else {
            return false;
        };
        let delta = pos - anchor;
        self.drag = DragState::Dragging { anchor: pos };

        if delta.x == 0.0 && delta.y == 0.0 {
            return false;
        }

        self.rotation.longitude += delta.x as f64 / self.sensitivity;
        self.rotation.latitude -= delta.y as f64 / self.sensitivity;
        true
    }

    pub fn on_drag_end(&mut self) {
        self.drag = DragState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_delta_scaled_by_sensitivity() {
        let mut controller = RotationController::default();
        controller.on_drag_start(Pos2::new(100.0, 100.0));
        assert!(controller.on_drag_move(Pos2::new(140.0, 80.0)));

        let r = controller.rotation();
        assert_eq!(r.longitude, 10.0);
        assert_eq!(r.latitude, 5.0);
        assert_eq!(r.roll, 0.0);
    }

    #[test]
    fn test_drag_sequence_is_additive() {
        let mut controller = RotationController::new(RotationState::new(1.0, 2.0, 3.0), 4.0);
        controller.on_drag_start(Pos2::new(0.0, 0.0));
        assert!(controller.on_drag_move(Pos2::new(8.0, 4.0)));
        assert!(controller.on_drag_move(Pos2::new(4.0, 12.0)));
        assert!(controller.on_drag_move(Pos2::new(400.0, -20.0)));
        // No movement, no change.
        assert!(!controller.on_drag_move(Pos2::new(400.0, -20.0)));
        controller.on_drag_end();

        // Net delta (400, -20) from the start.
        let r = controller.rotation();
        assert_eq!(r.longitude, 101.0);
        assert_eq!(r.latitude, 7.0);
        assert_eq!(r.roll, 3.0);
    }

    #[test]
    fn test_moves_while_idle_are_ignored() {
        let mut controller = RotationController::default();
        assert!(!controller.on_drag_move(Pos2::new(50.0, 50.0)));

        controller.on_drag_start(Pos2::new(0.0, 0.0));
        controller.on_drag_end();
        assert!(!controller.on_drag_move(Pos2::new(50.0, 50.0)));
        assert_eq!(controller.rotation(), RotationState::default());
    }

    #[test]
    fn test_angles_are_not_wrapped() {
        let mut controller = RotationController::new(RotationState::default(), 1.0);
        controller.on_drag_start(Pos2::new(0.0, 0.0));
        controller.on_drag_move(Pos2::new(500.0, 0.0));
        assert_eq!(controller.rotation().longitude, 500.0);
    }

    #[test]
    fn test_custom_sensitivity() {
        let mut controller = RotationController::new(RotationState::default(), 2.0);
        controller.on_drag_start(Pos2::new(0.0, 0.0));
        controller.on_drag_move(Pos2::new(10.0, 10.0));
        assert_eq!(controller.rotation().longitude, 5.0);
        assert_eq!(controller.rotation().latitude, -5.0);

        // Invalid sensitivity falls back to four pixels per degree.
        let mut fallback = RotationController::new(RotationState::default(), 0.0);
        fallback.on_drag_start(Pos2::new(0.0, 0.0));
        fallback.on_drag_move(Pos2::new(8.0, 0.0));
        assert_eq!(fallback.rotation().longitude, 2.0);
    }
}
