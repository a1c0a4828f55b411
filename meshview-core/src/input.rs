/// Mapping of navigation input onto transform operations
use crate::config::Controls;
use crate::math::EulerDegrees;
use crate::registry::ModelRegistry;
use crate::transform::{move_all, rotate_all_about, zoom_all};

/// Discrete navigation commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerAction {
    ZoomIn,
    ZoomOut,
    StrafeLeft,
    StrafeRight,
    Quit,
}

impl Controls {
    /// Apply `action` to every model. Returns `false` when the viewer should stop.
    pub fn apply(&self, action: ViewerAction, registry: &mut ModelRegistry) -> bool {
        match action {
            ViewerAction::ZoomIn => zoom_all(registry, self.zoom_in),
            ViewerAction::ZoomOut => zoom_all(registry, self.zoom_out),
            ViewerAction::StrafeLeft => move_all(registry, self.move_step, 0.0, 0.0),
            ViewerAction::StrafeRight => move_all(registry, -self.move_step, 0.0, 0.0),
            ViewerAction::Quit => return false,
        }
        true
    }
}

/// Turns successive cursor positions into look rotations.
///
/// The first position only seeds the tracker.
#[derive(Debug, Clone)]
pub struct MouseLook {
    previous: Option<(f64, f64)>,
    sensitivity: f32,
}

impl MouseLook {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            previous: None,
            sensitivity,
        }
    }

    /// Scaled `previous - current` delta, or `None` for the seeding event.
    pub fn delta(&mut self, x: f64, y: f64) -> Option<(f32, f32)> {
        let previous = self.previous.replace((x, y))?;
        let dx = (previous.0 - x) as f32 * self.sensitivity;
        let dy = (previous.1 - y) as f32 * self.sensitivity;
        Some((dx, dy))
    }

    /// Feed a cursor position and rotate every model about `controls.eye_pivot`:
    /// horizontal motion turns about Y, then vertical motion turns about X.
    pub fn cursor_moved(&mut self, x: f64, y: f64, controls: &Controls, registry: &mut ModelRegistry) {
        let Some((dx, dy)) = self.delta(x, y) else {
            return;
        };
        let pivot = controls.eye_pivot();
        rotate_all_about(registry, &pivot, EulerDegrees::new(0.0, dx, 0.0));
        rotate_all_about(registry, &pivot, EulerDegrees::new(dy, 0.0, 0.0));
    }

    /// Forget the last position, e.g. after the pointer leaves the view.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

impl Default for MouseLook {
    fn default() -> Self {
        Self::new(Controls::default().mouse_sensitivity)
    }
}
