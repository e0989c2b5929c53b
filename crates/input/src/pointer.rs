use crate::CameraAction;
use glam::Vec2;

/// Pointer buttons the tracker distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Turns pointer button, motion and scroll events into camera actions.
///
/// Primary drag rotates, secondary drag pans, middle drag and the wheel dolly.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    position: Option<Vec2>,
    held: Option<PointerButton>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The button currently dragging, if any. The first button pressed wins.
    pub fn held(&self) -> Option<PointerButton> {
        self.held
    }

    pub fn button(&mut self, button: PointerButton, pressed: bool) {
        match (pressed, self.held) {
            (true, None) => self.held = Some(button),
            (false, Some(held)) if held == button => self.held = None,
            _ => {}
        }
    }

    /// Record a new pointer position; yields an action while a button is held.
    pub fn moved(&mut self, position: Vec2) -> Option<CameraAction> {
        let previous = self.position.replace(position);
        let delta = position - previous?;
        let action = match self.held? {
            PointerButton::Primary => CameraAction::Rotate(delta),
            PointerButton::Secondary => CameraAction::Pan(delta),
            // Dragging up dollies in.
            PointerButton::Middle => CameraAction::Zoom(-delta.y / 10.0),
        };
        (!action.is_noop()).then_some(action)
    }

    /// Scroll wheel in line steps; positive scrolls away from the user.
    pub fn scrolled(&mut self, lines: f32) -> Option<CameraAction> {
        let action = CameraAction::Zoom(lines);
        (!action.is_noop()).then_some(action)
    }

    /// Forget position and buttons, e.g. when the pointer leaves the window.
    pub fn reset(&mut self) {
        self.position = None;
        self.held = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motion_without_button_is_ignored() {
        let mut t = PointerTracker::new();
        assert_eq!(t.moved(Vec2::new(10.0, 10.0)), None);
        assert_eq!(t.moved(Vec2::new(20.0, 10.0)), None);
    }

    #[test]
    fn primary_drag_rotates() {
        let mut t = PointerTracker::new();
        t.moved(Vec2::new(10.0, 10.0));
        t.button(PointerButton::Primary, true);
        assert_eq!(
            t.moved(Vec2::new(15.0, 8.0)),
            Some(CameraAction::Rotate(Vec2::new(5.0, -2.0)))
        );
        t.button(PointerButton::Primary, false);
        assert_eq!(t.moved(Vec2::new(30.0, 8.0)), None);
    }

    #[test]
    fn secondary_drag_pans() {
        let mut t = PointerTracker::new();
        t.moved(Vec2::ZERO);
        t.button(PointerButton::Secondary, true);
        assert_eq!(
            t.moved(Vec2::new(0.0, 4.0)),
            Some(CameraAction::Pan(Vec2::new(0.0, 4.0)))
        );
    }

    #[test]
    fn first_button_wins() {
        let mut t = PointerTracker::new();
        t.button(PointerButton::Primary, true);
        t.button(PointerButton::Secondary, true);
        assert_eq!(t.held(), Some(PointerButton::Primary));
        t.button(PointerButton::Secondary, false);
        assert_eq!(t.held(), Some(PointerButton::Primary));
    }

    #[test]
    fn scroll_zooms() {
        let mut t = PointerTracker::new();
        assert_eq!(t.scrolled(1.0), Some(CameraAction::Zoom(1.0)));
        assert_eq!(t.scrolled(0.0), None);
    }

    #[test]
    fn reset_drops_drag() {
        let mut t = PointerTracker::new();
        t.moved(Vec2::ZERO);
        t.button(PointerButton::Primary, true);
        t.reset();
        assert_eq!(t.held(), None);
        assert_eq!(t.moved(Vec2::ONE), None);
    }
}
