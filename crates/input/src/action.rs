use glam::Vec2;

/// A high-level camera action produced from pointer input.
///
/// Camera controllers consume actions, never raw input events, so any input
/// device that can produce these drives the same controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraAction {
    /// Orbit around the target by a pointer delta in pixels.
    Rotate(Vec2),
    /// Slide the target across the view plane by a pointer delta in pixels.
    Pan(Vec2),
    /// Dolly towards (positive) or away from (negative) the target, in scroll steps.
    Zoom(f32),
}

impl CameraAction {
    /// Zero-length actions carry no movement and can be dropped.
    pub fn is_noop(&self) -> bool {
        match self {
            CameraAction::Rotate(d) | CameraAction::Pan(d) => *d == Vec2::ZERO,
            CameraAction::Zoom(z) => *z == 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_is_constructible() {
        let a = CameraAction::Rotate(Vec2::new(1.0, 0.0));
        assert!(matches!(a, CameraAction::Rotate(_)));
        assert!(!a.is_noop());
    }

    #[test]
    fn zero_deltas_are_noops() {
        assert!(CameraAction::Pan(Vec2::ZERO).is_noop());
        assert!(CameraAction::Zoom(0.0).is_noop());
        assert!(!CameraAction::Zoom(-1.0).is_noop());
    }
}
