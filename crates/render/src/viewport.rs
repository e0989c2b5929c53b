use crate::PerspectiveCamera;

/// Upper bound on the output pixel ratio, to bound GPU cost on dense displays.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Window size in logical pixels plus the display's pixel density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f64) -> Self {
        let mut v = Self {
            width: 0,
            height: 0,
            device_pixel_ratio: 1.0,
        };
        v.resize(width, height, device_pixel_ratio);
        v
    }

    /// Build from a physical (device) size, as windowing systems report it.
    pub fn from_physical(width: u32, height: u32, device_pixel_ratio: f64) -> Self {
        let dpr = sanitize_ratio(device_pixel_ratio);
        Self::new(
            (width as f64 / dpr).round() as u32,
            (height as f64 / dpr).round() as u32,
            dpr,
        )
    }

    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f64) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.device_pixel_ratio = sanitize_ratio(device_pixel_ratio);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// The ratio the output buffer is rendered at: the device ratio, capped.
    pub fn pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio.min(MAX_PIXEL_RATIO)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Output buffer size in pixels. Never zero.
    pub fn physical_size(&self) -> (u32, u32) {
        let r = self.pixel_ratio();
        (
            ((self.width as f64 * r).floor() as u32).max(1),
            ((self.height as f64 * r).floor() as u32).max(1),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720, 1.0)
    }
}

fn sanitize_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}

/// Resize handler: record the new window size and keep the camera's
/// projection consistent with it. Idempotent for repeated sizes.
pub fn apply_resize(
    viewport: &mut Viewport,
    camera: &mut PerspectiveCamera,
    width: u32,
    height: u32,
    device_pixel_ratio: f64,
) {
    viewport.resize(width, height, device_pixel_ratio);
    camera.set_aspect(viewport.aspect());
    tracing::debug!(
        "resized to {}x{} (pixel ratio {})",
        viewport.width(),
        viewport.height(),
        viewport.pixel_ratio()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_after_resize_is_exact() {
        let mut viewport = Viewport::default();
        let mut camera = PerspectiveCamera::default();
        apply_resize(&mut viewport, &mut camera, 1920, 1080, 1.0);
        assert_eq!(camera.aspect(), 1920.0 / 1080.0);

        apply_resize(&mut viewport, &mut camera, 333, 777, 1.0);
        assert_eq!(camera.aspect(), 333.0 / 777.0);
    }

    #[test]
    fn pixel_ratio_is_capped_at_two() {
        assert_eq!(Viewport::new(800, 600, 3.0).pixel_ratio(), 2.0);
        assert_eq!(Viewport::new(800, 600, 2.0).pixel_ratio(), 2.0);
        assert_eq!(Viewport::new(800, 600, 1.0).pixel_ratio(), 1.0);
        assert_eq!(Viewport::new(800, 600, 1.5).pixel_ratio(), 1.5);
    }

    #[test]
    fn physical_size_uses_capped_ratio() {
        assert_eq!(Viewport::new(800, 600, 3.0).physical_size(), (1600, 1200));
        assert_eq!(Viewport::new(800, 600, 1.0).physical_size(), (800, 600));
    }

    #[test]
    fn resize_is_idempotent() {
        let mut viewport = Viewport::default();
        let mut camera = PerspectiveCamera::default();
        apply_resize(&mut viewport, &mut camera, 640, 480, 2.5);
        let (v1, c1) = (viewport, camera);
        apply_resize(&mut viewport, &mut camera, 640, 480, 2.5);
        assert_eq!(viewport, v1);
        assert_eq!(camera, c1);
    }

    #[test]
    fn zero_height_does_not_divide_by_zero() {
        let mut viewport = Viewport::default();
        let mut camera = PerspectiveCamera::default();
        apply_resize(&mut viewport, &mut camera, 640, 0, 1.0);
        assert!(camera.aspect().is_finite());
        assert_eq!(viewport.physical_size(), (640, 1));
    }

    #[test]
    fn invalid_device_ratio_falls_back_to_one() {
        assert_eq!(Viewport::new(10, 10, 0.0).pixel_ratio(), 1.0);
        assert_eq!(Viewport::new(10, 10, f64::NAN).pixel_ratio(), 1.0);
    }

    #[test]
    fn from_physical_divides_by_device_ratio() {
        let v = Viewport::from_physical(2560, 1440, 2.0);
        assert_eq!((v.width(), v.height()), (1280, 720));
    }
}
