//! Rendering adapter: camera, viewport, orbit controls, renderer interface.
//!
//! # Invariants
//! - Renderers never mutate the scene; they read it and a camera.
//! - After a resize to (W, H) the camera aspect is exactly W / H.
//! - The output pixel ratio never exceeds [`MAX_PIXEL_RATIO`].
//!
//! The debug text renderer implements the trait for headless runs; the GPU
//! backend lives in `surface-render-wgpu` and reads the same camera types.

mod camera;
mod controls;
mod renderer;
mod viewport;

pub use camera::PerspectiveCamera;
pub use controls::OrbitControls;
pub use renderer::{DebugTextRenderer, Renderer};
pub use viewport::{MAX_PIXEL_RATIO, Viewport, apply_resize};

pub fn crate_info() -> &'static str {
    "surface-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
