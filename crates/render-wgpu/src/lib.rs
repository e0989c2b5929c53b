//! wgpu render backend for surface scenes.
//!
//! Draws every mesh node of a [`surface_scene::Scene`] with its material's
//! shading model. Textures are uploaded the first frame their load
//! completes; until then the material renders as if the slot were empty.
//!
//! # Invariants
//! - Renderer never mutates the scene.
//! - Material parameters are re-read every frame.

mod gpu;
mod shaders;
mod textures;
mod uniforms;

pub use gpu::WgpuRenderer;
pub use uniforms::MAX_POINT_LIGHTS;
