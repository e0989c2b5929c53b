//! Asset layer: byte sources, fire-and-forget texture loads, demo manifest.
//!
//! Assets are addressed by path strings and identified by a hash of that
//! path. The renderer consumes textures by handle, never by raw bytes.
//!
//! # Invariants
//! - A load never blocks the caller; the handle starts `Pending`.
//! - A failed load never aborts the program; the slot becomes `Failed`.
//! - Loading the same path twice yields handles to the same slot.

mod error;
mod loader;
mod manifest;
mod source;
mod texture;

pub use error::AssetError;
pub use loader::TextureLoader;
pub use manifest::{DemoTextures, DoorTextures, TextureManifest};
pub use source::{AssetSource, DirSource, MemorySource};
pub use texture::{AssetId, CubeFace, CubeTextureHandle, Image, TextureHandle, TextureState};

pub fn crate_info() -> &'static str {
    "surface-assets v0.1.0"
}
