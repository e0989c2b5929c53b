//! Scene: mesh nodes, one material table shared by handle, lights, and the
//! per-frame animation step.
//!
//! # Invariants
//! - Nodes never own materials; they hold a `MaterialHandle` into the scene's table.
//!   Editing a material once is observed by every node that references it.
//! - Animation is a pure function of the scene and elapsed time.
//! - Metalness and roughness stay within [0, 1].

pub mod animate;
pub mod clock;
pub mod demo;
pub mod geometry;
pub mod light;
pub mod material;
pub mod scene;

pub use animate::{FrameLoop, FrameStamp, ROTATION_SPEED};
pub use clock::{Clock, ManualClock, SystemClock, TimeSource};
pub use demo::DemoScene;
pub use geometry::{Geometry, MeshData};
pub use light::Light;
pub use material::{Material, MaterialKind, Side, UnknownMaterialKind};
pub use scene::{MaterialHandle, MeshNode, Scene, SceneError};

pub fn crate_info() -> &'static str {
    "surface-scene v0.1.0"
}
