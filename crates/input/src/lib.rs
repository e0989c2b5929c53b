//! Input: raw pointer gestures mapped to camera-control actions.
//!
//! # Invariants
//! - Controllers consume actions, never raw window events.
//! - The tracker holds no camera state; it only turns deltas into actions.

pub mod action;
pub mod pointer;

pub use action::CameraAction;
pub use pointer::{PointerButton, PointerTracker};

pub fn crate_info() -> &'static str {
    "surface-input v0.1.0"
}
