//! Developer tooling: debug panel bindings for live material tuning.
//!
//! # Invariants
//! - A bound value always lands inside its binding's range, on its step grid.
//! - Writes go straight to the material; the next frame shows them.

mod panel;

pub use panel::{DebugPanel, MaterialField, SliderBinding};

pub fn crate_info() -> &'static str {
    "surface-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
