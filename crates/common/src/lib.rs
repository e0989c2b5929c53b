//! Shared value types: node ids, transforms and colors.

mod types;

pub use types::{Color, NodeId, Transform};
