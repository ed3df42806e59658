//! Poster Model - Snapshot of the live styled tree
//!
//! This crate holds the rasterizer's only input: an arena of styled nodes
//! captured from the on-screen poster preview. Nodes reference their
//! children by index, carry their on-screen bounding box, and keep the raw
//! style inputs (inline overrides, class markers, browser-computed values)
//! that the style resolver turns into effective styles.
//!
//! The tree is never mutated once an export begins.

mod node_id;
mod geometry;
mod node;
mod style;
mod tree;
mod page;
mod error;
pub mod diagnostics;

pub use node_id::*;
pub use geometry::*;
pub use node::*;
pub use style::*;
pub use tree::*;
pub use page::*;
pub use error::*;
pub use diagnostics::{Diagnostics, TraceEvent};
