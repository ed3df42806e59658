//! Style Engine - Effective style resolution
//!
//! Turns the raw style inputs of one snapshot node into a [`ResolvedStyle`]:
//! font family (through an ordered precedence chain), numeric weight,
//! colours, alignment, text transform, box-model edges, whitespace handling
//! and layout mode. Lengths stay in source pixels; scaling to the print
//! surface happens later in the paint pipeline.

mod color;
mod error;
mod resolved;
pub mod font_chain;
pub mod weight;
mod resolver;

pub use color::*;
pub use error::*;
pub use resolved::*;
pub use font_chain::{FontContext, FontRoles};
pub use resolver::*;
