//! Layout Engine - Geometry for print export
//!
//! Maps the on-screen source tree onto the print surface and computes
//! where text lines and list bullets go:
//!
//! - `scale`: ScaleMapper and the per-export ScaleContext
//! - `text_layout`: greedy wrapping and line placement
//! - `list_context`: list membership, nesting and bullet numbering

mod error;
mod list_context;
mod scale;
mod text_layout;

pub use error::*;
pub use list_context::*;
pub use scale::*;
pub use text_layout::*;
