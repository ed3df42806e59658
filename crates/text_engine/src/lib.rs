//! Text Engine - Shaping, measurement, font loading and glyph rasterization
//!
//! # Modules
//!
//! - `font`: font requests, loaded faces and metrics
//! - `loader`: the font-loading service (font-kit backed or in-memory)
//! - `registry`: per-export face preparation and substitution reporting
//! - `shaper`: text shaping using rustybuzz
//! - `measure`: the `TextMeasurer` capability consumed by layout
//! - `glyph`: coverage masks via fontdue

mod error;
mod font;
mod glyph;
mod loader;
mod measure;
mod registry;
mod shaper;

pub use error::*;
pub use font::*;
pub use glyph::*;
pub use loader::*;
pub use measure::*;
pub use registry::*;
pub use shaper::*;
