//! Error types for layout engine

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("Source box has no area ({width} x {height})")]
    ZeroSizeSource { width: f32, height: f32 },

    #[error("Destination surface has no area ({width} x {height})")]
    ZeroSizeDestination { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, LayoutError>;
