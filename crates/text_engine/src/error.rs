//! Errors raised while loading and rasterizing font faces

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextError {
    #[error("No installed face for family `{0}`")]
    FontNotFound(String),

    #[error("Font data could not be parsed: {0}")]
    InvalidFontData(String),

    #[error("Rasterizer has no face for {0}")]
    RasterizerMiss(String),

    #[error("Font file could not be read: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TextError>;
