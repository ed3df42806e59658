//! Error types for raster

use poster_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Cannot allocate a {width} x {height} surface")]
    Allocation { width: u32, height: u32 },

    #[error("Surface is tainted by untrusted image content")]
    Tainted,

    #[error("Image fetch failed: {0}")]
    Fetch(String),

    #[error("Image fetch timed out after {0} ms")]
    Timeout(u64),

    #[error("Image decode failed: {0}")]
    Decode(String),

    #[error("Unsupported image reference: {0}")]
    UnsupportedSource(String),

    #[error("Cross-origin image was not approved: {0}")]
    NotApproved(String),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RasterError>;
