//! Error types for PDF output

use thiserror::Error;

/// Errors raised while writing a PDF document
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Image encoding failed: {0}")]
    ImageEncoding(String),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;
