//! Classified export failures

use thiserror::Error;

/// Why an export produced no document
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing could be painted: unknown target or a zero-size root box
    #[error("Export precondition failed: {0}")]
    Precondition(String),

    /// The surface holds untrusted cross-origin pixels and cannot be read back
    #[error("The print surface is tainted by cross-origin image content")]
    TaintedSurface,

    #[error("Failed to encode the print document: {0}")]
    Encoding(String),
}

impl ExportError {
    /// Message suitable for showing to the person who started the export
    pub fn user_message(&self) -> String {
        match self {
            ExportError::Precondition(reason) => {
                format!("Nothing to export: {}.", reason)
            }
            ExportError::TaintedSurface => "Some images could not be included because their host does not \
                 allow them to be exported. Replace or re-upload those images and try again."
                .to_string(),
            ExportError::Encoding(_) => {
                "The print document could not be created. Please try again.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_distinct() {
        let tainted = ExportError::TaintedSurface.user_message();
        let encoding = ExportError::Encoding("zlib".into()).user_message();
        assert!(tainted.contains("images could not be included"));
        assert!(encoding.contains("try again"));
        assert!(!encoding.contains("zlib"));
        assert_ne!(tainted, encoding);
    }
}
