//! PDF output options

use serde::{Deserialize, Serialize};

/// How the page raster is stored in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum RasterEncoding {
    /// DCT-compressed, lossy
    Jpeg { quality: u8 },
    /// Flate-compressed RGB samples, lossless
    Flate,
}

impl Default for RasterEncoding {
    fn default() -> Self {
        RasterEncoding::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Options for writing the print PDF
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfOptions {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Flate-compress content streams
    #[serde(default = "default_compress")]
    pub compress: bool,
    #[serde(default)]
    pub encoding: RasterEncoding,
    /// Stamp the document with the export time
    #[serde(default = "default_timestamp")]
    pub timestamp: bool,
}

fn default_compress() -> bool {
    true
}

fn default_timestamp() -> bool {
    true
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            subject: None,
            keywords: Vec::new(),
            compress: default_compress(),
            encoding: RasterEncoding::default(),
            timestamp: default_timestamp(),
        }
    }
}

impl PdfOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn with_encoding(mut self, encoding: RasterEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_timestamp(mut self, timestamp: bool) -> Self {
        self.timestamp = timestamp;
        self
    }
}
