//! Image XObjects for the page raster
//!
//! The raster arrives as packed 8-bit RGB samples. It is stored either
//! JPEG-compressed (`DCTDecode`) or zlib-compressed (`FlateDecode`).

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::error::{PdfError, Result};
use crate::objects::{PdfDictionary, PdfObject, PdfStream};
use crate::options::RasterEncoding;

/// Decode filter recorded on the XObject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFilter {
    DctDecode,
    FlateDecode,
}

impl ImageFilter {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ImageFilter::DctDecode => "DCTDecode",
            ImageFilter::FlateDecode => "FlateDecode",
        }
    }
}

/// An encoded RGB image ready to embed
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub filter: ImageFilter,
    pub data: Vec<u8>,
}

impl RasterImage {
    /// Encode packed RGB samples (`width * height * 3` bytes)
    pub fn from_rgb(rgb: &[u8], width: u32, height: u32, encoding: RasterEncoding) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PdfError::InvalidDocument(format!(
                "Image has no area: {}x{}",
                width, height
            )));
        }
        let expected = width as usize * height as usize * 3;
        if rgb.len() != expected {
            return Err(PdfError::InvalidDocument(format!(
                "Expected {} RGB bytes for {}x{}, got {}",
                expected,
                width,
                height,
                rgb.len()
            )));
        }

        let (filter, data) = match encoding {
            RasterEncoding::Jpeg { quality } => {
                let mut data = Vec::new();
                JpegEncoder::new_with_quality(&mut data, quality.clamp(1, 100))
                    .encode(rgb, width, height, ExtendedColorType::Rgb8)
                    .map_err(|e| PdfError::ImageEncoding(e.to_string()))?;
                (ImageFilter::DctDecode, data)
            }
            RasterEncoding::Flate => {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(rgb)?;
                (ImageFilter::FlateDecode, encoder.finish()?)
            }
        };

        tracing::debug!(
            width,
            height,
            filter = filter.pdf_name(),
            bytes = data.len(),
            "Encoded page raster"
        );

        Ok(Self {
            width,
            height,
            filter,
            data,
        })
    }

    pub fn to_xobject(&self) -> PdfStream {
        let dict = PdfDictionary::typed("XObject")
            .with("Subtype", PdfObject::name("Image"))
            .with("Width", PdfObject::int(self.width))
            .with("Height", PdfObject::int(self.height))
            .with("BitsPerComponent", PdfObject::int(8))
            .with("ColorSpace", PdfObject::name("DeviceRGB"))
            .with("Filter", PdfObject::name(self.filter.pdf_name()));
        PdfStream::encoded(dict, self.data.clone())
    }
}
