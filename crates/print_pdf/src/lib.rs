//! Print PDF
//!
//! Writes a finished print raster into a one-page PDF document whose
//! MediaBox matches the physical sheet.
//!
//! # Architecture
//!
//! - `objects`: PDF object model and serializer
//! - `document`: catalog, page tree and info dictionary
//! - `content`: page content stream operators
//! - `xobject`: raster image XObjects (JPEG or Flate)
//! - `writer`: object numbering, xref table and trailer
//! - `options`: document metadata and encoding settings
//! - `api`: single-page entry points

mod api;
mod content;
mod document;
mod error;
mod objects;
mod options;
mod writer;
mod xobject;

pub use api::*;
pub use content::ContentStream;
pub use document::{DocumentInfo, MediaBox, PdfVersion};
pub use error::*;
pub use objects::{PdfDictionary, PdfObject, PdfSerializer, PdfStream, PdfString};
pub use options::*;
pub use writer::PdfWriter;
pub use xobject::{ImageFilter, RasterImage};
