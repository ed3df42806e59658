//! Single-page print document API

use chrono::Utc;
use poster_model::PageSize;

use crate::content::ContentStream;
use crate::document::{create_catalog, create_pages, DocumentInfo, MediaBox, PdfVersion};
use crate::error::Result;
use crate::objects::{PdfDictionary, PdfObject, PdfStream};
use crate::options::PdfOptions;
use crate::writer::PdfWriter;
use crate::xobject::RasterImage;

const IMAGE_NAME: &str = "Im1";

/// Write a one-page PDF whose page is exactly `page` and is covered by `image`
///
/// The raster is stretched over the whole MediaBox, so its pixel density
/// equals the DPI it was rendered at.
pub fn write_single_page(image: &RasterImage, page: PageSize, options: &PdfOptions) -> Result<Vec<u8>> {
    let media_box = MediaBox::from_page_size(page);
    let mut pdf = PdfWriter::new(Vec::new());
    pdf.set_compression(options.compress);
    pdf.write_header(PdfVersion::V1_4)?;

    let catalog_ref = pdf.allocate_object();
    let pages_ref = pdf.allocate_object();
    let info_ref = pdf.allocate_object();
    let page_ref = pdf.allocate_object();
    let content_ref = pdf.allocate_object();
    let image_ref = pdf.allocate_object();

    pdf.write_object(catalog_ref, &create_catalog(pages_ref).into())?;
    pdf.write_object(pages_ref, &create_pages(&[page_ref]).into())?;
    pdf.write_object(info_ref, &document_info(options).to_dictionary().into())?;

    let resources = PdfDictionary::new()
        .with(
            "XObject",
            PdfDictionary::new().with(IMAGE_NAME, PdfObject::reference(image_ref)),
        )
        .with(
            "ProcSet",
            PdfObject::Array(vec![PdfObject::name("PDF"), PdfObject::name("ImageC")]),
        );
    let page_dict = PdfDictionary::typed("Page")
        .with("Parent", PdfObject::reference(pages_ref))
        .with("MediaBox", media_box.to_object())
        .with("Resources", resources)
        .with("Contents", PdfObject::reference(content_ref));
    pdf.write_object(page_ref, &page_dict.into())?;

    let mut content = ContentStream::new();
    content.draw_full_page_image(IMAGE_NAME, media_box.width, media_box.height);
    pdf.write_stream(content_ref, PdfStream::new(content.into_bytes()))?;
    pdf.write_stream(image_ref, image.to_xobject())?;

    let bytes = pdf.finish(catalog_ref, info_ref)?;
    tracing::info!(
        bytes = bytes.len(),
        width_pt = media_box.width,
        height_pt = media_box.height,
        "Wrote print PDF"
    );
    Ok(bytes)
}

/// Encode packed RGB samples and write them as a one-page PDF
pub fn encode_rgb_page(
    rgb: &[u8],
    width: u32,
    height: u32,
    page: PageSize,
    options: &PdfOptions,
) -> Result<Vec<u8>> {
    let image = RasterImage::from_rgb(rgb, width, height, options.encoding)?;
    write_single_page(&image, page, options)
}

fn document_info(options: &PdfOptions) -> DocumentInfo {
    DocumentInfo {
        title: options.title.clone(),
        author: options.author.clone(),
        subject: options.subject.clone(),
        keywords: options.keywords.clone(),
        creation_date: options.timestamp.then(Utc::now),
        ..DocumentInfo::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RasterEncoding;
    use poster_model::Orientation;

    fn white(width: u32, height: u32) -> Vec<u8> {
        vec![255; (width * height * 3) as usize]
    }

    #[test]
    fn test_single_page_structure() {
        let options = PdfOptions::new().with_encoding(RasterEncoding::Flate);
        let bytes = encode_rgb_page(
            &white(4, 6),
            4,
            6,
            PageSize::a0(Orientation::Portrait),
            &options,
        )
        .unwrap();
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.contains("/Type /Catalog"));
        assert!(text.contains("/Count 1"));
        assert!(text.contains("/MediaBox [0.0 0.0 2383.93"));
        assert!(text.contains(" 3370.39"));
        assert!(text.contains("/Subtype /Image"));
        assert!(text.contains("/Creator (Poster Studio)"));
        assert!(text.contains("/CreationDate (D:"));
        assert!(text.ends_with("%%EOF\n"));
    }

    #[test]
    fn test_landscape_media_box() {
        let options = PdfOptions::new()
            .with_encoding(RasterEncoding::Flate)
            .with_timestamp(false);
        let bytes = encode_rgb_page(
            &white(6, 4),
            6,
            4,
            PageSize::a0(Orientation::Landscape),
            &options,
        )
        .unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/MediaBox [0.0 0.0 3370.39"));
        assert!(text.contains(" 2383.93"));
        assert!(!text.contains("/CreationDate"));
    }

    #[test]
    fn test_metadata_written() {
        let options = PdfOptions::new()
            .with_title("Conference Poster")
            .with_author("Lab Group")
            .with_keywords(vec!["poster".to_string(), "print".to_string()]);
        let bytes = encode_rgb_page(
            &white(8, 8),
            8,
            8,
            PageSize::a0(Orientation::Portrait),
            &options,
        )
        .unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Title (Conference Poster)"));
        assert!(text.contains("/Author (Lab Group)"));
        assert!(text.contains("/Keywords (poster, print)"));
        assert!(text.contains("/Filter /DCTDecode"));
    }

    #[test]
    fn test_uncompressed_content_is_readable() {
        let options = PdfOptions::new()
            .with_encoding(RasterEncoding::Flate)
            .with_compression(false);
        let bytes = encode_rgb_page(
            &white(2, 2),
            2,
            2,
            PageSize::a0(Orientation::Portrait),
            &options,
        )
        .unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Im1 Do"));
    }
}
