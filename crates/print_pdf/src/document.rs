//! Document structure: catalog, page tree, info dictionary

use chrono::{DateTime, Utc};
use poster_model::PageSize;

use crate::objects::{PdfDictionary, PdfObject};

/// PDF header version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PdfVersion {
    #[default]
    V1_4,
    V1_7,
}

impl PdfVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            PdfVersion::V1_4 => "1.4",
            PdfVersion::V1_7 => "1.7",
        }
    }
}

/// Document information dictionary
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Vec<String>,
    pub creator: String,
    pub producer: String,
    pub creation_date: Option<DateTime<Utc>>,
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            subject: None,
            keywords: Vec::new(),
            creator: "Poster Studio".to_string(),
            producer: concat!("Poster Studio print export ", env!("CARGO_PKG_VERSION")).to_string(),
            creation_date: None,
        }
    }
}

impl DocumentInfo {
    pub fn to_dictionary(&self) -> PdfDictionary {
        let mut dict = PdfDictionary::new();
        let optional = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                dict.insert(key, PdfObject::text(value));
            }
        }
        if !self.keywords.is_empty() {
            dict.insert("Keywords", PdfObject::text(&self.keywords.join(", ")));
        }
        dict.insert("Creator", PdfObject::text(&self.creator));
        dict.insert("Producer", PdfObject::text(&self.producer));
        if let Some(date) = self.creation_date {
            dict.insert("CreationDate", PdfObject::text(&pdf_date(date)));
        }
        dict
    }
}

/// Format a timestamp as a PDF date string (`D:YYYYMMDDHHmmSS+00'00'`)
pub fn pdf_date(date: DateTime<Utc>) -> String {
    format!("D:{}+00'00'", date.format("%Y%m%d%H%M%S"))
}

/// Page rectangle in points, origin at the lower-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    pub width: f64,
    pub height: f64,
}

impl MediaBox {
    pub fn from_page_size(page: PageSize) -> Self {
        let (width, height) = page.points();
        Self {
            width: width as f64,
            height: height as f64,
        }
    }

    pub fn to_object(&self) -> PdfObject {
        PdfObject::reals(&[0.0, 0.0, self.width, self.height])
    }
}

pub fn create_catalog(pages_ref: u32) -> PdfDictionary {
    PdfDictionary::typed("Catalog").with("Pages", PdfObject::reference(pages_ref))
}

pub fn create_pages(page_refs: &[u32]) -> PdfDictionary {
    let kids = page_refs.iter().map(|&r| PdfObject::reference(r)).collect();
    PdfDictionary::typed("Pages")
        .with("Kids", PdfObject::Array(kids))
        .with("Count", PdfObject::int(page_refs.len() as i64))
}
