//! PDF object model
//!
//! The handful of basic object kinds a one-page raster document needs,
//! plus a serializer that writes them in PDF syntax.

use std::collections::BTreeMap;
use std::io::{self, Write};

/// A PDF object
#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(PdfString),
    Name(String),
    Array(Vec<PdfObject>),
    Dictionary(PdfDictionary),
    Stream(PdfStream),
    /// Indirect reference: object number and generation
    Reference(u32, u16),
}

impl PdfObject {
    pub fn name(name: impl Into<String>) -> Self {
        PdfObject::Name(name.into())
    }

    pub fn text(text: &str) -> Self {
        PdfObject::String(PdfString::Literal(text.as_bytes().to_vec()))
    }

    pub fn reference(obj_num: u32) -> Self {
        PdfObject::Reference(obj_num, 0)
    }

    pub fn int(value: impl Into<i64>) -> Self {
        PdfObject::Integer(value.into())
    }

    /// Numeric array, used for rectangles and matrices
    pub fn reals(values: &[f64]) -> Self {
        PdfObject::Array(values.iter().copied().map(PdfObject::Real).collect())
    }
}

impl From<PdfDictionary> for PdfObject {
    fn from(dict: PdfDictionary) -> Self {
        PdfObject::Dictionary(dict)
    }
}

impl From<PdfStream> for PdfObject {
    fn from(stream: PdfStream) -> Self {
        PdfObject::Stream(stream)
    }
}

/// PDF string, literal `( )` or hexadecimal `< >`
#[derive(Debug, Clone, PartialEq)]
pub enum PdfString {
    Literal(Vec<u8>),
    Hex(Vec<u8>),
}

/// Dictionary with keys kept in sorted order so output is stable
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfDictionary {
    entries: BTreeMap<String, PdfObject>,
}

impl PdfDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dictionary with a `/Type` entry already set
    pub fn typed(type_name: &str) -> Self {
        let mut dict = Self::new();
        dict.insert("Type", PdfObject::name(type_name));
        dict
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PdfObject>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<PdfObject>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&PdfObject> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PdfObject)> {
        self.entries.iter()
    }
}

/// Stream object: dictionary plus raw bytes
#[derive(Debug, Clone, PartialEq)]
pub struct PdfStream {
    pub dict: PdfDictionary,
    pub data: Vec<u8>,
    /// Set once a filter has been applied to `data`
    pub encoded: bool,
}

impl PdfStream {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            dict: PdfDictionary::new(),
            data,
            encoded: false,
        }
    }

    /// Stream whose bytes are already filtered (e.g. DCT)
    pub fn encoded(dict: PdfDictionary, data: Vec<u8>) -> Self {
        Self {
            dict,
            data,
            encoded: true,
        }
    }
}

/// Writes objects in PDF syntax
pub struct PdfSerializer<W: Write> {
    out: W,
}

impl<W: Write> PdfSerializer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_object(&mut self, object: &PdfObject) -> io::Result<()> {
        match object {
            PdfObject::Null => self.out.write_all(b"null"),
            PdfObject::Boolean(value) => write!(self.out, "{}", value),
            PdfObject::Integer(value) => write!(self.out, "{}", value),
            PdfObject::Real(value) => self.write_real(*value),
            PdfObject::String(value) => self.write_string(value),
            PdfObject::Name(name) => self.write_name(name),
            PdfObject::Array(items) => {
                self.out.write_all(b"[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.write_all(b" ")?;
                    }
                    self.write_object(item)?;
                }
                self.out.write_all(b"]")
            }
            PdfObject::Dictionary(dict) => self.write_dictionary(dict),
            PdfObject::Stream(stream) => {
                self.write_dictionary(&stream.dict)?;
                self.out.write_all(b"\nstream\n")?;
                self.out.write_all(&stream.data)?;
                self.out.write_all(b"\nendstream")
            }
            PdfObject::Reference(num, generation) => write!(self.out, "{} {} R", num, generation),
        }
    }

    fn write_real(&mut self, value: f64) -> io::Result<()> {
        if value.fract() == 0.0 {
            return write!(self.out, "{:.1}", value);
        }
        let formatted = format!("{:.4}", value);
        let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
        self.out.write_all(trimmed.as_bytes())
    }

    fn write_string(&mut self, value: &PdfString) -> io::Result<()> {
        match value {
            PdfString::Literal(bytes) => {
                self.out.write_all(b"(")?;
                for &byte in bytes {
                    match byte {
                        b'(' | b')' | b'\\' => write!(self.out, "\\{}", byte as char)?,
                        b'\n' => self.out.write_all(b"\\n")?,
                        b'\r' => self.out.write_all(b"\\r")?,
                        b'\t' => self.out.write_all(b"\\t")?,
                        0x20..=0x7E => self.out.write_all(&[byte])?,
                        _ => write!(self.out, "\\{:03o}", byte)?,
                    }
                }
                self.out.write_all(b")")
            }
            PdfString::Hex(bytes) => {
                self.out.write_all(b"<")?;
                for byte in bytes {
                    write!(self.out, "{:02X}", byte)?;
                }
                self.out.write_all(b">")
            }
        }
    }

    fn write_name(&mut self, name: &str) -> io::Result<()> {
        self.out.write_all(b"/")?;
        for byte in name.bytes() {
            let delimiter = matches!(
                byte,
                b'#' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
            );
            if (0x21..=0x7E).contains(&byte) && !delimiter {
                self.out.write_all(&[byte])?;
            } else {
                write!(self.out, "#{:02X}", byte)?;
            }
        }
        Ok(())
    }

    fn write_dictionary(&mut self, dict: &PdfDictionary) -> io::Result<()> {
        self.out.write_all(b"<<")?;
        for (key, value) in dict.iter() {
            self.out.write_all(b" ")?;
            self.write_name(key)?;
            self.out.write_all(b" ")?;
            self.write_object(value)?;
        }
        self.out.write_all(b" >>")
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Serialize a single object into a byte vector
pub fn to_bytes(object: &PdfObject) -> io::Result<Vec<u8>> {
    let mut serializer = PdfSerializer::new(Vec::new());
    serializer.write_object(object)?;
    Ok(serializer.into_inner())
}
