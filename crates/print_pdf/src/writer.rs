//! Low-level PDF file writer
//!
//! Tracks byte offsets of indirect objects and emits the cross-reference
//! table and trailer.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::document::PdfVersion;
use crate::error::Result;
use crate::objects::{to_bytes, PdfDictionary, PdfObject, PdfStream};

pub struct PdfWriter<W: Write> {
    out: W,
    position: u64,
    /// (object number, byte offset)
    offsets: Vec<(u32, u64)>,
    next_obj_num: u32,
    compress: bool,
}

impl<W: Write> PdfWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            position: 0,
            offsets: Vec::new(),
            next_obj_num: 1,
            compress: true,
        }
    }

    /// Flate-compress streams that are not already encoded
    pub fn set_compression(&mut self, compress: bool) {
        self.compress = compress;
    }

    pub fn allocate_object(&mut self) -> u32 {
        let num = self.next_obj_num;
        self.next_obj_num += 1;
        num
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.out.write_all(data)?;
        self.position += data.len() as u64;
        Ok(())
    }

    pub fn write_header(&mut self, version: PdfVersion) -> Result<()> {
        self.write_bytes(format!("%PDF-{}\n", version.as_str()).as_bytes())?;
        // Binary marker so transfer tools treat the file as binary
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])
    }

    pub fn write_object(&mut self, obj_num: u32, object: &PdfObject) -> Result<()> {
        self.offsets.push((obj_num, self.position));
        self.write_bytes(format!("{} 0 obj\n", obj_num).as_bytes())?;
        self.write_bytes(&to_bytes(object)?)?;
        self.write_bytes(b"\nendobj\n")
    }

    pub fn write_stream(&mut self, obj_num: u32, mut stream: PdfStream) -> Result<()> {
        if self.compress && !stream.encoded {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&stream.data)?;
            stream.data = encoder.finish()?;
            stream.encoded = true;
            stream.dict.insert("Filter", PdfObject::name("FlateDecode"));
        }
        stream
            .dict
            .insert("Length", PdfObject::int(stream.data.len() as i64));
        self.write_object(obj_num, &PdfObject::Stream(stream))
    }

    /// Emit xref, trailer and `startxref`, then flush
    pub fn finish(mut self, catalog_ref: u32, info_ref: u32) -> Result<W> {
        let xref_offset = self.position;
        let mut offsets = std::mem::take(&mut self.offsets);
        offsets.sort_by_key(|&(num, _)| num);

        let mut table = format!("xref\n0 {}\n0000000000 65535 f \n", self.next_obj_num);
        let mut expected = 1;
        for (num, offset) in offsets {
            while expected < num {
                table.push_str("0000000000 65535 f \n");
                expected += 1;
            }
            table.push_str(&format!("{:010} 00000 n \n", offset));
            expected = num + 1;
        }
        table.push_str("trailer\n");
        self.write_bytes(table.as_bytes())?;

        let trailer = PdfDictionary::new()
            .with("Size", PdfObject::int(self.next_obj_num))
            .with("Root", PdfObject::reference(catalog_ref))
            .with("Info", PdfObject::reference(info_ref));
        self.write_bytes(&to_bytes(&PdfObject::Dictionary(trailer))?)?;
        self.write_bytes(format!("\nstartxref\n{}\n%%EOF\n", xref_offset).as_bytes())?;

        self.out.flush()?;
        Ok(self.out)
    }
}
