//! An [SVG Table](https://docs.microsoft.com/en-us/typography/opentype/spec/svg)
//! implementation.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{slice_from, FromData, Offset, Offset32, Stream};
use crate::{DecodeError, DecodeResult, Result, Tag};

const GZIP_MAGIC: &[u8] = &[0x1F, 0x8B];

/// An SVG document record.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct DocumentRecord {
    pub start_glyph_id: u16,
    pub end_glyph_id: u16,
    /// Relative to the document list.
    pub offset: u32,
    pub length: u32,
}

impl FromData for DocumentRecord {
    const SIZE: usize = 12;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(DocumentRecord {
            start_glyph_id: s.read::<u16>().ok()?,
            end_glyph_id: s.read::<u16>().ok()?,
            offset: s.read::<u32>().ok()?,
            length: s.read::<u32>().ok()?,
        })
    }
}


/// An [SVG Table](https://docs.microsoft.com/en-us/typography/opentype/spec/svg).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub version: u16,
    pub documents: Vec<DocumentRecord>,
    /// The number of glyphs covered by all records.
    pub glyph_count: u32,
    /// The number of gzip-compressed documents.
    pub compressed_count: u16,
}

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, &mut notes);
    notes.finish(table)
}

fn parse(data: &[u8], notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);
    let version = s.read::<u16>()?;
    if version != 0 {
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"SVG "), version: u32::from(version) });
    }

    let doc_list_offset = s.read::<Offset32>()?;
    let doc_list = slice_from(data, doc_list_offset.to_usize(), "SVG document list")?;
    let mut s = Stream::new(doc_list);
    let count = s.read::<u16>()?;
    let documents = s.read_vec::<DocumentRecord>(count)?;

    let mut table = Table { version, ..Table::default() };
    for (index, record) in documents.iter().enumerate() {
        if record.start_glyph_id > record.end_glyph_id {
            notes.push(format!("SVG document {} has an inverted glyph range", index));
            continue;
        }

        table.glyph_count += u32::from(record.end_glyph_id - record.start_glyph_id) + 1;

        let start = record.offset as usize;
        match doc_list.get(start..start.saturating_add(record.length as usize)) {
            Some(doc) if doc.starts_with(GZIP_MAGIC) => table.compressed_count += 1,
            Some(_) => {}
            None => notes.push(format!("SVG document {} is outside of the table", index)),
        }
    }

    if documents.windows(2).any(|w| w[0].end_glyph_id >= w[1].start_glyph_id) {
        notes.push("SVG document records overlap or are not sorted");
    }

    table.documents = documents;
    Ok(table)
}
