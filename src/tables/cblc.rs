//! A [Color Bitmap Location Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/cblc) implementation.
//!
//! Also used for `EBLC`, which shares the layout.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{slice_from, FromData, Offset, Offset32, Stream};
use crate::{DecodeError, DecodeResult, Result, Tag};

const BITMAP_SIZE_RECORD_SIZE: usize = 48;

/// An index subtable summary.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct IndexSubtable {
    pub first_glyph_index: u16,
    pub last_glyph_index: u16,
    pub index_format: u16,
    pub image_format: u16,
}

#[derive(Clone, Copy)]
struct IndexSubtableRecord {
    first_glyph_index: u16,
    last_glyph_index: u16,
    offset: Offset32,
}

impl FromData for IndexSubtableRecord {
    const SIZE: usize = 8;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(IndexSubtableRecord {
            first_glyph_index: s.read::<u16>().ok()?,
            last_glyph_index: s.read::<u16>().ok()?,
            offset: s.read::<Offset32>().ok()?,
        })
    }
}


/// A bitmap size record.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct BitmapSize {
    pub start_glyph_index: u16,
    pub end_glyph_index: u16,
    pub ppem_x: u8,
    pub ppem_y: u8,
    pub bit_depth: u8,
    pub horizontal: bool,
    pub vertical: bool,
    pub index_subtables: Vec<IndexSubtable>,
}

/// A [Color Bitmap Location Table](
/// https://docs.microsoft.com/en-us/typography/opentype/spec/cblc).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub major_version: u16,
    pub minor_version: u16,
    pub sizes: Vec<BitmapSize>,
}

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    decode_versioned(data, Tag::from_bytes(b"CBLC"), 3)
}

/// Decodes a table with the given major version.
///
/// Some color fonts, notably early Noto Color Emoji builds, ship CBLC
/// with the EBLC version 2.0. Those are accepted with a note.
pub(crate) fn decode_versioned(data: &[u8], tag: Tag, major_version: u16) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, tag, major_version, &mut notes);
    notes.finish(table)
}

fn parse(data: &[u8], tag: Tag, expected_major: u16, notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);
    let major_version = s.read::<u16>()?;
    let minor_version = s.read::<u16>()?;
    if major_version == 2 && expected_major == 3 {
        notes.push(format!("{} declares the EBLC version 2.0", tag));
    } else if major_version != expected_major {
        let version = u32::from(major_version) << 16 | u32::from(minor_version);
        return Err(DecodeError::UnsupportedVersion { table: tag, version });
    }

    let count = s.read::<u32>()?;
    let records = s.read_bytes((count as usize).saturating_mul(BITMAP_SIZE_RECORD_SIZE))?;

    let mut sizes = Vec::with_capacity(count as usize);
    for (index, record) in records.chunks_exact(BITMAP_SIZE_RECORD_SIZE).enumerate() {
        match parse_bitmap_size(data, record) {
            Ok(size) => sizes.push(size),
            Err(e) => notes.skipped(&format!("bitmap size {}", index), e),
        }
    }

    Ok(Table { major_version, minor_version, sizes })
}

fn parse_bitmap_size(data: &[u8], record: &[u8]) -> Result<BitmapSize> {
    let mut s = Stream::new(record);
    let array_offset = s.read::<Offset32>()?;
    s.skip::<u32>(); // indexTablesSize
    let subtable_count = s.read::<u32>()?;
    s.skip::<u32>(); // colorRef
    s.advance(24); // hori and vert SbitLineMetrics
    let start_glyph_index = s.read::<u16>()?;
    let end_glyph_index = s.read::<u16>()?;
    let ppem_x = s.read::<u8>()?;
    let ppem_y = s.read::<u8>()?;
    let bit_depth = s.read::<u8>()?;
    let flags = s.read::<u8>()?;

    if !matches!(bit_depth, 1 | 2 | 4 | 8 | 32) {
        return Err(DecodeError::InvalidValue { what: "bitmap bit depth", value: u32::from(bit_depth) });
    }

    let array = slice_from(data, array_offset.to_usize(), "index subtable array")?;
    let mut s = Stream::new(array);
    let records = s.read_bytes((subtable_count as usize).saturating_mul(IndexSubtableRecord::SIZE))?;

    let mut index_subtables = Vec::with_capacity(subtable_count as usize);
    for record in records.chunks_exact(IndexSubtableRecord::SIZE).filter_map(IndexSubtableRecord::parse) {
        let mut s = Stream::new_at(array, record.offset.to_usize())?;
        index_subtables.push(IndexSubtable {
            first_glyph_index: record.first_glyph_index,
            last_glyph_index: record.last_glyph_index,
            index_format: s.read::<u16>()?,
            image_format: s.read::<u16>()?,
        });
    }

    Ok(BitmapSize {
        start_glyph_index,
        end_glyph_index,
        ppem_x,
        ppem_y,
        bit_depth,
        horizontal: flags & 0x01 != 0,
        vertical: flags & 0x02 != 0,
        index_subtables,
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    fn table(major: u8) -> Vec<u8> {
        let mut data = vec![
            0x00, major, 0x00, 0x00, // version
            0x00, 0x00, 0x00, 0x01, // number of sizes: 1
            // bitmap size [0] (8)
            0x00, 0x00, 0x00, 0x38, // index subtable array offset: 56
            0x00, 0x00, 0x00, 0x10, // index tables size: 16
            0x00, 0x00, 0x00, 0x01, // number of index subtables: 1
            0x00, 0x00, 0x00, 0x00, // color ref
        ];
        data.extend_from_slice(&[0; 24]); // line metrics
        data.extend_from_slice(&[
            0x00, 0x04, // start glyph: 4
            0x00, 0x09, // end glyph: 9
            0x6D, 0x6D, // ppem: 109x109
            0x20, // bit depth: 32
            0x01, // flags: horizontal
            // index subtable array (56)
            0x00, 0x04, 0x00, 0x09, // glyphs 4..=9
            0x00, 0x00, 0x00, 0x08, // additional offset: 8
            // index subtable header (64)
            0x00, 0x01, // index format: 1
            0x00, 0x11, // image format: 17
            0x00, 0x00, 0x00, 0x04, // image data offset: 4
        ]);
        data
    }

    #[test]
    fn color_bitmap_sizes() {
        let table = decode(&table(3));
        assert!(table.is_complete());
        let size = &table.data.sizes[0];
        assert_eq!(size.ppem_x, 109);
        assert_eq!(size.bit_depth, 32);
        assert!(size.horizontal);
        assert!(!size.vertical);
        assert_eq!(size.index_subtables, vec![IndexSubtable {
            first_glyph_index: 4,
            last_glyph_index: 9,
            index_format: 1,
            image_format: 17,
        }]);
    }

    #[test]
    fn legacy_version() {
        let table = decode(&table(2));
        assert!(matches!(table.status, Status::Partial(_)));
        assert_eq!(table.data.sizes.len(), 1);
    }

    #[test]
    fn unsupported_version() {
        assert!(decode(&table(4)).is_error());
    }

    #[test]
    fn missing_subtable_header() {
        let mut data = table(3);
        data.truncate(66);
        let table = decode(&data);
        assert!(matches!(table.status, Status::Partial(_)));
        assert!(table.data.sizes.is_empty());
    }
}
