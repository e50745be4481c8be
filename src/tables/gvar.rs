//! A [Glyph Variations Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/gvar) implementation.
//!
//! Only the header and the offsets array are decoded. Tuple data is measured, not parsed.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{F2Dot14, FromData, Offset, Offset32, Stream};
use crate::{DecodeError, DecodeResult, Result, Tag};

/// A [Glyph Variations Table](https://docs.microsoft.com/en-us/typography/opentype/spec/gvar).
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub major_version: u16,
    pub minor_version: u16,
    pub axis_count: u16,
    pub shared_tuple_count: u16,
    pub glyph_count: u16,
    /// Offsets are stored as `u32` instead of `u16 / 2`.
    pub long_offsets: bool,
    /// The number of glyphs with non-empty variation data.
    pub glyphs_with_variations: u16,
    /// The total size of the glyph variation data array.
    pub variation_data_size: u32,
}

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, &mut notes);
    notes.finish(table)
}

fn parse(data: &[u8], notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);
    let major_version = s.read::<u16>()?;
    let minor_version = s.read::<u16>()?;
    if major_version != 1 {
        let version = u32::from(major_version) << 16 | u32::from(minor_version);
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"gvar"), version });
    }

    let axis_count = s.read::<u16>()?;
    let shared_tuple_count = s.read::<u16>()?;
    let shared_tuples_offset = s.read::<Offset32>()?;
    let glyph_count = s.read::<u16>()?;
    let flags = s.read::<u16>()?;
    let data_array_offset = s.read::<Offset32>()?;
    let long_offsets = flags & 1 != 0;

    let mut table = Table {
        major_version,
        minor_version,
        axis_count,
        shared_tuple_count,
        glyph_count,
        long_offsets,
        ..Table::default()
    };

    // There is one more offset than there are glyphs.
    let offsets_count = usize::from(glyph_count) + 1;
    let offsets = if long_offsets {
        s.read_bytes(offsets_count * u32::SIZE).map(|data| {
            data.chunks_exact(u32::SIZE).filter_map(u32::parse).collect::<Vec<_>>()
        })
    } else {
        s.read_bytes(offsets_count * u16::SIZE).map(|data| {
            data.chunks_exact(u16::SIZE).filter_map(u16::parse).map(|n| u32::from(n) * 2).collect::<Vec<_>>()
        })
    };

    match offsets {
        Ok(offsets) => {
            let mut unsorted = false;
            for pair in offsets.windows(2) {
                if pair[0] < pair[1] {
                    table.glyphs_with_variations += 1;
                } else if pair[0] > pair[1] {
                    unsorted = true;
                }
            }

            if unsorted {
                notes.push("glyph variation data offsets are not ascending");
            }

            table.variation_data_size = offsets.last().copied().unwrap_or(0);
            let end = data_array_offset.to_usize().saturating_add(table.variation_data_size as usize);
            if end > data.len() {
                notes.push("glyph variation data extends past the end of the table");
            }
        }
        Err(e) => notes.skipped("glyph variation data offsets", e),
    }

    let shared_tuples_len = usize::from(shared_tuple_count) * usize::from(axis_count) * F2Dot14::SIZE;
    if let Err(e) = Stream::new_at(data, shared_tuples_offset.to_usize()).and_then(|mut s| s.read_bytes(shared_tuples_len)) {
        notes.skipped("shared tuples", e);
    }

    Ok(table)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    const DATA: &[u8] = &[
        0x00, 0x01, 0x00, 0x00, // version: 1.0
        0x00, 0x01, // axis count: 1
        0x00, 0x01, // shared tuple count: 1
        0x00, 0x00, 0x00, 0x1A, // shared tuples offset: 26
        0x00, 0x02, // glyph count: 2
        0x00, 0x00, // flags: short offsets
        0x00, 0x00, 0x00, 0x1C, // glyph variation data offset: 28
        0x00, 0x00, // glyph [0] at 0
        0x00, 0x00, // glyph [1] at 0
        0x00, 0x02, // end at 4
        // shared tuples (26)
        0x40, 0x00, // 1.0
        // glyph variation data (28)
        0x00, 0x00, 0x00, 0x00,
    ];

    #[test]
    fn short_offsets() {
        let table = decode(DATA);
        assert!(table.is_complete());
        let table = table.data;
        assert!(!table.long_offsets);
        assert_eq!(table.glyph_count, 2);
        assert_eq!(table.glyphs_with_variations, 1);
        assert_eq!(table.variation_data_size, 4);
    }

    #[test]
    fn data_past_end() {
        let table = decode(&DATA[..DATA.len() - 2]);
        assert!(matches!(table.status, Status::Partial(_)));
        assert_eq!(table.data.glyphs_with_variations, 1);
    }

    #[test]
    fn unsupported_version() {
        assert!(decode(&[0x00, 0x02, 0x00, 0x00]).is_error());
    }
}
