//! An [Index to Location Table](https://docs.microsoft.com/en-us/typography/opentype/spec/loca)
//! implementation.

use core::cmp::Ordering;
use core::ops::Range;

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{FromData, Stream};
use crate::tables::head::IndexToLocationFormat;
use crate::{DecodeResult, Font, Result, Tag};

/// An [Index to Location Table](https://docs.microsoft.com/en-us/typography/opentype/spec/loca).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub format: IndexToLocationFormat,
    /// The number of glyphs with an offset range, which is one less than the number of offsets.
    pub glyph_count: u16,
    /// Glyphs where `start == end`.
    pub empty_glyph_count: u16,
    /// The last offset, i.e. the used `glyf` size.
    pub data_size: u32,
    /// Byte offsets into `glyf`.
    #[serde(skip)]
    pub offsets: Vec<u32>,
}

/// Where a glyph's data is in `glyf`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GlyphLocation {
    /// The glyph has no outline, i.e. `loca[n] == loca[n + 1]`.
    Empty,
    /// A byte range in `glyf`.
    Range(Range<usize>),
    /// The offsets descend, i.e. `loca[n] > loca[n + 1]`.
    Inverted,
}

impl Table {
    /// Returns a glyph's location in `glyf`.
    ///
    /// Returns `None` for an index past the offsets.
    pub fn glyph_location(&self, index: u16) -> Option<GlyphLocation> {
        let index = usize::from(index);
        let start = *self.offsets.get(index)? as usize;
        let end = *self.offsets.get(index + 1)? as usize;
        Some(match start.cmp(&end) {
            Ordering::Less => GlyphLocation::Range(start..end),
            Ordering::Equal => GlyphLocation::Empty,
            Ordering::Greater => GlyphLocation::Inverted,
        })
    }

    /// Returns a glyph's byte range in `glyf`.
    ///
    /// Returns `None` for empty glyphs and descending offsets.
    pub fn glyph_range(&self, index: u16) -> Option<Range<usize>> {
        match self.glyph_location(index)? {
            GlyphLocation::Range(range) => Some(range),
            GlyphLocation::Empty | GlyphLocation::Inverted => None,
        }
    }
}

/// Decodes a table.
///
/// `number_of_glyphs` comes from `maxp` and `format` from `head`.
pub fn decode(data: &[u8], number_of_glyphs: u16, format: IndexToLocationFormat) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, number_of_glyphs, format, &mut notes);
    notes.finish(table)
}

/// Decodes a table using the font's `head` and `maxp` tables.
pub(crate) fn decode_font(font: &Font, data: &[u8]) -> DecodeResult<Table> {
    match inputs(font) {
        Ok((number_of_glyphs, format)) => decode(data, number_of_glyphs, format),
        Err(e) => DecodeResult::error(Table::default(), &e),
    }
}

/// Parses the font's `loca` table without notes. Used by `glyf`.
pub(crate) fn parse_font(font: &Font) -> Result<Table> {
    let (number_of_glyphs, format) = inputs(font)?;
    let data = font.required_table(Tag::from_bytes(b"loca"))?;
    parse(data, number_of_glyphs, format, &mut Notes::new())
}

fn inputs(font: &Font) -> Result<(u16, IndexToLocationFormat)> {
    let head = font.required_table(Tag::from_bytes(b"head"))?;
    let head = super::head::parse(head, &mut Notes::new())?;
    let maxp = font.required_table(Tag::from_bytes(b"maxp"))?;
    let maxp = super::maxp::parse(maxp, &mut Notes::new())?;
    Ok((maxp.number_of_glyphs, head.index_to_location_format))
}

pub(crate) fn parse(
    data: &[u8],
    number_of_glyphs: u16,
    format: IndexToLocationFormat,
    notes: &mut Notes,
) -> Result<Table> {
    // The number of offsets is `maxp.numGlyphs + 1`.
    let total = usize::from(number_of_glyphs) + 1;

    let mut s = Stream::new(data);
    let offsets: Vec<u32> = match format {
        IndexToLocationFormat::Short => {
            // 'The actual local offset divided by 2 is stored.'
            s.read_bytes(total * u16::SIZE)?
                .chunks_exact(u16::SIZE)
                .filter_map(u16::parse)
                .map(|n| u32::from(n) * 2)
                .collect()
        }
        IndexToLocationFormat::Long => {
            s.read_bytes(total * u32::SIZE)?
                .chunks_exact(u32::SIZE)
                .filter_map(u32::parse)
                .collect()
        }
    };

    let mut empty_glyph_count = 0;
    let mut descending = 0;
    for pair in offsets.windows(2) {
        if pair[0] == pair[1] {
            empty_glyph_count += 1;
        } else if pair[0] > pair[1] {
            descending += 1;
        }
    }

    if descending != 0 {
        notes.push(format!("{} loca offsets are not ascending", descending));
    }

    if !s.at_end() {
        log::debug!("loca has {} trailing bytes", s.remaining());
    }

    Ok(Table {
        format,
        glyph_count: number_of_glyphs,
        empty_glyph_count,
        data_size: offsets.last().copied().unwrap_or(0),
        offsets,
    })
}
