//! A [Standard Bitmap Graphics Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/sbix) implementation.
//!
//! Images are counted by graphic type and never decoded.

use indexmap::IndexMap;
use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{slice_from, FromData, Offset, Offset32, Stream, Tag};
use crate::{DecodeError, DecodeResult, Font, Result};

/// A glyph data header size: `originOffsetX`, `originOffsetY` and `graphicType`.
const GLYPH_HEADER_SIZE: usize = 8;

/// A bitmap strike summary.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Strike {
    pub pixels_per_em: u16,
    pub ppi: u16,
    /// Glyphs with non-empty data.
    pub glyph_count: u32,
    /// Glyph count per `graphicType` in first-seen order.
    pub graphic_types: IndexMap<Tag, u32>,
}

/// A [Standard Bitmap Graphics Table](
/// https://docs.microsoft.com/en-us/typography/opentype/spec/sbix).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub version: u16,
    /// Bit 1 requests drawing outlines in addition to bitmaps.
    pub draw_outlines: bool,
    pub strikes: Vec<Strike>,
}

/// Decodes a table.
///
/// `number_of_glyphs` comes from `maxp`.
pub fn decode(data: &[u8], number_of_glyphs: u16) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, number_of_glyphs, &mut notes);
    notes.finish(table)
}

/// Decodes a table using the font's `maxp` table.
pub(crate) fn decode_font(font: &Font, data: &[u8]) -> DecodeResult<Table> {
    let maxp = font
        .required_table(Tag::from_bytes(b"maxp"))
        .and_then(|data| super::maxp::parse(data, &mut Notes::new()));

    match maxp {
        Ok(maxp) => decode(data, maxp.number_of_glyphs),
        Err(e) => DecodeResult::error(Table::default(), &e),
    }
}

fn parse(data: &[u8], number_of_glyphs: u16, notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);
    let version = s.read::<u16>()?;
    if version != 1 {
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"sbix"), version: u32::from(version) });
    }

    let flags = s.read::<u16>()?;
    let count = s.read::<u32>()?;
    let offsets: Vec<Offset32> = s
        .read_bytes((count as usize).saturating_mul(Offset32::SIZE))?
        .chunks_exact(Offset32::SIZE)
        .filter_map(Offset32::parse)
        .collect();

    let mut strikes = Vec::with_capacity(offsets.len());
    for (index, offset) in offsets.into_iter().enumerate() {
        let strike = slice_from(data, offset.to_usize(), "sbix strike")
            .and_then(|data| parse_strike(data, number_of_glyphs, notes));
        match strike {
            Ok(strike) => strikes.push(strike),
            Err(e) => notes.skipped(&format!("sbix strike {}", index), e),
        }
    }

    Ok(Table { version, draw_outlines: flags & 0x0002 != 0, strikes })
}

fn parse_strike(data: &[u8], number_of_glyphs: u16, notes: &mut Notes) -> Result<Strike> {
    let mut s = Stream::new(data);
    let pixels_per_em = s.read::<u16>()?;
    let ppi = s.read::<u16>()?;

    let total = usize::from(number_of_glyphs) + 1;
    let offsets: Vec<u32> = s
        .read_bytes(total * u32::SIZE)?
        .chunks_exact(u32::SIZE)
        .filter_map(u32::parse)
        .collect();

    let mut strike = Strike { pixels_per_em, ppi, ..Strike::default() };
    let mut bad_glyphs = 0u32;
    for pair in offsets.windows(2) {
        let (start, end) = (pair[0] as usize, pair[1] as usize);
        if start == end {
            continue;
        }

        if end < start + GLYPH_HEADER_SIZE {
            bad_glyphs += 1;
            continue;
        }

        match Stream::read_at::<Tag>(data, start + 4) {
            Ok(graphic_type) if end <= data.len() => {
                strike.glyph_count += 1;
                *strike.graphic_types.entry(graphic_type).or_insert(0) += 1;
            }
            _ => bad_glyphs += 1,
        }
    }

    if bad_glyphs != 0 {
        notes.push(format!("{} glyphs in the {} ppem sbix strike are malformed", bad_glyphs, pixels_per_em));
    }

    Ok(strike)
}
