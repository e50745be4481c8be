//! A [Glyph Data Table](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf)
//! implementation.
//!
//! Only glyph headers are decoded. Outlines are never read.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::Stream;
use crate::tables::loca::{self, GlyphLocation};
use crate::{DecodeResult, Font, Rect, Result};

/// A glyph header.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct GlyphHeader {
    /// Negative for composite glyphs.
    pub number_of_contours: i16,
    pub bbox: Rect,
}

impl GlyphHeader {
    /// Checks that the glyph is a composite one.
    #[inline]
    pub fn is_composite(&self) -> bool {
        self.number_of_contours < 0
    }
}


/// A [Glyph Data Table](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) summary.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub glyph_count: u16,
    pub empty_glyph_count: u16,
    pub simple_glyph_count: u16,
    pub composite_glyph_count: u16,
    pub max_contours: u16,
    /// A union of all glyph bounding boxes.
    pub bbox: Option<Rect>,
    /// Glyph headers in glyph order. `None` for empty and unreadable glyphs.
    pub glyphs: Vec<Option<GlyphHeader>>,
}

/// Decodes a table.
pub fn decode(data: &[u8], loca: &loca::Table) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, loca, &mut notes);
    notes.finish(table)
}

/// Decodes a table using the font's `loca`, `head` and `maxp` tables.
pub(crate) fn decode_font(font: &Font, data: &[u8]) -> DecodeResult<Table> {
    match loca::parse_font(font) {
        Ok(loca) => decode(data, &loca),
        Err(e) => DecodeResult::error(Table::default(), &e),
    }
}

fn parse(data: &[u8], loca: &loca::Table, notes: &mut Notes) -> Result<Table> {
    let mut table = Table {
        glyph_count: loca.glyph_count,
        glyphs: Vec::with_capacity(usize::from(loca.glyph_count)),
        ..Table::default()
    };

    let mut unreadable = 0u32;
    let mut inverted = 0u32;
    for index in 0..loca.glyph_count {
        let range = match loca.glyph_location(index) {
            Some(GlyphLocation::Range(range)) => range,
            Some(GlyphLocation::Empty) => {
                // 'If a glyph has no outline, then loca[n] = loca [n+1].'
                table.empty_glyph_count += 1;
                table.glyphs.push(None);
                continue;
            }
            Some(GlyphLocation::Inverted) => {
                inverted += 1;
                table.glyphs.push(None);
                continue;
            }
            None => {
                unreadable += 1;
                table.glyphs.push(None);
                continue;
            }
        };

        let header = match data.get(range).map(parse_header) {
            Some(Ok(v)) => v,
            _ => {
                unreadable += 1;
                table.glyphs.push(None);
                continue;
            }
        };

        if header.is_composite() {
            table.composite_glyph_count += 1;
        } else {
            table.simple_glyph_count += 1;
            table.max_contours = table.max_contours.max(header.number_of_contours as u16);
        }

        table.bbox = Some(table.bbox.map_or(header.bbox, |bbox| bbox.union(header.bbox)));
        table.glyphs.push(Some(header));
    }

    if unreadable != 0 {
        notes.push(format!("{} glyphs are outside of glyf or shorter than a header", unreadable));
    }

    if inverted != 0 {
        notes.push(format!("{} glyphs have descending loca offsets", inverted));
    }

    Ok(table)
}

fn parse_header(data: &[u8]) -> Result<GlyphHeader> {
    let mut s = Stream::new(data);
    let number_of_contours = s.read::<i16>()?;
    let bbox = Rect {
        x_min: s.read::<i16>()?,
        y_min: s.read::<i16>()?,
        x_max: s.read::<i16>()?,
        y_max: s.read::<i16>()?,
    };
    Ok(GlyphHeader { number_of_contours, bbox })
}
