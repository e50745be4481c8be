//! A [Horizontal Metrics Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx) implementation.
//!
//! Also used for the `vmtx` table, which shares the layout.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{FromData, Stream};
use crate::{DecodeResult, Font, Result, Tag};

#[derive(Clone, Copy)]
struct LongMetric {
    advance: u16,
    side_bearing: i16,
}

impl FromData for LongMetric {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(LongMetric {
            advance: s.read::<u16>().ok()?,
            side_bearing: s.read::<i16>().ok()?,
        })
    }
}


/// A metrics summary.
///
/// Advance statistics are computed over long metrics only,
/// since the remaining glyphs repeat the last advance.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub number_of_long_metrics: u16,
    /// The number of trailing side bearings.
    pub number_of_bearings: u16,
    pub min_advance: u16,
    pub max_advance: u16,
    pub average_advance: u16,
    pub min_side_bearing: i16,
    pub max_side_bearing: i16,
}

/// Decodes a table.
///
/// `number_of_metrics` comes from `hhea` (or `vhea`) and `number_of_glyphs` from `maxp`.
pub fn decode(data: &[u8], number_of_metrics: u16, number_of_glyphs: u16) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, number_of_metrics, number_of_glyphs, &mut notes);
    notes.finish(table)
}

/// Decodes a table using the font's header and `maxp` tables.
///
/// `tag` is either `hmtx` or `vmtx`.
pub(crate) fn decode_font(font: &Font, tag: Tag, data: &[u8]) -> DecodeResult<Table> {
    let header_tag = if tag == Tag::from_bytes(b"vmtx") { b"vhea" } else { b"hhea" };
    let inputs = font
        .required_table(Tag::from_bytes(header_tag))
        .and_then(|d| super::hhea::parse(d, Tag::from_bytes(header_tag), &mut Notes::new()))
        .and_then(|header| {
            let maxp = font.required_table(Tag::from_bytes(b"maxp"))?;
            let maxp = super::maxp::parse(maxp, &mut Notes::new())?;
            Ok((header.number_of_metrics, maxp.number_of_glyphs))
        });

    match inputs {
        Ok((number_of_metrics, number_of_glyphs)) => decode(data, number_of_metrics, number_of_glyphs),
        Err(e) => DecodeResult::error(Table::default(), &e),
    }
}

fn parse(data: &[u8], number_of_metrics: u16, number_of_glyphs: u16, notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);

    let mut long_count = number_of_metrics;
    if long_count > number_of_glyphs {
        notes.push(format!("{} metrics declared for {} glyphs", number_of_metrics, number_of_glyphs));
        long_count = number_of_glyphs;
    }

    let metrics = s.read_array16::<LongMetric>(long_count)?;

    let mut table = Table {
        number_of_long_metrics: long_count,
        min_advance: u16::MAX,
        min_side_bearing: i16::MAX,
        max_side_bearing: i16::MIN,
        ..Table::default()
    };

    let mut advance_sum = 0u64;
    for metric in metrics {
        table.min_advance = table.min_advance.min(metric.advance);
        table.max_advance = table.max_advance.max(metric.advance);
        table.min_side_bearing = table.min_side_bearing.min(metric.side_bearing);
        table.max_side_bearing = table.max_side_bearing.max(metric.side_bearing);
        advance_sum += u64::from(metric.advance);
    }

    // The remaining glyphs only have side bearings.
    let bearings_count = number_of_glyphs - long_count;
    match s.read_array16::<i16>(bearings_count) {
        Ok(bearings) => {
            table.number_of_bearings = bearings_count;
            for bearing in bearings {
                table.min_side_bearing = table.min_side_bearing.min(bearing);
                table.max_side_bearing = table.max_side_bearing.max(bearing);
            }
        }
        Err(e) => notes.skipped("trailing side bearings", e),
    }

    if long_count == 0 {
        table.min_advance = 0;
    } else {
        table.average_advance = (advance_sum / u64::from(long_count)) as u16;
    }

    if table.min_side_bearing > table.max_side_bearing {
        table.min_side_bearing = 0;
        table.max_side_bearing = 0;
    }

    Ok(table)
}
