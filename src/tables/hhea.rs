//! A [Horizontal Header Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/hhea) implementation.
//!
//! Also used for the `vhea` table, which shares the layout.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::Stream;
use crate::{DecodeError, DecodeResult, Result, Tag};

const TABLE_SIZE: usize = 36;

/// A horizontal or vertical header.
///
/// For `vhea`, "leading" and "trailing" are top and bottom.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
#[allow(missing_docs)]
pub struct Table {
    pub major_version: u16,
    pub minor_version: u16,
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    pub advance_max: u16,
    pub min_leading_bearing: i16,
    pub min_trailing_bearing: i16,
    pub max_extent: i16,
    pub caret_slope_rise: i16,
    pub caret_slope_run: i16,
    pub caret_offset: i16,
    pub metric_data_format: i16,
    /// `numberOfHMetrics` or `numOfLongVerMetrics`.
    pub number_of_metrics: u16,
}

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    decode_with_tag(data, Tag::from_bytes(b"hhea"))
}

pub(crate) fn decode_with_tag(data: &[u8], tag: Tag) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, tag, &mut notes);
    notes.finish(table)
}

pub(crate) fn parse(data: &[u8], tag: Tag, notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);
    let major_version = s.read::<u16>()?;
    let minor_version = s.read::<u16>()?;
    if major_version != 1 {
        let version = u32::from(major_version) << 16 | u32::from(minor_version);
        return Err(DecodeError::UnsupportedVersion { table: tag, version });
    }

    let ascender = s.read::<i16>()?;
    let descender = s.read::<i16>()?;
    let line_gap = s.read::<i16>()?;
    let advance_max = s.read::<u16>()?;
    let min_leading_bearing = s.read::<i16>()?;
    let min_trailing_bearing = s.read::<i16>()?;
    let max_extent = s.read::<i16>()?;
    let caret_slope_rise = s.read::<i16>()?;
    let caret_slope_run = s.read::<i16>()?;
    let caret_offset = s.read::<i16>()?;
    s.advance(8); // reserved
    let metric_data_format = s.read::<i16>()?;
    let number_of_metrics = s.read::<u16>()?;

    if number_of_metrics == 0 {
        notes.push("number of metrics is zero");
    }

    if data.len() > TABLE_SIZE {
        notes.push(format!("{} trailing bytes", data.len() - TABLE_SIZE));
    }

    Ok(Table {
        major_version,
        minor_version,
        ascender,
        descender,
        line_gap,
        advance_max,
        min_leading_bearing,
        min_trailing_bearing,
        max_extent,
        caret_slope_rise,
        caret_slope_run,
        caret_offset,
        metric_data_format,
        number_of_metrics,
    })
}
