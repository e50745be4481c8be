//! A [Vertical Origin Table](https://docs.microsoft.com/en-us/typography/opentype/spec/vorg)
//! implementation.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{FromData, Stream};
use crate::{DecodeError, DecodeResult, Result, Tag};

/// A vertical origin of a single glyph.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct VertOriginYMetrics {
    pub glyph_index: u16,
    pub vert_origin_y: i16,
}

impl FromData for VertOriginYMetrics {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(VertOriginYMetrics {
            glyph_index: s.read::<u16>().ok()?,
            vert_origin_y: s.read::<i16>().ok()?,
        })
    }
}


/// A [Vertical Origin Table](https://docs.microsoft.com/en-us/typography/opentype/spec/vorg).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub major_version: u16,
    pub minor_version: u16,
    pub default_vert_origin_y: i16,
    /// Glyphs with a non-default origin, sorted by glyph index.
    pub metrics: Vec<VertOriginYMetrics>,
}

impl Table {
    /// Returns a glyph's vertical origin.
    pub fn glyph_y_origin(&self, glyph_index: u16) -> i16 {
        self.metrics
            .binary_search_by(|m| m.glyph_index.cmp(&glyph_index))
            .map(|i| self.metrics[i].vert_origin_y)
            .unwrap_or(self.default_vert_origin_y)
    }
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
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"VORG"), version });
    }

    let default_vert_origin_y = s.read::<i16>()?;
    let count = s.read::<u16>()?;
    let metrics = s.read_vec::<VertOriginYMetrics>(count)?;

    if metrics.windows(2).any(|w| w[0].glyph_index >= w[1].glyph_index) {
        notes.push("VORG metrics are not sorted by glyph index");
    }

    Ok(Table { major_version, minor_version, default_vert_origin_y, metrics })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins() {
        let data = &[
            0x00, 0x01, 0x00, 0x00, // version: 1.0
            0x03, 0x70, // default: 880
            0x00, 0x01, // number of metrics: 1
            0x00, 0x05, 0x03, 0x84, // glyph 5: 900
        ];

        let table = decode(data);
        assert!(table.is_complete());
        let table = table.data;
        assert_eq!(table.glyph_y_origin(5), 900);
        assert_eq!(table.glyph_y_origin(6), 880);
    }

    #[test]
    fn truncated_metrics() {
        let data = &[
            0x00, 0x01, 0x00, 0x00, // version: 1.0
            0x03, 0x70, // default: 880
            0x00, 0x02, // number of metrics: 2
            0x00, 0x05, 0x03, 0x84, // glyph 5: 900
        ];

        assert!(decode(data).is_error());
    }
}
