//! A [Grid-fitting and Scan-conversion Procedure Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/gasp) implementation.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{FromData, Stream};
use crate::{DecodeError, DecodeResult, Result, Tag};

/// `rangeGaspBehavior` bits.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Behavior {
    pub gridfit: bool,
    pub do_gray: bool,
    /// Version 1 only.
    pub symmetric_gridfit: bool,
    /// Version 1 only.
    pub symmetric_smoothing: bool,
}

impl Behavior {
    /// Decodes flags.
    pub fn decode(n: u16) -> Self {
        Behavior {
            gridfit: n & 0x0001 != 0,
            do_gray: n & 0x0002 != 0,
            symmetric_gridfit: n & 0x0004 != 0,
            symmetric_smoothing: n & 0x0008 != 0,
        }
    }

    /// Encodes flags back.
    pub fn encode(&self) -> u16 {
        u16::from(self.gridfit)
            | u16::from(self.do_gray) << 1
            | u16::from(self.symmetric_gridfit) << 2
            | u16::from(self.symmetric_smoothing) << 3
    }
}


/// A size range.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct Range {
    /// Upper limit of the range, in PPEM.
    pub max_ppem: u16,
    pub behavior: Behavior,
}

impl FromData for Range {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(Range {
            max_ppem: s.read::<u16>().ok()?,
            behavior: Behavior::decode(s.read::<u16>().ok()?),
        })
    }
}


/// A [Grid-fitting and Scan-conversion Procedure Table](
/// https://docs.microsoft.com/en-us/typography/opentype/spec/gasp).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub version: u16,
    pub ranges: Vec<Range>,
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
    if version > 1 {
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"gasp"), version: u32::from(version) });
    }

    let count = s.read::<u16>()?;
    let ranges = s.read_vec::<Range>(count)?;

    if ranges.windows(2).any(|w| w[0].max_ppem >= w[1].max_ppem) {
        notes.push("gasp ranges are not sorted");
    }

    // 'The last record must have 0xFFFF as rangeMaxPPEM.'
    if ranges.last().map_or(false, |r| r.max_ppem != 0xFFFF) {
        notes.push("the last gasp range does not end at 0xFFFF");
    }

    Ok(Table { version, ranges })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    #[test]
    fn version_1() {
        let data = &[
            0x00, 0x01, // version: 1
            0x00, 0x02, // number of ranges: 2
            0x00, 0x08, 0x00, 0x02, // <= 8: gray
            0xFF, 0xFF, 0x00, 0x0F, // rest: everything
        ];

        let table = decode(data);
        assert!(table.is_complete());
        let table = table.data;
        assert_eq!(table.ranges.len(), 2);
        assert!(table.ranges[0].behavior.do_gray);
        assert!(!table.ranges[0].behavior.gridfit);
        assert_eq!(table.ranges[1].behavior.encode(), 0x0F);
    }

    #[test]
    fn unterminated() {
        let data = &[
            0x00, 0x00, // version: 0
            0x00, 0x01, // number of ranges: 1
            0x00, 0x08, 0x00, 0x02, // <= 8: gray
        ];

        assert!(matches!(decode(data).status, Status::Partial(_)));
    }
}
