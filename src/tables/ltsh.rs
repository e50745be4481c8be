//! A [Linear Threshold Table](https://docs.microsoft.com/en-us/typography/opentype/spec/ltsh)
//! implementation.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::Stream;
use crate::{DecodeError, DecodeResult, Result, Tag};

/// A [Linear Threshold Table](https://docs.microsoft.com/en-us/typography/opentype/spec/ltsh) summary.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub version: u16,
    pub glyph_count: u16,
    /// Glyphs that scale linearly at any size (`yPel` is 1).
    pub linear_glyph_count: u16,
    pub max_y_pel: u8,
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
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"LTSH"), version: u32::from(version) });
    }

    let glyph_count = s.read::<u16>()?;
    let mut table = Table { version, glyph_count, ..Table::default() };
    let y_pels = match s.read_bytes(usize::from(glyph_count)) {
        Ok(v) => v,
        Err(e) => {
            notes.skipped("yPels", e);
            s.tail()
        }
    };

    for y_pel in y_pels {
        if *y_pel == 1 {
            table.linear_glyph_count += 1;
        }
        table.max_y_pel = table.max_y_pel.max(*y_pel);
    }

    Ok(table)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    #[test]
    fn thresholds() {
        let data = &[
            0x00, 0x00, // version: 0
            0x00, 0x03, // number of glyphs: 3
            0x01, 0x0C, 0x01, // yPels
        ];

        let table = decode(data);
        assert!(table.is_complete());
        assert_eq!(table.data, Table { version: 0, glyph_count: 3, linear_glyph_count: 2, max_y_pel: 12 });
    }

    #[test]
    fn truncated() {
        let table = decode(&[0x00, 0x00, 0x00, 0x03, 0x01]);
        assert!(matches!(table.status, Status::Partial(_)));
        assert_eq!(table.data.linear_glyph_count, 1);
    }
}
