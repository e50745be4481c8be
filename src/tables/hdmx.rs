//! A [Horizontal Device Metrics Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/hdmx) implementation.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::Stream;
use crate::{DecodeError, DecodeResult, Font, Result, Tag};

/// A device record summary.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct DeviceRecord {
    pub pixel_size: u8,
    pub max_width: u8,
}

/// A [Horizontal Device Metrics Table](https://docs.microsoft.com/en-us/typography/opentype/spec/hdmx).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub version: u16,
    pub record_size: u32,
    pub records: Vec<DeviceRecord>,
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
    let number_of_glyphs = font
        .required_table(Tag::from_bytes(b"maxp"))
        .and_then(|data| super::maxp::parse(data, &mut Notes::new()));

    match number_of_glyphs {
        Ok(maxp) => decode(data, maxp.number_of_glyphs),
        Err(e) => DecodeResult::error(Table::default(), &e),
    }
}

fn parse(data: &[u8], number_of_glyphs: u16, notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);
    let version = s.read::<u16>()?;
    if version != 0 {
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"hdmx"), version: u32::from(version) });
    }

    let count = s.read::<i16>()?;
    let record_size = s.read::<i32>()?;
    if count < 0 {
        return Err(DecodeError::InvalidValue { what: "hdmx record count", value: count as u32 });
    }

    // A record is `pixelSize`, `maxWidth` and a width per glyph, padded to 32 bits.
    let min_size = usize::from(number_of_glyphs) + 2;
    let record_size = u32::try_from(record_size)
        .ok()
        .filter(|n| *n as usize >= min_size)
        .ok_or(DecodeError::InvalidValue { what: "hdmx record size", value: record_size as u32 })?;

    let mut records = Vec::with_capacity(count as usize);
    for index in 0..count {
        match s.read_bytes(record_size as usize) {
            Ok(record) => records.push(DeviceRecord { pixel_size: record[0], max_width: record[1] }),
            Err(e) => {
                notes.skipped(&format!("{} of {} device records", count - index, count), e);
                break;
            }
        }
    }

    if records.windows(2).any(|w| w[0].pixel_size >= w[1].pixel_size) {
        notes.push("hdmx records are not sorted by pixel size");
    }

    Ok(Table { version, record_size, records })
}
