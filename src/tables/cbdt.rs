//! A [Color Bitmap Data Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/cbdt) implementation.
//!
//! Glyph images are addressed through `CBLC`, so only the header is decoded here.
//! Also used for `EBDT`.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::Stream;
use crate::{DecodeError, DecodeResult, Result, Tag};

/// A [Color Bitmap Data Table](
/// https://docs.microsoft.com/en-us/typography/opentype/spec/cbdt) header.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub major_version: u16,
    pub minor_version: u16,
    /// Image data size in bytes, header excluded.
    pub data_size: u32,
}

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    decode_versioned(data, Tag::from_bytes(b"CBDT"), 3)
}

/// Decodes a table with the given major version.
pub(crate) fn decode_versioned(data: &[u8], tag: Tag, major_version: u16) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, tag, major_version, &mut notes);
    notes.finish(table)
}

fn parse(data: &[u8], tag: Tag, expected_major: u16, notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);
    let major_version = s.read::<u16>()?;
    let minor_version = s.read::<u16>()?;
    if major_version == 2 && expected_major == 3 {
        notes.push(format!("{} declares the EBDT version 2.0", tag));
    } else if major_version != expected_major {
        let version = u32::from(major_version) << 16 | u32::from(minor_version);
        return Err(DecodeError::UnsupportedVersion { table: tag, version });
    }

    Ok(Table { major_version, minor_version, data_size: s.remaining() as u32 })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    #[test]
    fn header() {
        let data = &[0x00, 0x03, 0x00, 0x00, 0x89, 0x50, 0x4E, 0x47];
        let table = decode(data);
        assert!(table.is_complete());
        assert_eq!(table.data, Table { major_version: 3, minor_version: 0, data_size: 4 });
    }

    #[test]
    fn legacy_version() {
        let table = decode(&[0x00, 0x02, 0x00, 0x00]);
        assert!(matches!(table.status, Status::Partial(_)));
        assert_eq!(table.data.major_version, 2);
    }

    #[test]
    fn truncated() {
        assert!(decode(&[0x00, 0x03]).is_error());
    }
}
