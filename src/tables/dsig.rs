//! A [Digital Signature Table](https://docs.microsoft.com/en-us/typography/opentype/spec/dsig)
//! implementation.
//!
//! Signature blocks are located, not verified.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{FromData, Stream};
use crate::{DecodeError, DecodeResult, Result, Tag};

/// A signature record.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct SignatureRecord {
    pub format: u32,
    pub length: u32,
    pub offset: u32,
}

impl FromData for SignatureRecord {
    const SIZE: usize = 12;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(SignatureRecord {
            format: s.read::<u32>().ok()?,
            length: s.read::<u32>().ok()?,
            offset: s.read::<u32>().ok()?,
        })
    }
}


/// A [Digital Signature Table](https://docs.microsoft.com/en-us/typography/opentype/spec/dsig).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub version: u32,
    /// Bit 0 prohibits resigning.
    pub flags: u16,
    pub signatures: Vec<SignatureRecord>,
}

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, &mut notes);
    notes.finish(table)
}

fn parse(data: &[u8], notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);
    let version = s.read::<u32>()?;
    if version != 1 {
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"DSIG"), version });
    }

    let count = s.read::<u16>()?;
    let flags = s.read::<u16>()?;
    let signatures = s.read_vec::<SignatureRecord>(count)?;

    for (index, record) in signatures.iter().enumerate() {
        let end = u64::from(record.offset) + u64::from(record.length);
        if end > data.len() as u64 {
            notes.push(format!("signature {} is outside of the table", index));
        }
    }

    Ok(Table { version, flags, signatures })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    #[test]
    fn empty_signature() {
        // A placeholder DSIG that many fonts ship.
        let data = &[
            0x00, 0x00, 0x00, 0x01, // version: 1
            0x00, 0x00, // number of signatures: 0
            0x00, 0x01, // flags: cannot be resigned
        ];

        let table = decode(data);
        assert!(table.is_complete());
        assert_eq!(table.data.flags, 1);
        assert!(table.data.signatures.is_empty());
    }

    #[test]
    fn signature_past_end() {
        let data = &[
            0x00, 0x00, 0x00, 0x01, // version: 1
            0x00, 0x01, // number of signatures: 1
            0x00, 0x00, // flags: 0
            0x00, 0x00, 0x00, 0x01, // format: 1
            0x00, 0x00, 0x00, 0x10, // length: 16
            0x00, 0x00, 0x00, 0x14, // offset: 20
        ];

        let table = decode(data);
        assert!(matches!(table.status, Status::Partial(_)));
        assert_eq!(table.data.signatures.len(), 1);
    }
}
