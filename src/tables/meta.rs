//! A [Metadata Table](https://docs.microsoft.com/en-us/typography/opentype/spec/meta)
//! implementation.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{FromData, Stream};
use crate::{DecodeError, DecodeResult, Result, Tag};

const DESIGN_LANGUAGES: Tag = Tag::from_bytes(b"dlng");
const SUPPORTED_LANGUAGES: Tag = Tag::from_bytes(b"slng");

#[derive(Clone, Copy)]
struct DataMapRecord {
    tag: Tag,
    offset: u32,
    length: u32,
}

impl FromData for DataMapRecord {
    const SIZE: usize = 12;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(DataMapRecord {
            tag: s.read::<Tag>().ok()?,
            offset: s.read::<u32>().ok()?,
            length: s.read::<u32>().ok()?,
        })
    }
}


/// A data map.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct DataMap {
    pub tag: Tag,
    pub length: u32,
    /// Text of the `dlng` and `slng` maps. Other maps are opaque.
    pub text: Option<String>,
}

/// A [Metadata Table](https://docs.microsoft.com/en-us/typography/opentype/spec/meta).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub version: u32,
    pub flags: u32,
    pub data_maps: Vec<DataMap>,
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
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"meta"), version });
    }

    let flags = s.read::<u32>()?;
    s.skip::<u32>(); // reserved
    let count = s.read::<u32>()?;

    let records = s.read_bytes((count as usize).saturating_mul(DataMapRecord::SIZE))?;
    let mut data_maps = Vec::with_capacity(count as usize);
    for record in records.chunks_exact(DataMapRecord::SIZE).filter_map(DataMapRecord::parse) {
        let start = record.offset as usize;
        let bytes = data.get(start..start.saturating_add(record.length as usize));
        if bytes.is_none() {
            notes.push(format!("{} data map is outside of the table", record.tag));
        }

        let text = match (record.tag, bytes) {
            (DESIGN_LANGUAGES | SUPPORTED_LANGUAGES, Some(bytes)) => {
                // 'The data is UTF-8 encoded text. No null termination.'
                Some(String::from_utf8_lossy(bytes).into_owned())
            }
            _ => None,
        };

        data_maps.push(DataMap { tag: record.tag, length: record.length, text });
    }

    Ok(Table { version, flags, data_maps })
}
