//! A [Metrics Variations Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/mvar) implementation.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{slice_from, FromData, Offset, Offset16, Stream};
use crate::var_store::ItemVariationStoreSummary;
use crate::{DecodeError, DecodeResult, Result, Tag};

const HEADER_SIZE: usize = 12;

/// A value record.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct ValueRecord {
    /// A tag like `hasc` or `xhgt`.
    pub value_tag: Tag,
    pub delta_set_outer_index: u16,
    pub delta_set_inner_index: u16,
}

impl FromData for ValueRecord {
    const SIZE: usize = 8;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(ValueRecord {
            value_tag: s.read::<Tag>().ok()?,
            delta_set_outer_index: s.read::<u16>().ok()?,
            delta_set_inner_index: s.read::<u16>().ok()?,
        })
    }
}


/// A [Metrics Variations Table](https://docs.microsoft.com/en-us/typography/opentype/spec/mvar).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub major_version: u16,
    pub minor_version: u16,
    pub value_record_size: u16,
    pub value_records: Vec<ValueRecord>,
    pub item_variation_store: Option<ItemVariationStoreSummary>,
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
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"MVAR"), version });
    }

    s.skip::<u16>(); // reserved
    let value_record_size = s.read::<u16>()?;
    let value_record_count = s.read::<u16>()?;
    let var_store_offset = s.read::<Option<Offset16>>()?;

    if usize::from(value_record_size) < ValueRecord::SIZE {
        return Err(DecodeError::InvalidValue { what: "MVAR value record size", value: u32::from(value_record_size) });
    }

    let mut value_records = Vec::with_capacity(usize::from(value_record_count));
    let mut s = Stream::new_at(data, HEADER_SIZE)?;
    for index in 0..value_record_count {
        let record = s.read_bytes(usize::from(value_record_size)).and_then(|data| Stream::new(data).read::<ValueRecord>());
        match record {
            Ok(record) => value_records.push(record),
            Err(e) => {
                notes.skipped(&format!("{} of {} value records", value_record_count - index, value_record_count), e);
                break;
            }
        }
    }

    if value_records.windows(2).any(|w| w[0].value_tag >= w[1].value_tag) {
        notes.push("MVAR value records are not sorted by tag");
    }

    let mut item_variation_store = None;
    if let Some(offset) = var_store_offset {
        match slice_from(data, offset.to_usize(), "item variation store").and_then(ItemVariationStoreSummary::parse) {
            Ok(store) => item_variation_store = Some(store),
            Err(e) => notes.skipped("item variation store", e),
        }
    } else if value_record_count != 0 {
        notes.push("MVAR has value records but no item variation store");
    }

    Ok(Table { major_version, minor_version, value_record_size, value_records, item_variation_store })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    #[test]
    fn records() {
        let data = &[
            0x00, 0x01, 0x00, 0x00, // version: 1.0
            0x00, 0x00, // reserved
            0x00, 0x08, // value record size: 8
            0x00, 0x02, // value record count: 2
            0x00, 0x1C, // item variation store offset: 28
            // value record [0]
            0x68, 0x61, 0x73, 0x63, // tag: 'hasc'
            0x00, 0x00, // outer index: 0
            0x00, 0x00, // inner index: 0
            // value record [1]
            0x78, 0x68, 0x67, 0x74, // tag: 'xhgt'
            0x00, 0x00, // outer index: 0
            0x00, 0x01, // inner index: 1

            // item variation store (28)
            0x00, 0x01, // format: 1
            0x00, 0x00, 0x00, 0x08, // region list offset: 8
            0x00, 0x00, // item variation data count: 0
            0x00, 0x00, // axis count: 0
            0x00, 0x00, // region count: 0
        ];

        let table = decode(data);
        assert!(table.is_complete());
        let table = table.data;
        assert_eq!(table.value_records.len(), 2);
        assert_eq!(table.value_records[1].value_tag, Tag::from_bytes(b"xhgt"));
        assert_eq!(table.value_records[1].delta_set_inner_index, 1);
        assert!(table.item_variation_store.is_some());
    }

    #[test]
    fn missing_records() {
        let data = &[
            0x00, 0x01, 0x00, 0x00, // version: 1.0
            0x00, 0x00, // reserved
            0x00, 0x08, // value record size: 8
            0x00, 0x01, // value record count: 1
            0x00, 0x00, // item variation store offset: NULL
        ];

        let table = decode(data);
        assert!(matches!(table.status, Status::Partial(_)));
        assert!(table.data.value_records.is_empty());
    }

    #[test]
    fn small_record_size() {
        let data = &[
            0x00, 0x01, 0x00, 0x00, // version: 1.0
            0x00, 0x00, // reserved
            0x00, 0x04, // value record size: 4
            0x00, 0x00, // value record count: 0
            0x00, 0x00, // item variation store offset: NULL
        ];

        assert!(decode(data).is_error());
    }
}
