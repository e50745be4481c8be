//! A [Control Value Table](https://docs.microsoft.com/en-us/typography/opentype/spec/cvt)
//! implementation.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{FromData, Stream};
use crate::{DecodeResult, Result};

/// A [Control Value Table](https://docs.microsoft.com/en-us/typography/opentype/spec/cvt) summary.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub value_count: u32,
    pub min_value: Option<i16>,
    pub max_value: Option<i16>,
}

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, &mut notes);
    notes.finish(table)
}

fn parse(data: &[u8], notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);
    let values = s.read_bytes(data.len() / i16::SIZE * i16::SIZE)?;
    if !s.at_end() {
        notes.push("cvt length is odd");
    }

    let mut table = Table::default();
    for value in values.chunks_exact(i16::SIZE).filter_map(i16::parse) {
        table.value_count += 1;
        table.min_value = Some(table.min_value.map_or(value, |n| n.min(value)));
        table.max_value = Some(table.max_value.map_or(value, |n| n.max(value)));
    }

    Ok(table)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    #[test]
    fn values() {
        let data = &[
            0x00, 0x0A, // 10
            0xFF, 0x38, // -200
            0x02, 0xBC, // 700
        ];

        let table = decode(data);
        assert!(table.is_complete());
        assert_eq!(table.data, Table { value_count: 3, min_value: Some(-200), max_value: Some(700) });
    }

    #[test]
    fn odd_length() {
        let table = decode(&[0x00, 0x0A, 0x00]);
        assert!(matches!(table.status, Status::Partial(_)));
        assert_eq!(table.data.value_count, 1);
    }
}
