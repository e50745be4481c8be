//! An [Embedded Bitmap Data Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/ebdt) implementation.

// CBDT is a backward compatible extension of EBDT.

use crate::{DecodeResult, Tag};

pub use super::cbdt::Table;

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    super::cbdt::decode_versioned(data, Tag::from_bytes(b"EBDT"), 2)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header() {
        let table = decode(&[0x00, 0x02, 0x00, 0x00]);
        assert!(table.is_complete());
        assert_eq!(table.data.data_size, 0);
    }

    #[test]
    fn color_version() {
        assert!(decode(&[0x00, 0x03, 0x00, 0x00]).is_error());
    }
}
