//! An [Embedded Bitmap Location Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/eblc) implementation.

// CBLC is a backward compatible extension of EBLC, so the CBLC decoder
// handles both and only the expected version differs.

use crate::{DecodeResult, Tag};

pub use super::cblc::{BitmapSize, IndexSubtable, Table};

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    super::cblc::decode_versioned(data, Tag::from_bytes(b"EBLC"), 2)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        let data = &[
            0x00, 0x02, 0x00, 0x00, // version: 2.0
            0x00, 0x00, 0x00, 0x00, // number of sizes: 0
        ];

        let table = decode(data);
        assert!(table.is_complete());
        assert!(table.data.sizes.is_empty());
    }

    #[test]
    fn color_version() {
        let data = &[0x00, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert!(decode(data).is_error());
    }
}
