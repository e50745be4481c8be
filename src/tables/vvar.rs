//! A [Vertical Metrics Variations Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/vvar) implementation.

use crate::DecodeResult;

pub use super::hvar::Table;

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    super::hvar::decode_vertical(data)
}
