//! A [Font Program](https://docs.microsoft.com/en-us/typography/opentype/spec/fpgm) implementation.

use crate::DecodeResult;

pub use super::prep::Table;

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    super::prep::decode(data)
}
