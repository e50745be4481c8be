//! A [Vertical Metrics Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/vmtx) implementation.

use crate::DecodeResult;

pub use super::hmtx::Table;

/// Decodes a table.
///
/// `number_of_metrics` comes from `vhea` and `number_of_glyphs` from `maxp`.
pub fn decode(data: &[u8], number_of_metrics: u16, number_of_glyphs: u16) -> DecodeResult<Table> {
    super::hmtx::decode(data, number_of_metrics, number_of_glyphs)
}
