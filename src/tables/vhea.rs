//! A [Vertical Header Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/vhea) implementation.

use crate::{DecodeResult, Tag};

pub use super::hhea::Table;

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    super::hhea::decode_with_tag(data, Tag::from_bytes(b"vhea"))
}
