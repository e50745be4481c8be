// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-14-unicode-variation-sequences

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{slice_from, FromData, Offset, Offset32, Stream, U24};
use crate::Result;

#[derive(Clone, Copy)]
struct VariationSelectorRecord {
    var_selector: u32,
    default_uvs_offset: Option<Offset32>,
    non_default_uvs_offset: Option<Offset32>,
}

impl FromData for VariationSelectorRecord {
    const SIZE: usize = 11;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(VariationSelectorRecord {
            var_selector: s.read::<U24>().ok()?.0,
            default_uvs_offset: s.read::<Option<Offset32>>().ok()?,
            non_default_uvs_offset: s.read::<Option<Offset32>>().ok()?,
        })
    }
}

/// A single variation selector.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct VariationSelector {
    pub var_selector: u32,
    /// Unicode ranges that use the default glyph.
    pub default_ranges: u32,
    /// Sequences mapped to a specific glyph.
    pub non_default_mappings: u32,
}

/// A format 14 summary.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct VariationSequences {
    pub selectors: Vec<VariationSelector>,
}

pub fn summarize(data: &[u8], notes: &mut Notes) -> Result<VariationSequences> {
    let mut s = Stream::new(data);
    s.skip::<u16>(); // format
    s.skip::<u32>(); // length
    let count = s.read::<u32>()?;
    let records = s.read_bytes((count as usize).saturating_mul(VariationSelectorRecord::SIZE))?;

    let mut selectors = Vec::new();
    for chunk in records.chunks_exact(VariationSelectorRecord::SIZE) {
        let record = match VariationSelectorRecord::parse(chunk) {
            Some(v) => v,
            None => continue,
        };

        let mut selector = VariationSelector { var_selector: record.var_selector, ..VariationSelector::default() };
        // Both tables start with a u32 count.
        if let Some(offset) = record.default_uvs_offset {
            match read_count(data, offset) {
                Ok(n) => selector.default_ranges = n,
                Err(e) => notes.skipped("cmap default UVS table", e),
            }
        }

        if let Some(offset) = record.non_default_uvs_offset {
            match read_count(data, offset) {
                Ok(n) => selector.non_default_mappings = n,
                Err(e) => notes.skipped("cmap non-default UVS table", e),
            }
        }

        selectors.push(selector);
    }

    Ok(VariationSequences { selectors })
}

fn read_count(data: &[u8], offset: Offset32) -> Result<u32> {
    Stream::new(slice_from(data, offset.to_usize(), "UVS table")?).read::<u32>()
}
