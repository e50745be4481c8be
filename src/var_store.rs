//! Shape summaries of [Item Variation Store](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats#item-variation-store)
//! and delta-set index maps.
//!
//! Only the shape is decoded. Deltas are never read.

use serde::Serialize;

use crate::parser::{slice_from, Offset, Offset32, Stream};
use crate::{DecodeError, Result};

/// A summary of a single ItemVariationData subtable.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct ItemVariationDataSummary {
    pub item_count: u16,
    /// The number of deltas stored as 16-bit (or 32-bit with the long-words flag).
    pub word_delta_count: u16,
    pub long_words: bool,
    pub region_index_count: u16,
}

/// A summary of an ItemVariationStore.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct ItemVariationStoreSummary {
    pub format: u16,
    pub region_axis_count: u16,
    pub region_count: u16,
    pub item_variation_data_count: u16,
    pub item_variation_data: Vec<ItemVariationDataSummary>,
}

impl ItemVariationStoreSummary {
    /// Parses a store that starts at the beginning of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let format = s.read::<u16>()?;
        if format != 1 {
            return Err(DecodeError::InvalidValue { what: "item variation store format", value: u32::from(format) });
        }

        let region_list_offset = s.read::<Offset32>()?;
        let item_variation_data_count = s.read::<u16>()?;
        let offsets = s.read_array16::<Offset32>(item_variation_data_count)?;

        let mut regions = Stream::new(slice_from(data, region_list_offset.to_usize(), "variation region list")?);
        let region_axis_count = regions.read::<u16>()?;
        let region_count = regions.read::<u16>()?;

        let mut item_variation_data = Vec::with_capacity(usize::from(item_variation_data_count));
        for offset in offsets {
            let mut s = Stream::new(slice_from(data, offset.to_usize(), "item variation data")?);
            let item_count = s.read::<u16>()?;
            let word_delta_count = s.read::<u16>()?;
            let region_index_count = s.read::<u16>()?;
            item_variation_data.push(ItemVariationDataSummary {
                item_count,
                word_delta_count: word_delta_count & 0x7FFF,
                long_words: word_delta_count & 0x8000 != 0,
                region_index_count,
            });
        }

        Ok(ItemVariationStoreSummary {
            format,
            region_axis_count,
            region_count,
            item_variation_data_count,
            item_variation_data,
        })
    }

    /// Parses a store at an offset. A null offset is not a store.
    pub fn parse_at(data: &[u8], offset: Option<Offset32>) -> Result<Option<Self>> {
        match offset {
            Some(offset) => Self::parse(slice_from(data, offset.to_usize(), "item variation store")?).map(Some),
            None => Ok(None),
        }
    }
}


/// A summary of a [DeltaSetIndexMap](
/// https://docs.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats#associating-target-items-to-variation-data).
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct DeltaSetIndexMapSummary {
    pub format: u8,
    /// The size of a single map entry in bytes.
    pub entry_size: u8,
    pub inner_index_bit_count: u8,
    pub map_count: u32,
}

impl DeltaSetIndexMapSummary {
    /// Parses a map summary. The entry data must be present.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let format = s.read::<u8>()?;
        let entry_format = s.read::<u8>()?;
        let map_count = match format {
            0 => u32::from(s.read::<u16>()?),
            1 => s.read::<u32>()?,
            _ => return Err(DecodeError::InvalidValue { what: "delta-set index map format", value: u32::from(format) }),
        };

        let entry_size = ((entry_format >> 4) & 3) + 1;
        let inner_index_bit_count = (entry_format & 0xF) + 1;

        let len = (map_count as usize).saturating_mul(usize::from(entry_size));
        s.read_bytes(len)?;

        Ok(DeltaSetIndexMapSummary { format, entry_size, inner_index_bit_count, map_count })
    }

    /// Parses a map at an offset. A null offset is not a map.
    pub fn parse_at(data: &[u8], offset: Option<Offset32>) -> Result<Option<Self>> {
        match offset {
            Some(offset) => Self::parse(slice_from(data, offset.to_usize(), "delta-set index map")?).map(Some),
            None => Ok(None),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_shape() {
        let data = &[
            0x00, 0x01, // format: 1
            0x00, 0x00, 0x00, 0x0C, // region list offset: 12
            0x00, 0x01, // item variation data count: 1
            0x00, 0x00, 0x00, 0x1C, // item variation data [0] at 28

            // region list (12)
            0x00, 0x01, // axis count: 1
            0x00, 0x02, // region count: 2
            0xC0, 0x00, 0xC0, 0x00, 0x00, 0x00, // region [0]
            0x00, 0x00, 0x40, 0x00, 0x40, 0x00, // region [1]

            // item variation data (28)
            0x00, 0x03, // item count: 3
            0x80, 0x01, // word delta count: 1, long words
            0x00, 0x02, // region index count: 2
        ];

        let store = ItemVariationStoreSummary::parse(data).unwrap();
        assert_eq!(store.region_axis_count, 1);
        assert_eq!(store.region_count, 2);
        assert_eq!(store.item_variation_data_count, 1);
        assert_eq!(store.item_variation_data[0], ItemVariationDataSummary {
            item_count: 3,
            word_delta_count: 1,
            long_words: true,
            region_index_count: 2,
        });
    }

    #[test]
    fn bad_region_list() {
        let data = &[
            0x00, 0x01, // format: 1
            0x00, 0x00, 0x01, 0x00, // region list offset: 256
            0x00, 0x00, // item variation data count: 0
        ];
        assert!(ItemVariationStoreSummary::parse(data).is_err());
    }

    #[test]
    fn index_map() {
        let data = &[
            0x00, // format: 0
            0x13, // entry format: 2 bytes, 4 inner bits
            0x00, 0x02, // map count: 2
            0x00, 0x01, 0x00, 0x12, // entries
        ];
        let map = DeltaSetIndexMapSummary::parse(data).unwrap();
        assert_eq!(map.entry_size, 2);
        assert_eq!(map.inner_index_bit_count, 4);
        assert_eq!(map.map_count, 2);
        assert!(DeltaSetIndexMapSummary::parse(&data[..6]).is_err());
    }
}
