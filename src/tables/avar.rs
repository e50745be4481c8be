//! An [Axis Variations Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/avar) implementation.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{F2Dot14, FromData, Offset32, Stream};
use crate::var_store::{DeltaSetIndexMapSummary, ItemVariationStoreSummary};
use crate::{DecodeError, DecodeResult, Result, Tag};

/// An axis value map.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct AxisValueMap {
    /// A normalized coordinate value obtained using default normalization.
    pub from_coordinate: F2Dot14,
    /// The modified, normalized coordinate value.
    pub to_coordinate: F2Dot14,
}

impl FromData for AxisValueMap {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(AxisValueMap {
            from_coordinate: s.read::<F2Dot14>().ok()?,
            to_coordinate: s.read::<F2Dot14>().ok()?,
        })
    }
}


/// A segment map for a single axis.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct SegmentMap {
    /// Taken from `fvar` when available.
    pub axis_tag: Option<Tag>,
    pub maps: Vec<AxisValueMap>,
    /// Maps `-1`, `0` and `1` onto themselves.
    pub has_required_maps: bool,
}

/// An [Axis Variations Table](https://docs.microsoft.com/en-us/typography/opentype/spec/avar).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub major_version: u16,
    pub minor_version: u16,
    pub segment_maps: Vec<SegmentMap>,
    /// Version 2.0+.
    pub axis_index_map: Option<DeltaSetIndexMapSummary>,
    /// Version 2.0+.
    pub item_variation_store: Option<ItemVariationStoreSummary>,
}

/// Decodes a table.
///
/// `axis_tags` come from `fvar` and are assigned to segment maps in order.
pub fn decode(data: &[u8], axis_tags: Option<&[Tag]>) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, axis_tags, &mut notes);
    notes.finish(table)
}

fn parse(data: &[u8], axis_tags: Option<&[Tag]>, notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);
    let major_version = s.read::<u16>()?;
    let minor_version = s.read::<u16>()?;
    if major_version != 1 && major_version != 2 {
        let version = u32::from(major_version) << 16 | u32::from(minor_version);
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"avar"), version });
    }

    s.skip::<u16>(); // reserved
    let axis_count = s.read::<u16>()?;

    if let Some(tags) = axis_tags {
        if tags.len() != usize::from(axis_count) {
            notes.push(format!("avar has {} axes, fvar has {}", axis_count, tags.len()));
        }
    }

    let mut segment_maps = Vec::with_capacity(usize::from(axis_count));
    for index in 0..axis_count {
        let maps = s.read::<u16>().and_then(|count| s.read_vec::<AxisValueMap>(count));
        let maps = match maps {
            Ok(v) => v,
            Err(e) => {
                notes.skipped(&format!("{} of {} segment maps", axis_count - index, axis_count), e);
                break;
            }
        };

        if maps.windows(2).any(|w| w[0].from_coordinate > w[1].from_coordinate) {
            notes.push(format!("segment map {} is not sorted", index));
        }

        segment_maps.push(SegmentMap {
            axis_tag: axis_tags.and_then(|tags| tags.get(usize::from(index)).copied()),
            has_required_maps: has_required_maps(&maps),
            maps,
        });
    }

    let mut table = Table { major_version, minor_version, segment_maps, ..Table::default() };

    if major_version == 2 {
        let offsets = s.read::<Option<Offset32>>().and_then(|a| Ok((a, s.read::<Option<Offset32>>()?)));
        match offsets {
            Ok((axis_index_map, var_store)) => {
                match DeltaSetIndexMapSummary::parse_at(data, axis_index_map) {
                    Ok(v) => table.axis_index_map = v,
                    Err(e) => notes.skipped("axis index map", e),
                }

                match ItemVariationStoreSummary::parse_at(data, var_store) {
                    Ok(v) => table.item_variation_store = v,
                    Err(e) => notes.skipped("item variation store", e),
                }
            }
            Err(e) => notes.skipped("avar 2 offsets", e),
        }
    }

    Ok(table)
}

fn has_required_maps(maps: &[AxisValueMap]) -> bool {
    [-0x4000, 0, 0x4000].iter().all(|n| {
        let n = F2Dot14(*n);
        maps.iter().any(|m| m.from_coordinate == n && m.to_coordinate == n)
    })
}
