//! [Horizontal](https://docs.microsoft.com/en-us/typography/opentype/spec/hvar) and
//! [Vertical](https://docs.microsoft.com/en-us/typography/opentype/spec/vvar)
//! Metrics Variations Table implementations.
//!
//! Both tables share a layout. `VVAR` adds a vertical origin mapping.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{Offset32, Stream};
use crate::var_store::{DeltaSetIndexMapSummary, ItemVariationStoreSummary};
use crate::{DecodeError, DecodeResult, Result, Tag};

/// A metrics variations table.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub major_version: u16,
    pub minor_version: u16,
    pub item_variation_store: ItemVariationStoreSummary,
    /// Advance width or height mapping.
    pub advance_mapping: Option<DeltaSetIndexMapSummary>,
    /// Left or top side bearing mapping.
    pub start_side_mapping: Option<DeltaSetIndexMapSummary>,
    /// Right or bottom side bearing mapping.
    pub end_side_mapping: Option<DeltaSetIndexMapSummary>,
    /// `VVAR` only.
    pub vertical_origin_mapping: Option<DeltaSetIndexMapSummary>,
}

/// Decodes an `HVAR` table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, Tag::from_bytes(b"HVAR"), &mut notes);
    notes.finish(table)
}

pub(crate) fn decode_vertical(data: &[u8]) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, Tag::from_bytes(b"VVAR"), &mut notes);
    notes.finish(table)
}

fn parse(data: &[u8], tag: Tag, notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);
    let major_version = s.read::<u16>()?;
    let minor_version = s.read::<u16>()?;
    if major_version != 1 {
        let version = u32::from(major_version) << 16 | u32::from(minor_version);
        return Err(DecodeError::UnsupportedVersion { table: tag, version });
    }

    let var_store_offset = s.read::<Offset32>()?;
    let advance_offset = s.read::<Option<Offset32>>()?;
    let start_offset = s.read::<Option<Offset32>>()?;
    let end_offset = s.read::<Option<Offset32>>()?;
    let vorg_offset = if tag == Tag::from_bytes(b"VVAR") {
        s.read::<Option<Offset32>>()?
    } else {
        None
    };

    // The store is the only mandatory part.
    let item_variation_store = ItemVariationStoreSummary::parse_at(data, Some(var_store_offset))?.unwrap_or_default();

    let mut map = |offset: Option<Offset32>, what: &str| match DeltaSetIndexMapSummary::parse_at(data, offset) {
        Ok(v) => v,
        Err(e) => {
            notes.skipped(what, e);
            None
        }
    };

    Ok(Table {
        major_version,
        minor_version,
        item_variation_store,
        advance_mapping: map(advance_offset, "advance mapping"),
        start_side_mapping: map(start_offset, "start side bearing mapping"),
        end_side_mapping: map(end_offset, "end side bearing mapping"),
        vertical_origin_mapping: map(vorg_offset, "vertical origin mapping"),
    })
}
