//! A [Color Table](https://docs.microsoft.com/en-us/typography/opentype/spec/colr)
//! implementation.
//!
//! Paint graphs are counted, never traversed.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{slice_from, Offset, Offset32, Stream};
use crate::var_store::{DeltaSetIndexMapSummary, ItemVariationStoreSummary};
use crate::{DecodeError, DecodeResult, Result, Tag};

const BASE_GLYPH_RECORD_SIZE: usize = 6;
const LAYER_RECORD_SIZE: usize = 4;

/// Version 1 list sizes.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct PaintLists {
    /// The number of BaseGlyphPaintRecords.
    pub base_glyph_paint_count: u32,
    /// The number of paints in the LayerList.
    pub layer_paint_count: u32,
    pub clip_count: Option<u32>,
    pub var_index_map: Option<DeltaSetIndexMapSummary>,
    pub item_variation_store: Option<ItemVariationStoreSummary>,
}

/// A [Color Table](https://docs.microsoft.com/en-us/typography/opentype/spec/colr).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub version: u16,
    pub base_glyph_count: u16,
    pub layer_count: u16,
    /// Version 1+.
    pub paint_lists: Option<PaintLists>,
}

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, &mut notes);
    notes.finish(table)
}

fn parse(data: &[u8], notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);
    let version = s.read::<u16>()?;
    if version > 1 {
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"COLR"), version: u32::from(version) });
    }

    let base_glyph_count = s.read::<u16>()?;
    let base_glyphs_offset = s.read::<Offset32>()?;
    let layers_offset = s.read::<Offset32>()?;
    let layer_count = s.read::<u16>()?;

    let base_glyphs_len = usize::from(base_glyph_count) * BASE_GLYPH_RECORD_SIZE;
    if let Err(e) = Stream::new_at(data, base_glyphs_offset.to_usize()).and_then(|mut s| s.read_bytes(base_glyphs_len)) {
        notes.skipped("base glyph records", e);
    }

    let layers_len = usize::from(layer_count) * LAYER_RECORD_SIZE;
    if let Err(e) = Stream::new_at(data, layers_offset.to_usize()).and_then(|mut s| s.read_bytes(layers_len)) {
        notes.skipped("layer records", e);
    }

    let mut table = Table { version, base_glyph_count, layer_count, paint_lists: None };
    if version == 0 {
        return Ok(table);
    }

    let base_glyph_list = s.read::<Option<Offset32>>()?;
    let layer_list = s.read::<Option<Offset32>>()?;
    let clip_list = s.read::<Option<Offset32>>()?;
    let var_index_map = s.read::<Option<Offset32>>()?;
    let var_store = s.read::<Option<Offset32>>()?;

    let mut lists = PaintLists::default();
    match list_count(data, base_glyph_list, "base glyph list") {
        Ok(count) => lists.base_glyph_paint_count = count,
        Err(e) => notes.skipped("base glyph list", e),
    }

    match list_count(data, layer_list, "layer list") {
        Ok(count) => lists.layer_paint_count = count,
        Err(e) => notes.skipped("layer list", e),
    }

    if let Some(offset) = clip_list {
        let count = slice_from(data, offset.to_usize(), "clip list").and_then(|data| {
            let mut s = Stream::new(data);
            let format = s.read::<u8>()?;
            if format != 1 {
                return Err(DecodeError::InvalidValue { what: "clip list format", value: u32::from(format) });
            }
            s.read::<u32>()
        });

        match count {
            Ok(count) => lists.clip_count = Some(count),
            Err(e) => notes.skipped("clip list", e),
        }
    }

    match DeltaSetIndexMapSummary::parse_at(data, var_index_map) {
        Ok(v) => lists.var_index_map = v,
        Err(e) => notes.skipped("variation index map", e),
    }

    match ItemVariationStoreSummary::parse_at(data, var_store) {
        Ok(v) => lists.item_variation_store = v,
        Err(e) => notes.skipped("item variation store", e),
    }

    table.paint_lists = Some(lists);
    Ok(table)
}

fn list_count(data: &[u8], offset: Option<Offset32>, what: &'static str) -> Result<u32> {
    match offset {
        Some(offset) => Stream::read_at::<u32>(slice_from(data, offset.to_usize(), what)?, 0),
        None => Ok(0),
    }
}
