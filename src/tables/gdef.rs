//! A [Glyph Definition Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/gdef) implementation.

use serde::Serialize;

use crate::decode::Notes;
use crate::ggg::ClassMap;
use crate::parser::{slice_from, FromData, Offset, Offset16, Offset32, Stream};
use crate::var_store::ItemVariationStoreSummary;
use crate::{DecodeError, DecodeResult, Result, Tag};

/// Glyph counts per [glyph class](
/// https://docs.microsoft.com/en-us/typography/opentype/spec/gdef#glyph-class-definition-table).
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct GlyphClassCounts {
    pub base: usize,
    pub ligature: usize,
    pub mark: usize,
    pub component: usize,
    /// Glyphs assigned to an undefined class.
    pub other: usize,
}

impl GlyphClassCounts {
    fn from_class_map(classes: &ClassMap) -> Self {
        let mut counts = GlyphClassCounts::default();
        for (class, count) in classes.class_counts() {
            match class {
                0 => {}
                1 => counts.base += count,
                2 => counts.ligature += count,
                3 => counts.mark += count,
                4 => counts.component += count,
                _ => counts.other += count,
            }
        }
        counts
    }
}


/// A ligature caret list summary.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct LigatureCarets {
    pub ligature_count: u16,
    /// The total number of caret values.
    pub caret_count: u32,
}


/// A [Glyph Definition Table](https://docs.microsoft.com/en-us/typography/opentype/spec/gdef).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub major_version: u16,
    pub minor_version: u16,
    pub glyph_classes: Option<GlyphClassCounts>,
    pub has_attach_list: bool,
    pub ligature_carets: Option<LigatureCarets>,
    pub has_mark_attach_class_def: bool,
    /// The number of distinct mark attachment classes.
    pub mark_attach_class_count: usize,
    /// The number of mark glyph sets. Version 1.2+.
    pub mark_glyph_set_count: Option<u16>,
    /// Version 1.3+.
    pub item_variation_store: Option<ItemVariationStoreSummary>,
}

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, &mut notes);
    notes.finish(table)
}

fn parse(data: &[u8], notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);
    let major_version = s.read::<u16>()?;
    let minor_version = s.read::<u16>()?;
    if major_version != 1 {
        let version = u32::from(major_version) << 16 | u32::from(minor_version);
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"GDEF"), version });
    }

    let glyph_class_def = s.read::<Option<Offset16>>()?;
    let attach_list = s.read::<Option<Offset16>>()?;
    let lig_caret_list = s.read::<Option<Offset16>>()?;
    let mark_attach_class_def = s.read::<Option<Offset16>>()?;

    let mut table = Table {
        major_version,
        minor_version,
        has_attach_list: attach_list.is_some(),
        has_mark_attach_class_def: mark_attach_class_def.is_some(),
        ..Table::default()
    };

    // Trailing header fields are optional in practice, since some fonts
    // declare a newer minor version without the extra offsets.
    let mark_glyph_sets_def = if minor_version >= 2 {
        read_or_note::<Option<Offset16>>(&mut s, "mark glyph sets offset", notes).flatten()
    } else {
        None
    };

    let item_var_store = if minor_version >= 3 {
        read_or_note::<Option<Offset32>>(&mut s, "item variation store offset", notes).flatten()
    } else {
        None
    };

    if let Some(offset) = glyph_class_def {
        match slice_from(data, offset.to_usize(), "glyph class definition").and_then(ClassMap::parse) {
            Ok(classes) => table.glyph_classes = Some(GlyphClassCounts::from_class_map(&classes)),
            Err(e) => notes.skipped("glyph class definition", e),
        }
    }

    if let Some(offset) = lig_caret_list {
        match slice_from(data, offset.to_usize(), "ligature caret list").and_then(parse_lig_caret_list) {
            Ok(carets) => table.ligature_carets = Some(carets),
            Err(e) => notes.skipped("ligature caret list", e),
        }
    }

    if let Some(offset) = mark_attach_class_def {
        match slice_from(data, offset.to_usize(), "mark attachment class definition").and_then(ClassMap::parse) {
            Ok(classes) => {
                table.mark_attach_class_count = classes.class_counts().keys().filter(|c| **c != 0).count();
            }
            Err(e) => notes.skipped("mark attachment class definition", e),
        }
    }

    if let Some(offset) = mark_glyph_sets_def {
        let count = slice_from(data, offset.to_usize(), "mark glyph sets").and_then(|data| {
            let mut s = Stream::new(data);
            let format = s.read::<u16>()?;
            if format != 1 {
                return Err(DecodeError::InvalidValue { what: "mark glyph sets format", value: u32::from(format) });
            }
            s.read::<u16>()
        });

        match count {
            Ok(count) => table.mark_glyph_set_count = Some(count),
            Err(e) => notes.skipped("mark glyph sets", e),
        }
    }

    match ItemVariationStoreSummary::parse_at(data, item_var_store) {
        Ok(store) => table.item_variation_store = store,
        Err(e) => notes.skipped("item variation store", e),
    }

    Ok(table)
}

fn read_or_note<T: FromData>(s: &mut Stream, what: &str, notes: &mut Notes) -> Option<T> {
    match s.read::<T>() {
        Ok(v) => Some(v),
        Err(e) => {
            notes.skipped(what, e);
            None
        }
    }
}

fn parse_lig_caret_list(data: &[u8]) -> Result<LigatureCarets> {
    let mut s = Stream::new(data);
    s.skip::<Offset16>(); // coverage
    let ligature_count = s.read::<u16>()?;
    let offsets = s.read_array16::<Offset16>(ligature_count)?;

    let mut caret_count = 0;
    for offset in offsets {
        let count = Stream::read_at::<u16>(data, offset.to_usize())?;
        caret_count += u32::from(count);
    }

    Ok(LigatureCarets { ligature_count, caret_count })
}
