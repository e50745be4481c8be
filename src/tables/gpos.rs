//! A [Glyph Positioning Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/gpos) implementation.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::decode::Notes;
use crate::ggg::{
    group_feature_sets, lookup_feature_map, Coverage, ExpansionBudget, FeatureRecord, FeatureSet, LayoutTable,
    Lookup, LookupSummary, ScriptLangEntry,
};
use crate::parser::{slice_from, FromData, Offset, Offset16, Stream};
use crate::{DecodeError, DecodeResult, Result, Tag};

const EXTENSION_TYPE: u16 = 9;

/// Returns a lookup type name.
pub fn lookup_type_name(kind: u16) -> &'static str {
    match kind {
        1 => "Single Adjustment",
        2 => "Pair Adjustment",
        3 => "Cursive Attachment",
        4 => "Mark-to-Base Attachment",
        5 => "Mark-to-Ligature Attachment",
        6 => "Mark-to-Mark Attachment",
        7 => "Context Positioning",
        8 => "Chained Context Positioning",
        9 => "Extension Positioning",
        _ => "Unknown",
    }
}

/// Returns the size of a [ValueRecord](
/// https://docs.microsoft.com/en-us/typography/opentype/spec/gpos#value-record) in bytes.
///
/// Every set bit of the format adds one 16-bit field.
#[inline]
pub fn value_record_size(format: u16) -> usize {
    2 * format.count_ones() as usize
}


/// A pair adjustment subtable summary.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "format")]
pub enum PairSubtable {
    /// Adjustments for individual glyph pairs.
    #[serde(rename = "1")]
    Glyphs {
        first_glyph_count: usize,
        pair_count: u32,
        value_format1: u16,
        value_format2: u16,
    },
    /// Adjustments for glyph class pairs.
    #[serde(rename = "2")]
    Classes {
        class1_count: u16,
        class2_count: u16,
        value_format1: u16,
        value_format2: u16,
    },
}

/// A mark-to-base subtable summary.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct MarkToBase {
    pub mark_count: usize,
    pub base_count: usize,
    pub mark_class_count: u16,
    /// Distinct classes actually used by mark records.
    pub distinct_mark_classes: usize,
}

/// Per-lookup details.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "kind")]
pub enum Positioning {
    Single { glyph_count: usize },
    Pair { subtables: Vec<PairSubtable> },
    MarkToBase { subtables: Vec<MarkToBase> },
    /// Other lookups are only counted.
    Counted { subtable_formats: Vec<u16> },
}


/// A [Glyph Positioning Table](https://docs.microsoft.com/en-us/typography/opentype/spec/gpos).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub major_version: u16,
    pub minor_version: u16,
    pub scripts: Vec<ScriptLangEntry>,
    pub feature_sets: Vec<FeatureSet>,
    pub features: Vec<FeatureRecord>,
    pub lookups: Vec<LookupSummary<Positioning>>,
    pub has_feature_variations: bool,
}

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, &mut notes);
    notes.finish(table)
}

fn parse(data: &[u8], notes: &mut Notes) -> Result<Table> {
    let layout = LayoutTable::parse(Tag::from_bytes(b"GPOS"), data, EXTENSION_TYPE, notes)?;
    let feature_map = lookup_feature_map(&layout.features);

    let mut budget = ExpansionBudget::default();
    let mut lookups = Vec::with_capacity(layout.lookups.len());
    for lookup in &layout.lookups {
        let features = feature_map.get(&lookup.index).cloned().unwrap_or_default();
        let detail = summarize_lookup(lookup, &mut budget, notes);
        lookups.push(LookupSummary::new(lookup, lookup_type_name(lookup.lookup_type), features, detail));
    }
    budget.finish("GPOS lookup", notes);

    Ok(Table {
        major_version: layout.major_version,
        minor_version: layout.minor_version,
        feature_sets: group_feature_sets(&layout.scripts),
        scripts: layout.scripts,
        features: layout.features,
        lookups,
        has_feature_variations: layout.has_feature_variations,
    })
}

fn summarize_lookup(lookup: &Lookup, budget: &mut ExpansionBudget, notes: &mut Notes) -> Positioning {
    // `f` returns a subtable summary and the number of entries it expanded.
    fn collect<T>(
        lookup: &Lookup,
        budget: &mut ExpansionBudget,
        notes: &mut Notes,
        f: impl Fn(&[u8]) -> Result<(T, usize)>,
    ) -> Vec<T> {
        let mut items = Vec::new();
        for (i, data) in lookup.subtables.iter().enumerate() {
            if budget.is_exhausted() {
                break;
            }

            match f(*data) {
                Ok((item, cost)) => {
                    if budget.take(cost) {
                        items.push(item);
                    }
                }
                Err(e) => notes.skipped(&format!("subtable {} of GPOS lookup {}", i, lookup.index), e),
            }
        }
        items
    }

    match lookup.lookup_type {
        1 => {
            let counts = collect(lookup, budget, notes, |data| parse_single(data).map(|n| (n, n)));
            Positioning::Single { glyph_count: counts.into_iter().sum() }
        }
        2 => Positioning::Pair { subtables: collect(lookup, budget, notes, parse_pair) },
        4 => Positioning::MarkToBase { subtables: collect(lookup, budget, notes, parse_mark_to_base) },
        _ => {
            let subtable_formats = lookup
                .subtables
                .iter()
                .filter_map(|data| Stream::read_at::<u16>(data, 0).ok())
                .collect();
            Positioning::Counted { subtable_formats }
        }
    }
}

fn parse_coverage(data: &[u8], offset: Offset16) -> Result<Coverage> {
    Coverage::parse(slice_from(data, offset.to_usize(), "coverage")?)
}

/// Returns the number of covered glyphs.
fn parse_single(data: &[u8]) -> Result<usize> {
    let mut s = Stream::new(data);
    let format = s.read::<u16>()?;
    let coverage = parse_coverage(data, s.read::<Offset16>()?)?;
    let value_format = s.read::<u16>()?;
    let size = value_record_size(value_format);
    match format {
        1 => {
            s.read_bytes(size)?;
        }
        2 => {
            let count = s.read::<u16>()?;
            s.read_bytes(usize::from(count) * size)?;
        }
        _ => return Err(DecodeError::InvalidValue { what: "single adjustment format", value: u32::from(format) }),
    }

    Ok(coverage.len())
}

/// Returns the summary and the number of covered glyphs and pair sets.
fn parse_pair(data: &[u8]) -> Result<(PairSubtable, usize)> {
    let mut s = Stream::new(data);
    let format = s.read::<u16>()?;
    let coverage = parse_coverage(data, s.read::<Offset16>()?)?;
    let value_format1 = s.read::<u16>()?;
    let value_format2 = s.read::<u16>()?;
    let values_size = value_record_size(value_format1) + value_record_size(value_format2);

    match format {
        1 => {
            let count = s.read::<u16>()?;
            let offsets = s.read_array16::<Offset16>(count)?;

            // A PairValueRecord is a second glyph followed by two value records.
            let stride = u16::SIZE + values_size;
            let mut pair_count = 0;
            for offset in offsets {
                let mut s = Stream::new_at(data, offset.to_usize())?;
                let count = s.read::<u16>()?;
                s.read_bytes(usize::from(count) * stride)?;
                pair_count += u32::from(count);
            }

            let subtable =
                PairSubtable::Glyphs { first_glyph_count: coverage.len(), pair_count, value_format1, value_format2 };
            Ok((subtable, coverage.len() + usize::from(offsets.len())))
        }
        2 => {
            s.skip::<Offset16>(); // classDef1
            s.skip::<Offset16>(); // classDef2
            let class1_count = s.read::<u16>()?;
            let class2_count = s.read::<u16>()?;
            let records = usize::from(class1_count) * usize::from(class2_count);
            s.read_bytes(records * values_size)?;
            Ok((PairSubtable::Classes { class1_count, class2_count, value_format1, value_format2 }, coverage.len()))
        }
        _ => Err(DecodeError::InvalidValue { what: "pair adjustment format", value: u32::from(format) }),
    }
}

#[derive(Clone, Copy)]
struct MarkRecord {
    class: u16,
}

impl FromData for MarkRecord {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        // The anchor offset is not summarized.
        Stream::new(data).read::<u16>().ok().map(|class| MarkRecord { class })
    }
}

/// Returns the summary and the number of marks, bases and mark records.
fn parse_mark_to_base(data: &[u8]) -> Result<(MarkToBase, usize)> {
    let mut s = Stream::new(data);
    let format = s.read::<u16>()?;
    if format != 1 {
        return Err(DecodeError::InvalidValue { what: "mark-to-base format", value: u32::from(format) });
    }

    let marks = parse_coverage(data, s.read::<Offset16>()?)?;
    let bases = parse_coverage(data, s.read::<Offset16>()?)?;
    let mark_class_count = s.read::<u16>()?;
    let mark_array = s.read::<Offset16>()?;

    let mut s = Stream::new_at(data, mark_array.to_usize())?;
    let count = s.read::<u16>()?;
    let classes: BTreeSet<u16> = s.read_array16::<MarkRecord>(count)?.into_iter().map(|r| r.class).collect();
    if classes.iter().any(|c| *c >= mark_class_count) {
        log::debug!("a mark record class is outside of {} mark classes", mark_class_count);
    }

    let summary = MarkToBase {
        mark_count: marks.len(),
        base_count: bases.len(),
        mark_class_count,
        distinct_mark_classes: classes.len(),
    };
    Ok((summary, marks.len() + bases.len() + usize::from(count)))
}
