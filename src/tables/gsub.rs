//! A [Glyph Substitution Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/gsub) implementation.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::decode::Notes;
use crate::ggg::{
    group_feature_sets, lookup_feature_map, Coverage, ExpansionBudget, FeatureParams, FeatureRecord, FeatureSet,
    LayoutTable, Lookup, LookupSummary, ParamsKind, ScriptLangEntry,
};
use crate::parser::{slice_from, Offset, Offset16, Stream};
use crate::tables::name;
use crate::{DecodeError, DecodeResult, Result, Tag};

const EXTENSION_TYPE: u16 = 7;

/// The first name ID a stylistic set name is calculated from.
const CALCULATED_SET_NAME_BASE: u16 = 256;

/// Returns a lookup type name.
pub fn lookup_type_name(kind: u16) -> &'static str {
    match kind {
        1 => "Single",
        2 => "Multiple",
        3 => "Alternate",
        4 => "Ligature",
        5 => "Context",
        6 => "Chaining Context",
        7 => "Extension",
        8 => "Reverse Chaining Single",
        _ => "Unknown",
    }
}


/// A glyph mapped to a single substitute.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct SingleMapping {
    pub glyph: u16,
    pub substitute: u16,
}

/// A glyph mapped to a sequence of glyphs.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct GlyphSequence {
    pub glyph: u16,
    pub glyphs: Vec<u16>,
}

/// A ligature with its owning features.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Ligature {
    pub lookup_index: u16,
    /// The first glyph comes from the coverage table.
    pub components: Vec<u16>,
    pub ligature_glyph: u16,
    pub features: Vec<Tag>,
}

/// Per-lookup details.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "kind")]
pub enum Substitution {
    Single { mappings: Vec<SingleMapping> },
    Multiple { sequences: Vec<GlyphSequence> },
    Alternate { alternates: Vec<GlyphSequence> },
    /// Ligatures are collected in [`Table::ligatures`].
    Ligature { ligature_count: usize },
    /// Contextual lookups are only counted.
    Counted { subtable_formats: Vec<u16> },
}


/// Where a stylistic set name ID comes from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum NameSource {
    /// The `UINameID` of the feature parameters.
    FeatureParams,
    /// `256 + (NN - 1)`, used only when the name table has it.
    Calculated,
    /// Neither source produced a name ID.
    None,
}

/// A stylistic set name.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct StylisticSet {
    pub tag: Tag,
    pub name_id: Option<u16>,
    pub source: NameSource,
    pub name: Option<String>,
}


/// A [Glyph Substitution Table](https://docs.microsoft.com/en-us/typography/opentype/spec/gsub).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub major_version: u16,
    pub minor_version: u16,
    pub scripts: Vec<ScriptLangEntry>,
    pub feature_sets: Vec<FeatureSet>,
    pub features: Vec<FeatureRecord>,
    pub lookups: Vec<LookupSummary<Substitution>>,
    pub ligatures: Vec<Ligature>,
    pub stylistic_sets: Vec<StylisticSet>,
    pub has_feature_variations: bool,
}

/// Decodes a table.
///
/// `name_data` is used to resolve stylistic set names.
pub fn decode(data: &[u8], name_data: Option<&[u8]>) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, name_data, &mut notes);
    notes.finish(table)
}

fn parse(data: &[u8], name_data: Option<&[u8]>, notes: &mut Notes) -> Result<Table> {
    let layout = LayoutTable::parse(Tag::from_bytes(b"GSUB"), data, EXTENSION_TYPE, notes)?;
    let feature_map = lookup_feature_map(&layout.features);

    let mut budget = ExpansionBudget::default();
    let mut lookups = Vec::with_capacity(layout.lookups.len());
    let mut ligatures = Vec::new();
    for lookup in &layout.lookups {
        let features = feature_map.get(&lookup.index).cloned().unwrap_or_default();
        let detail = summarize_lookup(lookup, &features, &mut ligatures, &mut budget, notes);
        lookups.push(LookupSummary::new(lookup, lookup_type_name(lookup.lookup_type), features, detail));
    }
    budget.finish("GSUB lookup", notes);

    let stylistic_sets = stylistic_sets(&layout.features, name_data);

    Ok(Table {
        major_version: layout.major_version,
        minor_version: layout.minor_version,
        feature_sets: group_feature_sets(&layout.scripts),
        scripts: layout.scripts,
        features: layout.features,
        lookups,
        ligatures,
        stylistic_sets,
        has_feature_variations: layout.has_feature_variations,
    })
}

fn summarize_lookup(
    lookup: &Lookup,
    features: &[Tag],
    ligatures: &mut Vec<Ligature>,
    budget: &mut ExpansionBudget,
    notes: &mut Notes,
) -> Substitution {
    let index = lookup.index;
    let skipped = |i: usize, e: DecodeError, notes: &mut Notes| {
        notes.skipped(&format!("subtable {} of GSUB lookup {}", i, index), e)
    };

    match lookup.lookup_type {
        1 => {
            let mut mappings = Vec::new();
            for (i, data) in lookup.subtables.iter().enumerate() {
                if budget.is_exhausted() {
                    break;
                }

                if let Err(e) = parse_single(data, &mut mappings, budget) {
                    skipped(i, e, notes);
                }
            }
            Substitution::Single { mappings }
        }
        2 | 3 => {
            let mut sequences = Vec::new();
            for (i, data) in lookup.subtables.iter().enumerate() {
                if budget.is_exhausted() {
                    break;
                }

                let mut ctx = SubtableContext { lookup_index: index, subtable_index: i, budget: &mut *budget, notes: &mut *notes };
                if let Err(e) = parse_sequences(data, &mut sequences, &mut ctx) {
                    skipped(i, e, notes);
                }
            }

            if lookup.lookup_type == 2 {
                Substitution::Multiple { sequences }
            } else {
                Substitution::Alternate { alternates: sequences }
            }
        }
        4 => {
            let start = ligatures.len();
            for (i, data) in lookup.subtables.iter().enumerate() {
                if budget.is_exhausted() {
                    break;
                }

                let mut ctx = SubtableContext { lookup_index: index, subtable_index: i, budget: &mut *budget, notes: &mut *notes };
                if let Err(e) = parse_ligatures(data, features, ligatures, &mut ctx) {
                    skipped(i, e, notes);
                }
            }
            Substitution::Ligature { ligature_count: ligatures.len() - start }
        }
        _ => {
            let subtable_formats = lookup
                .subtables
                .iter()
                .filter_map(|data| Stream::read_at::<u16>(data, 0).ok())
                .collect();
            Substitution::Counted { subtable_formats }
        }
    }
}

/// Where a subtable sits, plus the shared budget and notes.
struct SubtableContext<'n> {
    lookup_index: u16,
    subtable_index: usize,
    budget: &'n mut ExpansionBudget,
    notes: &'n mut Notes,
}

impl SubtableContext<'_> {
    fn skipped(&mut self, what: &str, index: usize, e: DecodeError) {
        let what = format!(
            "{} {} in subtable {} of GSUB lookup {}",
            what, index, self.subtable_index, self.lookup_index
        );
        self.notes.skipped(&what, e);
    }
}

fn parse_coverage(data: &[u8], offset: Offset16) -> Result<Coverage> {
    Coverage::parse(slice_from(data, offset.to_usize(), "coverage")?)
}

fn parse_single(data: &[u8], mappings: &mut Vec<SingleMapping>, budget: &mut ExpansionBudget) -> Result<()> {
    let mut s = Stream::new(data);
    let format = s.read::<u16>()?;
    let coverage = parse_coverage(data, s.read::<Offset16>()?)?;
    if !budget.take(coverage.len()) {
        return Ok(());
    }

    match format {
        1 => {
            let delta = s.read::<i16>()?;
            mappings.extend(coverage.glyphs.iter().map(|&glyph| SingleMapping {
                glyph,
                // Addition is modulo 65536.
                substitute: glyph.wrapping_add(delta as u16),
            }));
        }
        2 => {
            let count = s.read::<u16>()?;
            let substitutes = s.read_array16::<u16>(count)?;
            mappings.extend(
                coverage.glyphs.iter().zip(substitutes).map(|(&glyph, substitute)| SingleMapping { glyph, substitute }),
            );
        }
        _ => return Err(DecodeError::InvalidValue { what: "single substitution format", value: u32::from(format) }),
    }

    Ok(())
}

/// Parses a Multiple or Alternate substitution subtable. They share the layout.
///
/// A sequence that can't be read is skipped with a note.
fn parse_sequences(data: &[u8], sequences: &mut Vec<GlyphSequence>, ctx: &mut SubtableContext) -> Result<()> {
    let mut s = Stream::new(data);
    let format = s.read::<u16>()?;
    if format != 1 {
        return Err(DecodeError::InvalidValue { what: "sequence substitution format", value: u32::from(format) });
    }

    let coverage = parse_coverage(data, s.read::<Offset16>()?)?;
    let count = s.read::<u16>()?;
    let offsets = s.read_array16::<Offset16>(count)?;
    for (i, (&glyph, offset)) in coverage.glyphs.iter().zip(offsets).enumerate() {
        let glyphs = Stream::new_at(data, offset.to_usize()).and_then(|mut s| {
            let count = s.read::<u16>()?;
            Ok((s, count))
        });

        match glyphs {
            Ok((mut s, count)) => {
                if !ctx.budget.take(1 + usize::from(count)) {
                    break;
                }

                match s.read_vec::<u16>(count) {
                    Ok(glyphs) => sequences.push(GlyphSequence { glyph, glyphs }),
                    Err(e) => ctx.skipped("sequence", i, e),
                }
            }
            Err(e) => ctx.skipped("sequence", i, e),
        }
    }

    Ok(())
}

/// Parses a Ligature substitution subtable.
///
/// A ligature set or a ligature that can't be read is skipped with a note.
fn parse_ligatures(
    data: &[u8],
    features: &[Tag],
    ligatures: &mut Vec<Ligature>,
    ctx: &mut SubtableContext,
) -> Result<()> {
    let mut s = Stream::new(data);
    let format = s.read::<u16>()?;
    if format != 1 {
        return Err(DecodeError::InvalidValue { what: "ligature substitution format", value: u32::from(format) });
    }

    let coverage = parse_coverage(data, s.read::<Offset16>()?)?;
    let count = s.read::<u16>()?;
    let set_offsets = s.read_array16::<Offset16>(count)?;
    if coverage.len() != usize::from(count) {
        ctx.notes.push(format!(
            "GSUB lookup {} has {} ligature sets for {} covered glyphs",
            ctx.lookup_index,
            count,
            coverage.len()
        ));
    }

    // Coverage glyph `i` is the first component of every ligature in set `i`.
    for (set_index, (&first, set_offset)) in coverage.glyphs.iter().zip(set_offsets).enumerate() {
        if ctx.budget.is_exhausted() {
            break;
        }

        let set = slice_from(data, set_offset.to_usize(), "ligature set").and_then(|set_data| {
            let mut s = Stream::new(set_data);
            let count = s.read::<u16>()?;
            Ok((set_data, s.read_array16::<Offset16>(count)?))
        });
        let (set_data, offsets) = match set {
            Ok(set) => set,
            Err(e) => {
                ctx.skipped("ligature set", set_index, e);
                continue;
            }
        };

        for (i, offset) in offsets.into_iter().enumerate() {
            let ligature = Stream::new_at(set_data, offset.to_usize()).and_then(|mut s| {
                let ligature_glyph = s.read::<u16>()?;
                let component_count = s.read::<u16>()?;
                Ok((s, ligature_glyph, component_count))
            });
            let (mut s, ligature_glyph, component_count) = match ligature {
                Ok(ligature) => ligature,
                Err(e) => {
                    ctx.skipped(&format!("ligature set {} ligature", set_index), i, e);
                    continue;
                }
            };

            if !ctx.budget.take(usize::from(component_count).max(1)) {
                break;
            }

            // The first component is implied by the coverage.
            let rest = match s.read_vec::<u16>(component_count.saturating_sub(1)) {
                Ok(rest) => rest,
                Err(e) => {
                    ctx.skipped(&format!("ligature set {} ligature", set_index), i, e);
                    continue;
                }
            };

            let mut components = Vec::with_capacity(rest.len() + 1);
            components.push(first);
            components.extend(rest);
            ligatures.push(Ligature {
                lookup_index: ctx.lookup_index,
                components,
                ligature_glyph,
                features: features.to_vec(),
            });
        }
    }

    Ok(())
}

/// Collects stylistic set names.
///
/// A name ID from the feature parameters wins. Otherwise, a calculated
/// `256 + (NN - 1)` ID is used when the name table has a record for it.
fn stylistic_sets(features: &[FeatureRecord], name_data: Option<&[u8]>) -> Vec<StylisticSet> {
    let mut seen = BTreeSet::new();
    let mut sets: Vec<(_, _, Option<u16>)> = Vec::new();
    for feature in features {
        let number = match ParamsKind::from_tag(feature.tag) {
            Some(ParamsKind::StylisticSet(n)) => n,
            _ => continue,
        };

        let params_id = match feature.feature_params {
            Some(FeatureParams::StylisticSet { ui_name_id, .. }) if ui_name_id != 0 => Some(ui_name_id),
            _ => None,
        };

        // The first record wins, unless only a later one has parameters.
        if !seen.insert(feature.tag) {
            if let Some(id) = params_id {
                if let Some(set) = sets.iter_mut().find(|(tag, _, params)| *tag == feature.tag && params.is_none()) {
                    set.2 = Some(id);
                }
            }
            continue;
        }

        sets.push((feature.tag, number, params_id));
    }

    let mut ids: Vec<u16> = Vec::new();
    for (_, number, params_id) in &sets {
        ids.push(params_id.unwrap_or(CALCULATED_SET_NAME_BASE + u16::from(*number) - 1));
    }
    let names: BTreeMap<u16, String> = match name_data {
        Some(data) => name::resolve_in_table(data, &ids),
        None => BTreeMap::new(),
    };

    sets.into_iter()
        .map(|(tag, number, params_id)| {
            let calculated = CALCULATED_SET_NAME_BASE + u16::from(number) - 1;
            let (name_id, source) = match params_id {
                Some(id) => (Some(id), NameSource::FeatureParams),
                None if names.contains_key(&calculated) => (Some(calculated), NameSource::Calculated),
                None => (None, NameSource::None),
            };

            StylisticSet { tag, name_id, source, name: name_id.and_then(|id| names.get(&id).cloned()) }
        })
        .collect()
}
