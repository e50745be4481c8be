//! A [Lookup List Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#lookup-list-table) parser.

use serde::Serialize;

use super::budget::ExpansionBudget;
use crate::decode::Notes;
use crate::parser::{slice_from, Offset, Offset16, Offset32, Stream};
use crate::{DecodeError, Result, Tag};

/// Lookup flags.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
#[allow(missing_docs)]
pub struct LookupFlags {
    pub right_to_left: bool,
    pub ignore_base_glyphs: bool,
    pub ignore_ligatures: bool,
    pub ignore_marks: bool,
    pub use_mark_filtering_set: bool,
    pub mark_attachment_type: u8,
}

impl LookupFlags {
    /// Decodes a raw `lookupFlag` value.
    pub fn decode(n: u16) -> Self {
        LookupFlags {
            right_to_left: n & 0x0001 != 0,
            ignore_base_glyphs: n & 0x0002 != 0,
            ignore_ligatures: n & 0x0004 != 0,
            ignore_marks: n & 0x0008 != 0,
            use_mark_filtering_set: n & 0x0010 != 0,
            mark_attachment_type: (n >> 8) as u8,
        }
    }

    /// Encodes flags back into a raw value.
    pub fn encode(&self) -> u16 {
        let mut n = u16::from(self.mark_attachment_type) << 8;
        if self.right_to_left { n |= 0x0001; }
        if self.ignore_base_glyphs { n |= 0x0002; }
        if self.ignore_ligatures { n |= 0x0004; }
        if self.ignore_marks { n |= 0x0008; }
        if self.use_mark_filtering_set { n |= 0x0010; }
        n
    }
}


/// A parsed lookup with extension subtables already unwrapped.
#[derive(Clone, Debug)]
pub struct Lookup<'a> {
    pub index: u16,
    /// The lookup type. For an extension lookup, the wrapped type.
    pub lookup_type: u16,
    pub extension: bool,
    pub flag: LookupFlags,
    /// The declared number of subtables.
    pub subtable_count: u16,
    /// Subtables that could be located.
    pub subtables: Vec<&'a [u8]>,
    pub mark_filtering_set: Option<u16>,
}

/// Parses a lookup list.
///
/// `extension_type` is 7 for GSUB and 9 for GPOS.
/// A lookup that can't be read is skipped with a note.
/// Parsing stops once [`MAX_EXPANDED_ENTRIES`](super::MAX_EXPANDED_ENTRIES) subtables were located.
pub fn parse_lookup_list<'a>(data: &'a [u8], extension_type: u16, notes: &mut Notes) -> Result<Vec<Lookup<'a>>> {
    parse_lookups(data, extension_type, &mut ExpansionBudget::default(), notes)
}

fn parse_lookups<'a>(
    data: &'a [u8],
    extension_type: u16,
    budget: &mut ExpansionBudget,
    notes: &mut Notes,
) -> Result<Vec<Lookup<'a>>> {
    let mut s = Stream::new(data);
    let count = s.read::<u16>()?;
    let offsets = s.read_array16::<Offset16>(count)?;

    let mut lookups = Vec::with_capacity(usize::from(offsets.len()));
    for (index, offset) in offsets.into_iter().enumerate() {
        let index = index as u16;
        // Lookups can share an offset, so each one is paid for by its subtable count.
        let cost = Stream::read_at::<u16>(data, offset.to_usize().saturating_add(4))
            .map_or(1, |n| usize::from(n).max(1));
        if !budget.take(cost) {
            break;
        }

        match parse_lookup(index, data, offset.to_usize(), extension_type, notes) {
            Ok(lookup) => lookups.push(lookup),
            Err(e) => notes.skipped(&format!("lookup {}", index), e),
        }
    }

    budget.finish("lookup list", notes);
    Ok(lookups)
}

fn parse_lookup<'a>(
    index: u16,
    list_data: &'a [u8],
    offset: usize,
    extension_type: u16,
    notes: &mut Notes,
) -> Result<Lookup<'a>> {
    let data = slice_from(list_data, offset, "lookup table")?;
    let mut s = Stream::new(data);
    let mut lookup_type = s.read::<u16>()?;
    let flag = LookupFlags::decode(s.read::<u16>()?);
    let subtable_count = s.read::<u16>()?;
    let offsets = s.read_array16::<Offset16>(subtable_count)?;
    let mark_filtering_set = if flag.use_mark_filtering_set { Some(s.read::<u16>()?) } else { None };

    let extension = lookup_type == extension_type;
    let mut wrapped_type = None;
    let mut subtables = Vec::with_capacity(usize::from(subtable_count));
    for (i, offset) in offsets.into_iter().enumerate() {
        let subtable = slice_from(data, offset.to_usize(), "lookup subtable").and_then(|subtable| {
            if extension {
                let (kind, subtable) = unwrap_extension(subtable)?;
                // All subtables of an extension lookup must wrap the same type.
                match wrapped_type {
                    None => wrapped_type = Some(kind),
                    Some(expected) if expected != kind => {
                        return Err(DecodeError::InvalidValue { what: "extension lookup type", value: u32::from(kind) });
                    }
                    Some(_) => {}
                }
                Ok(subtable)
            } else {
                Ok(subtable)
            }
        });

        match subtable {
            Ok(subtable) => subtables.push(subtable),
            Err(e) => notes.skipped(&format!("subtable {} of lookup {}", i, index), e),
        }
    }

    if let Some(kind) = wrapped_type {
        lookup_type = kind;
    }

    Ok(Lookup { index, lookup_type, extension, flag, subtable_count, subtables, mark_filtering_set })
}

/// Returns the wrapped lookup type and subtable of an extension subtable.
fn unwrap_extension(data: &[u8]) -> Result<(u16, &[u8])> {
    let mut s = Stream::new(data);
    let format = s.read::<u16>()?;
    if format != 1 {
        return Err(DecodeError::InvalidValue { what: "extension subtable format", value: u32::from(format) });
    }

    let kind = s.read::<u16>()?;
    let offset = s.read::<Offset32>()?;
    Ok((kind, slice_from(data, offset.to_usize(), "extension subtable")?))
}


/// A lookup summary shared by GSUB and GPOS.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct LookupSummary<D> {
    pub index: u16,
    pub lookup_type: u16,
    pub type_name: &'static str,
    pub extension: bool,
    pub flag: LookupFlags,
    pub subtable_count: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_filtering_set: Option<u16>,
    /// Tags of the features that reference this lookup.
    pub features: Vec<Tag>,
    pub detail: D,
}

impl<D> LookupSummary<D> {
    /// Creates a summary from a parsed lookup.
    pub fn new(lookup: &Lookup, type_name: &'static str, features: Vec<Tag>, detail: D) -> Self {
        LookupSummary {
            index: lookup.index,
            lookup_type: lookup.lookup_type,
            type_name,
            extension: lookup.extension,
            flag: lookup.flag,
            subtable_count: lookup.subtable_count,
            mark_filtering_set: lookup.mark_filtering_set,
            features,
            detail,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        let flags = LookupFlags::decode(0x0312);
        assert!(flags.ignore_base_glyphs);
        assert!(flags.use_mark_filtering_set);
        assert!(!flags.right_to_left);
        assert_eq!(flags.mark_attachment_type, 3);
        assert_eq!(flags.encode(), 0x0312);
    }

    #[test]
    fn extension_lookup() {
        let data = &[
            0x00, 0x01, // lookup count: 1
            0x00, 0x04, // lookup [0] at 4

            // lookup (4)
            0x00, 0x07, // type: extension
            0x00, 0x10, // flag: use mark filtering set
            0x00, 0x01, // subtable count: 1
            0x00, 0x0A, // subtable [0] at 10
            0x00, 0x02, // mark filtering set: 2
            // extension subtable (14)
            0x00, 0x01, // format: 1
            0x00, 0x04, // wrapped type: ligature
            0x00, 0x00, 0x00, 0x08, // offset: 8
            0xAB, 0xCD, // wrapped subtable
        ];

        let mut notes = Notes::new();
        let lookups = parse_lookup_list(data, 7, &mut notes).unwrap();
        assert!(notes.is_empty());
        assert_eq!(lookups.len(), 1);
        assert_eq!(lookups[0].lookup_type, 4);
        assert!(lookups[0].extension);
        assert_eq!(lookups[0].mark_filtering_set, Some(2));
        assert_eq!(lookups[0].subtables, vec![&[0xABu8, 0xCD][..]]);
    }

    #[test]
    fn bad_subtable_offset() {
        let data = &[
            0x00, 0x01, // lookup count: 1
            0x00, 0x04, // lookup [0] at 4
            0x00, 0x01, // type: single
            0x00, 0x00, // flag
            0x00, 0x01, // subtable count: 1
            0x01, 0x00, // subtable [0] at 256
        ];

        let mut notes = Notes::new();
        let lookups = parse_lookup_list(data, 7, &mut notes).unwrap();
        assert!(!notes.is_empty());
        assert_eq!(lookups[0].subtable_count, 1);
        assert!(lookups[0].subtables.is_empty());
    }

    #[test]
    fn shared_lookups_are_limited() {
        let mut data = vec![
            0x00, 0x04, // lookup count: 4
            0x00, 0x0A, 0x00, 0x0A, 0x00, 0x0A, 0x00, 0x0A, // all lookups at 10
            // lookup (10)
            0x00, 0x01, // type: single
            0x00, 0x00, // flag
            0x00, 0x03, // subtable count: 3
        ];
        // Every subtable points at the lookup itself.
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);

        let mut notes = Notes::new();
        let mut budget = ExpansionBudget::new(7);
        let lookups = parse_lookups(&data, 7, &mut budget, &mut notes).unwrap();
        assert_eq!(lookups.len(), 2);
        assert_eq!(lookups[1].subtables.len(), 3);
        assert!(budget.is_exhausted());
        assert!(!notes.is_empty());
    }
}
