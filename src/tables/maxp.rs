//! A [Maximum Profile Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/maxp) implementation.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::Stream;
use crate::{DecodeError, DecodeResult, Result, Tag};

const VERSION_0_5: u32 = 0x00005000;
const VERSION_1_0: u32 = 0x00010000;

/// TrueType limits present in version 1.0.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
#[allow(missing_docs)]
pub struct TrueTypeLimits {
    pub max_points: u16,
    pub max_contours: u16,
    pub max_composite_points: u16,
    pub max_composite_contours: u16,
    pub max_zones: u16,
    pub max_twilight_points: u16,
    pub max_storage: u16,
    pub max_function_defs: u16,
    pub max_instruction_defs: u16,
    pub max_stack_elements: u16,
    pub max_size_of_instructions: u16,
    pub max_component_elements: u16,
    pub max_component_depth: u16,
}

/// A [Maximum Profile Table](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp).
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    /// `0x00005000` or `0x00010000`.
    pub version: u32,
    pub number_of_glyphs: u16,
    /// Version 1.0 fields. `None` for version 0.5 or when they are truncated.
    pub limits: Option<TrueTypeLimits>,
}

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, &mut notes);
    notes.finish(table)
}

pub(crate) fn parse(data: &[u8], notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);
    let version = s.read::<u32>()?;
    if !(version == VERSION_0_5 || version == VERSION_1_0) {
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"maxp"), version });
    }

    let number_of_glyphs = s.read::<u16>()?;
    if number_of_glyphs == 0 {
        notes.push("font has no glyphs");
    }

    let limits = if version == VERSION_1_0 {
        match parse_limits(&mut s) {
            Ok(limits) => Some(limits),
            Err(e) => {
                notes.skipped("version 1.0 limits", e);
                None
            }
        }
    } else {
        None
    };

    Ok(Table { version, number_of_glyphs, limits })
}

fn parse_limits(s: &mut Stream) -> Result<TrueTypeLimits> {
    Ok(TrueTypeLimits {
        max_points: s.read::<u16>()?,
        max_contours: s.read::<u16>()?,
        max_composite_points: s.read::<u16>()?,
        max_composite_contours: s.read::<u16>()?,
        max_zones: s.read::<u16>()?,
        max_twilight_points: s.read::<u16>()?,
        max_storage: s.read::<u16>()?,
        max_function_defs: s.read::<u16>()?,
        max_instruction_defs: s.read::<u16>()?,
        max_stack_elements: s.read::<u16>()?,
        max_size_of_instructions: s.read::<u16>()?,
        max_component_elements: s.read::<u16>()?,
        max_component_depth: s.read::<u16>()?,
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    #[test]
    fn version_05() {
        let table = decode(&[
            0x00, 0x00, 0x50, 0x00, // version: 0.3125
            0x00, 0x01, // number of glyphs: 1
        ]);
        assert!(table.is_complete());
        assert_eq!(table.data.number_of_glyphs, 1);
        assert_eq!(table.data.limits, None);
    }

    #[test]
    fn version_1_full() {
        let table = decode(&[
            0x00, 0x01, 0x00, 0x00, // version: 1
            0x00, 0x01, // number of glyphs: 1
            0x00, 0x0A, // maximum points in a non-composite glyph: 10
            0x00, 0x00, // maximum contours in a non-composite glyph: 0
            0x00, 0x00, // maximum points in a composite glyph: 0
            0x00, 0x00, // maximum contours in a composite glyph: 0
            0x00, 0x02, // maximum zones: 2
            0x00, 0x00, // maximum twilight points: 0
            0x00, 0x00, // number of Storage Area locations: 0
            0x00, 0x00, // number of FDEFs: 0
            0x00, 0x00, // number of IDEFs: 0
            0x00, 0x00, // maximum stack depth: 0
            0x00, 0x00, // maximum byte count for glyph instructions: 0
            0x00, 0x00, // maximum number of components: 0
            0x00, 0x00, // maximum levels of recursion: 0
        ]);
        assert!(table.is_complete());
        let limits = table.data.limits.unwrap();
        assert_eq!(limits.max_points, 10);
        assert_eq!(limits.max_zones, 2);
    }

    #[test]
    fn version_1_trimmed() {
        let table = decode(&[
            0x00, 0x01, 0x00, 0x00, // version: 1
            0x00, 0x01, // number of glyphs: 1
        ]);
        assert!(matches!(table.status, Status::Partial(_)));
        assert_eq!(table.data.number_of_glyphs, 1);
        assert_eq!(table.data.limits, None);
    }

    #[test]
    fn unknown_version() {
        let table = decode(&[
            0x00, 0x00, 0x00, 0x00, // version: 0
            0x00, 0x01, // number of glyphs: 1
        ]);
        assert!(table.is_error());
    }

    #[test]
    fn zero_glyphs() {
        let table = decode(&[
            0x00, 0x00, 0x50, 0x00, // version: 0.3125
            0x00, 0x00, // number of glyphs: 0
        ]);
        assert!(matches!(table.status, Status::Partial(_)));
    }
}
