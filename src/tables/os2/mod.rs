//! An [OS/2 and Windows Metrics Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/os2) implementation.
//!
//! Field groups are gated by both the version and the actual table length,
//! since truncated fonts may declare a higher version than their data supports.

mod code_pages;
mod fs_selection;
mod fs_type;
mod panose;
mod unicode_ranges;

pub use code_pages::{code_page_name, code_page_ranges, CodePageRanges};
pub use fs_selection::FsSelection;
pub use fs_type::FsType;
pub use panose::{Panose, PanoseDigit};
pub use unicode_ranges::{unicode_range_name, unicode_ranges, UnicodeRanges};

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::Stream;
use crate::{DecodeError, DecodeResult, Result, Tag};

/// The size of the version 0 fields defined by Apple's TrueType.
const APPLE_V0_SIZE: usize = 68;
const V0_SIZE: usize = 78;
const V1_SIZE: usize = 86;
const V2_SIZE: usize = 96;
const V5_SIZE: usize = 100;

const MAX_VERSION: u16 = 5;


/// Returns a `usWeightClass` name.
pub fn weight_class_name(n: u16) -> &'static str {
    match n {
        100 => "Thin",
        200 => "Extra-light",
        300 => "Light",
        400 => "Normal",
        500 => "Medium",
        600 => "Semi-bold",
        700 => "Bold",
        800 => "Extra-bold",
        900 => "Black",
        1..=1000 => "Non-standard",
        _ => "Invalid",
    }
}

/// Returns a `usWidthClass` name.
pub fn width_class_name(n: u16) -> &'static str {
    match n {
        1 => "Ultra-condensed",
        2 => "Extra-condensed",
        3 => "Condensed",
        4 => "Semi-condensed",
        5 => "Medium",
        6 => "Semi-expanded",
        7 => "Expanded",
        8 => "Extra-expanded",
        9 => "Ultra-expanded",
        _ => "Invalid",
    }
}

/// Returns an IBM font class name for the high byte of `sFamilyClass`.
pub fn family_class_name(class: u8) -> &'static str {
    match class {
        0 => "No Classification",
        1 => "Oldstyle Serifs",
        2 => "Transitional Serifs",
        3 => "Modern Serifs",
        4 => "Clarendon Serifs",
        5 => "Slab Serifs",
        7 => "Freeform Serifs",
        8 => "Sans Serif",
        9 => "Ornamentals",
        10 => "Scripts",
        12 => "Symbolic",
        _ => "Reserved",
    }
}


/// Subscript or superscript metrics.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
#[allow(missing_docs)]
pub struct ScriptMetrics {
    pub x_size: i16,
    pub y_size: i16,
    pub x_offset: i16,
    pub y_offset: i16,
}

/// Typographic and Windows metrics. Absent from Apple's 68-byte version 0.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
#[allow(missing_docs)]
pub struct VerticalMetrics {
    pub typo_ascender: i16,
    pub typo_descender: i16,
    pub typo_line_gap: i16,
    pub win_ascent: u16,
    pub win_descent: u16,
}

/// Version 2+ fields.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
#[allow(missing_docs)]
pub struct GlyphMetrics {
    pub x_height: i16,
    pub cap_height: i16,
    pub default_char: u16,
    pub break_char: u16,
    pub max_context: u16,
}

/// Version 5 fields, in TWIPs.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
#[allow(missing_docs)]
pub struct OpticalSize {
    pub lower_point_size: u16,
    pub upper_point_size: u16,
}


/// An [OS/2 and Windows Metrics Table](https://docs.microsoft.com/en-us/typography/opentype/spec/os2).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub version: u16,
    pub x_avg_char_width: i16,
    pub weight_class: u16,
    pub weight_name: &'static str,
    pub width_class: u16,
    pub width_name: &'static str,
    pub fs_type_raw: u16,
    pub fs_type: FsType,
    pub subscript: ScriptMetrics,
    pub superscript: ScriptMetrics,
    pub strikeout_size: i16,
    pub strikeout_position: i16,
    pub family_class: u8,
    pub family_subclass: u8,
    pub family_class_name: &'static str,
    pub panose: Panose,
    pub unicode_ranges_raw: [u32; 4],
    pub unicode_ranges: UnicodeRanges,
    pub vendor_id: Tag,
    pub fs_selection_raw: u16,
    pub fs_selection: FsSelection,
    pub first_char_index: u16,
    pub last_char_index: u16,
    pub vertical_metrics: Option<VerticalMetrics>,
    /// Version 1+.
    pub code_page_ranges: Option<CodePageRanges>,
    /// Version 2+.
    pub glyph_metrics: Option<GlyphMetrics>,
    /// Version 5.
    pub optical_size: Option<OpticalSize>,
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
    if version > MAX_VERSION {
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"OS/2"), version: u32::from(version) });
    }

    let x_avg_char_width = s.read::<i16>()?;
    let weight_class = s.read::<u16>()?;
    let width_class = s.read::<u16>()?;
    let fs_type_raw = s.read::<u16>()?;

    let mut table = Table {
        version,
        x_avg_char_width,
        weight_class,
        weight_name: weight_class_name(weight_class),
        width_class,
        width_name: width_class_name(width_class),
        fs_type_raw,
        fs_type: FsType::decode(fs_type_raw),
        ..Table::default()
    };

    // Fields read before a truncation are kept.
    if let Err(e) = read_core(&mut s, &mut table) {
        notes.skipped("version 0 fields", e);
        return Ok(table);
    }
    debug_assert_eq!(s.offset(), APPLE_V0_SIZE);

    table.vertical_metrics = read_group(data, s, 0, version, V0_SIZE, "typographic metrics", notes, |s| {
        Ok(VerticalMetrics {
            typo_ascender: s.read::<i16>()?,
            typo_descender: s.read::<i16>()?,
            typo_line_gap: s.read::<i16>()?,
            win_ascent: s.read::<u16>()?,
            win_descent: s.read::<u16>()?,
        })
    });
    if table.vertical_metrics.is_none() && version == 0 && data.len() < V0_SIZE {
        log::debug!("OS/2 is an Apple version 0 table");
    }

    s.advance(V0_SIZE - APPLE_V0_SIZE);
    table.code_page_ranges = read_group(data, s, 1, version, V1_SIZE, "code page ranges", notes, |s| {
        Ok(CodePageRanges::decode(s.read::<u32>()?, s.read::<u32>()?))
    });

    s.advance(V1_SIZE - V0_SIZE);
    table.glyph_metrics = read_group(data, s, 2, version, V2_SIZE, "version 2 metrics", notes, |s| {
        Ok(GlyphMetrics {
            x_height: s.read::<i16>()?,
            cap_height: s.read::<i16>()?,
            default_char: s.read::<u16>()?,
            break_char: s.read::<u16>()?,
            max_context: s.read::<u16>()?,
        })
    });

    s.advance(V2_SIZE - V1_SIZE);
    table.optical_size = read_group(data, s, 5, version, V5_SIZE, "optical size", notes, |s| {
        Ok(OpticalSize {
            lower_point_size: s.read::<u16>()?,
            upper_point_size: s.read::<u16>()?,
        })
    });

    Ok(table)
}

/// Reads the version 0 fields that follow `fsType`, one by one.
fn read_core(s: &mut Stream, table: &mut Table) -> Result<()> {
    table.subscript = read_script_metrics(s)?;
    table.superscript = read_script_metrics(s)?;
    table.strikeout_size = s.read::<i16>()?;
    table.strikeout_position = s.read::<i16>()?;
    table.family_class = s.read::<u8>()?;
    table.family_class_name = family_class_name(table.family_class);
    table.family_subclass = s.read::<u8>()?;

    let mut panose = [0; 10];
    panose.copy_from_slice(s.read_bytes(10)?);
    table.panose = Panose::decode(panose);

    for range in &mut table.unicode_ranges_raw {
        *range = s.read::<u32>()?;
    }
    table.unicode_ranges = UnicodeRanges::decode(table.unicode_ranges_raw);

    table.vendor_id = s.read::<Tag>()?;
    table.fs_selection_raw = s.read::<u16>()?;
    table.fs_selection = FsSelection::decode(table.fs_selection_raw);
    table.first_char_index = s.read::<u16>()?;
    table.last_char_index = s.read::<u16>()?;
    Ok(())
}

fn read_script_metrics(s: &mut Stream) -> Result<ScriptMetrics> {
    Ok(ScriptMetrics {
        x_size: s.read::<i16>()?,
        y_size: s.read::<i16>()?,
        x_offset: s.read::<i16>()?,
        y_offset: s.read::<i16>()?,
    })
}

/// Reads a field group that ends at `end` and exists since `min_version`.
///
/// A group the version promises but the data lacks is reported as a note.
/// Version 0 typographic metrics are optional, since Apple's version 0 ends before them.
#[allow(clippy::too_many_arguments)]
fn read_group<T>(
    data: &[u8],
    mut s: Stream,
    min_version: u16,
    version: u16,
    end: usize,
    what: &str,
    notes: &mut Notes,
    f: impl FnOnce(&mut Stream) -> Result<T>,
) -> Option<T> {
    if version < min_version {
        return None;
    }

    if data.len() < end {
        if !(version == 0 && min_version == 0) {
            notes.push(format!("version {} table is {} bytes, {} is missing", version, data.len(), what));
        }
        return None;
    }

    match f(&mut s) {
        Ok(group) => Some(group),
        Err(e) => {
            notes.skipped(what, e);
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    fn table_data(version: u16, len: usize) -> Vec<u8> {
        let mut data = vec![0u8; len];
        data[0..2].copy_from_slice(&version.to_be_bytes());
        data[4..6].copy_from_slice(&700u16.to_be_bytes()); // usWeightClass
        data[6..8].copy_from_slice(&3u16.to_be_bytes()); // usWidthClass
        data[8..10].copy_from_slice(&0x0004u16.to_be_bytes()); // fsType
        data[32] = 8; // sFamilyClass: Sans Serif
        data[33] = 1;
        data[34] = 2; // PANOSE family kind: Latin Text
        data[35] = 11; // PANOSE serif style: Normal Sans
        data[42..46].copy_from_slice(&1u32.to_be_bytes()); // ulUnicodeRange1
        data[58..62].copy_from_slice(b"ABCD"); // achVendID
        data[62..64].copy_from_slice(&0x0020u16.to_be_bytes()); // fsSelection
        if len >= 78 {
            data[68..70].copy_from_slice(&800i16.to_be_bytes()); // sTypoAscender
        }
        if len >= 86 {
            data[78..82].copy_from_slice(&1u32.to_be_bytes()); // ulCodePageRange1
        }
        if len >= 96 {
            data[86..88].copy_from_slice(&500i16.to_be_bytes()); // sxHeight
        }
        if len >= 100 {
            data[98..100].copy_from_slice(&720u16.to_be_bytes()); // usUpperOpticalPointSize
        }
        data
    }

    #[test]
    fn version_5() {
        let table = decode(&table_data(5, V5_SIZE));
        assert!(table.is_complete());
        let table = table.data;
        assert_eq!(table.weight_name, "Bold");
        assert_eq!(table.width_name, "Condensed");
        assert!(table.fs_type.preview_and_print);
        assert!(table.fs_selection.bold);
        assert_eq!(table.family_class_name, "Sans Serif");
        assert_eq!(table.panose.digits[0].label, Some("Normal Sans"));
        assert_eq!(table.unicode_ranges.names(), ["Basic Latin"]);
        assert_eq!(table.vendor_id, Tag::from_bytes(b"ABCD"));
        assert_eq!(table.vertical_metrics.unwrap().typo_ascender, 800);
        assert_eq!(table.code_page_ranges.unwrap().names(), ["1252 Latin 1"]);
        assert_eq!(table.glyph_metrics.unwrap().x_height, 500);
        assert_eq!(table.optical_size.unwrap().upper_point_size, 720);
    }

    #[test]
    fn version_1() {
        let table = decode(&table_data(1, V1_SIZE));
        assert!(table.is_complete());
        assert!(table.data.code_page_ranges.is_some());
        assert!(table.data.glyph_metrics.is_none());
        assert!(table.data.optical_size.is_none());
    }

    #[test]
    fn apple_version_0() {
        let table = decode(&table_data(0, APPLE_V0_SIZE));
        assert!(table.is_complete());
        assert!(table.data.vertical_metrics.is_none());
    }

    #[test]
    fn declared_version_exceeds_length() {
        let table = decode(&table_data(4, V1_SIZE));
        assert!(matches!(table.status, Status::Partial(_)));
        assert!(table.data.code_page_ranges.is_some());
        assert!(table.data.glyph_metrics.is_none());
    }

    #[test]
    fn unsupported_version() {
        assert!(decode(&table_data(6, V5_SIZE)).is_error());
    }

    #[test]
    fn truncated() {
        let data = table_data(5, V5_SIZE);
        for len in 0..10 {
            assert!(decode(&data[..len]).is_error());
        }
        for len in 10..V5_SIZE {
            let table = decode(&data[..len]);
            assert!(matches!(table.status, Status::Partial(_)), "{} bytes", len);
            assert_eq!(table.data.weight_class, 700);
        }
    }

    #[test]
    fn truncated_after_fs_type() {
        let table = decode(&table_data(4, V0_SIZE)[..20]);
        assert!(matches!(table.status, Status::Partial(_)));
        let table = table.data;
        assert_eq!(table.weight_name, "Bold");
        assert_eq!(table.width_class, 3);
        assert!(table.fs_type.preview_and_print);
        assert_eq!(table.vendor_id, Tag::default());
        assert!(table.vertical_metrics.is_none());
    }
}
