//! A [Compact Font Format Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/cff) implementation.
//!
//! Charstrings are counted, never interpreted.

// Useful links:
// http://wwwimages.adobe.com/content/dam/Adobe/en/devnet/font/pdfs/5176.CFF.pdf

pub(crate) mod dict;
pub(crate) mod index;

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::Stream;
use crate::{DecodeError, DecodeResult, Result, Tag};
use dict::{DictionaryParser, MAX_OPERANDS_LEN};
use index::{parse_index, Index};

/// The number of predefined strings. Custom string IDs start after them.
const STANDARD_STRINGS_COUNT: u16 = 391;

/// Enumerates some operators defined in the Adobe Technical Note #5176,
/// Table 9 Top DICT Operator Entries
mod top_dict_operator {
    pub const FULL_NAME: u16                    = 2;
    pub const FAMILY_NAME: u16                  = 3;
    pub const WEIGHT: u16                       = 4;
    pub const CHARSET_OFFSET: u16               = 15;
    pub const CHAR_STRINGS_OFFSET: u16          = 17;
    pub const PRIVATE_DICT_SIZE_AND_OFFSET: u16 = 18;
    pub const CHAR_STRING_TYPE: u16             = 1206;
    pub const ROS: u16                          = 1230;
    pub const FD_ARRAY: u16                     = 1236;
    pub const FD_SELECT: u16                    = 1237;
}

/// Enumerates some operators defined in the Adobe Technical Note #5176,
/// Table 23 Private DICT Operators
mod private_dict_operator {
    pub const LOCAL_SUBROUTINES_OFFSET: u16 = 19;
}

/// Enumerates Charset IDs defined in the Adobe Technical Note #5176, Table 22
mod charset_id {
    pub const ISO_ADOBE: usize = 0;
    pub const EXPERT: usize = 1;
    pub const EXPERT_SUBSET: usize = 2;
}


/// A charset kind.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Charset {
    #[default]
    IsoAdobe,
    Expert,
    ExpertSubset,
    /// A custom charset with a format number.
    Custom { format: u8 },
}

/// A CID font `Registry-Ordering-Supplement`.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Ros {
    /// `None` when the string is a standard one or missing.
    pub registry: Option<String>,
    pub ordering: Option<String>,
    pub supplement: i32,
}

/// A [Compact Font Format Table](https://docs.microsoft.com/en-us/typography/opentype/spec/cff) summary.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub major_version: u8,
    pub minor_version: u8,
    pub header_size: u8,
    /// Names from the Name INDEX.
    pub font_names: Vec<String>,
    pub full_name: Option<String>,
    pub family_name: Option<String>,
    pub weight: Option<String>,
    /// The number of custom strings.
    pub string_count: u32,
    pub global_subr_count: u32,
    /// The CharStrings INDEX count.
    pub glyph_count: u32,
    pub char_string_type: i32,
    pub charset: Charset,
    pub is_cid_keyed: bool,
    pub ros: Option<Ros>,
    /// The number of Font DICTs in a CID font.
    pub font_dict_count: Option<u32>,
    /// The number of local subroutines of a non-CID font.
    pub local_subr_count: Option<u32>,
}

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, &mut notes);
    notes.finish(table)
}

#[derive(Default)]
struct TopDict {
    full_name: Option<u16>,
    family_name: Option<u16>,
    weight: Option<u16>,
    charset_offset: Option<usize>,
    char_strings_offset: Option<usize>,
    private_dict_range: Option<core::ops::Range<usize>>,
    char_string_type: Option<i32>,
    ros: Option<(u16, u16, i32)>,
    fd_array_offset: Option<usize>,
    fd_select_offset: Option<usize>,
}

fn parse(data: &[u8], notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);
    let major_version = s.read::<u8>()?;
    let minor_version = s.read::<u8>()?;
    let header_size = s.read::<u8>()?;
    s.skip::<u8>(); // absolute offset size

    if major_version != 1 {
        let version = u32::from(major_version) << 16 | u32::from(minor_version);
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"CFF "), version });
    }

    // Jump to Name INDEX. It's not necessarily right after the header.
    let mut s = Stream::new_at(data, usize::from(header_size))?;
    let names = parse_index(&mut s)?;
    let font_names = names.items().map(|n| String::from_utf8_lossy(n).into_owned()).collect();

    // The Top DICT INDEX should have only one dictionary.
    let top_dicts = parse_index(&mut s)?;
    if top_dicts.len() != 1 {
        notes.push(format!("CFF has {} Top DICTs", top_dicts.len()));
    }
    let top_dict = top_dicts.get(0).map(parse_top_dict).unwrap_or_default();

    let strings = parse_index(&mut s)?;
    let mut table = Table {
        major_version,
        minor_version,
        header_size,
        font_names,
        full_name: top_dict.full_name.and_then(|sid| custom_string(&strings, sid)),
        family_name: top_dict.family_name.and_then(|sid| custom_string(&strings, sid)),
        weight: top_dict.weight.and_then(|sid| custom_string(&strings, sid)),
        string_count: strings.len(),
        char_string_type: top_dict.char_string_type.unwrap_or(2),
        is_cid_keyed: top_dict.ros.is_some(),
        ros: top_dict.ros.map(|(registry, ordering, supplement)| Ros {
            registry: custom_string(&strings, registry),
            ordering: custom_string(&strings, ordering),
            supplement,
        }),
        ..Table::default()
    };

    match parse_index(&mut s) {
        Ok(subrs) => table.global_subr_count = subrs.len(),
        Err(e) => notes.skipped("global subroutines", e),
    }

    match top_dict.char_strings_offset {
        Some(offset) => match Stream::new_at(data, offset).and_then(|mut s| parse_index(&mut s)) {
            // 'The number of glyphs is the value of the count field in the CharStrings INDEX.'
            Ok(char_strings) => table.glyph_count = char_strings.len(),
            Err(e) => notes.skipped("CharStrings INDEX", e),
        },
        None => notes.push("CFF Top DICT has no CharStrings offset"),
    }

    table.charset = match top_dict.charset_offset {
        Some(charset_id::ISO_ADOBE) | None => Charset::IsoAdobe,
        Some(charset_id::EXPERT) => Charset::Expert,
        Some(charset_id::EXPERT_SUBSET) => Charset::ExpertSubset,
        Some(offset) => match Stream::read_at::<u8>(data, offset) {
            Ok(format) => Charset::Custom { format },
            Err(e) => {
                notes.skipped("charset", e);
                Charset::IsoAdobe
            }
        },
    };

    if table.is_cid_keyed {
        if matches!(table.charset, Charset::IsoAdobe | Charset::Expert | Charset::ExpertSubset) {
            // 'There are no predefined charsets for CID fonts.'
            notes.push("CID-keyed CFF uses a predefined charset");
        }

        match top_dict.fd_array_offset {
            Some(offset) => match Stream::new_at(data, offset).and_then(|mut s| parse_index(&mut s)) {
                Ok(fd_array) => table.font_dict_count = Some(fd_array.len()),
                Err(e) => notes.skipped("FDArray", e),
            },
            None => notes.push("CID-keyed CFF has no FDArray"),
        }

        if top_dict.fd_select_offset.is_none() {
            notes.push("CID-keyed CFF has no FDSelect");
        }
    } else if let Some(range) = top_dict.private_dict_range {
        match local_subrs(data, range) {
            Ok(count) => table.local_subr_count = count,
            Err(e) => notes.skipped("local subroutines", e),
        }
    }

    Ok(table)
}

fn parse_top_dict(data: &[u8]) -> TopDict {
    let mut top_dict = TopDict::default();
    let mut operands_buffer = [0; MAX_OPERANDS_LEN];
    let mut dict_parser = DictionaryParser::new(data, &mut operands_buffer);
    while let Some(operator) = dict_parser.parse_next() {
        match operator.get() {
            top_dict_operator::FULL_NAME => top_dict.full_name = parse_sid(&mut dict_parser),
            top_dict_operator::FAMILY_NAME => top_dict.family_name = parse_sid(&mut dict_parser),
            top_dict_operator::WEIGHT => top_dict.weight = parse_sid(&mut dict_parser),
            top_dict_operator::CHARSET_OFFSET => {
                top_dict.charset_offset = dict_parser.parse_offset();
            }
            top_dict_operator::CHAR_STRINGS_OFFSET => {
                top_dict.char_strings_offset = dict_parser.parse_offset();
            }
            top_dict_operator::PRIVATE_DICT_SIZE_AND_OFFSET => {
                top_dict.private_dict_range = dict_parser.parse_range();
            }
            top_dict_operator::CHAR_STRING_TYPE => {
                top_dict.char_string_type = dict_parser.parse_operands().and_then(|_| dict_parser.operands().first().copied());
            }
            top_dict_operator::ROS => {
                top_dict.ros = dict_parser.parse_operands().and_then(|_| match *dict_parser.operands() {
                    [registry, ordering, supplement] => {
                        Some((u16::try_from(registry).ok()?, u16::try_from(ordering).ok()?, supplement))
                    }
                    // Still a CID font, even with broken operands.
                    _ => Some((0, 0, 0)),
                });
            }
            top_dict_operator::FD_ARRAY => {
                top_dict.fd_array_offset = dict_parser.parse_offset();
            }
            top_dict_operator::FD_SELECT => {
                top_dict.fd_select_offset = dict_parser.parse_offset();
            }
            _ => {}
        }
    }

    top_dict
}

fn parse_sid(dict_parser: &mut DictionaryParser) -> Option<u16> {
    dict_parser.parse_offset().and_then(|n| u16::try_from(n).ok())
}

fn custom_string(strings: &Index, sid: u16) -> Option<String> {
    let index = sid.checked_sub(STANDARD_STRINGS_COUNT)?;
    strings.get(u32::from(index)).map(|s| String::from_utf8_lossy(s).into_owned())
}

fn local_subrs(data: &[u8], private_dict_range: core::ops::Range<usize>) -> Result<Option<u32>> {
    let private_dict = data.get(private_dict_range.clone()).ok_or(DecodeError::MalformedOffset {
        what: "Private DICT",
        offset: private_dict_range.start,
        length: data.len(),
    })?;

    let mut operands_buffer = [0; MAX_OPERANDS_LEN];
    let mut dict_parser = DictionaryParser::new(private_dict, &mut operands_buffer);
    let mut subrs_offset = None;
    while let Some(operator) = dict_parser.parse_next() {
        if operator.get() == private_dict_operator::LOCAL_SUBROUTINES_OFFSET {
            subrs_offset = dict_parser.parse_offset();
            break;
        }
    }

    match subrs_offset {
        // 'The local subroutines offset is relative to the beginning
        // of the Private DICT data.'
        Some(offset) => {
            let start = private_dict_range.start.saturating_add(offset);
            let mut s = Stream::new_at(data, start)?;
            Ok(Some(parse_index(&mut s)?.len()))
        }
        None => Ok(None),
    }
}
