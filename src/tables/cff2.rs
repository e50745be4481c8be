//! A [Compact Font Format 2 Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/cff2) implementation.

// https://docs.microsoft.com/en-us/typography/opentype/spec/cff2charstr

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{slice_from, Stream};
use crate::tables::cff::dict::{DictionaryParser, MAX_OPERANDS_LEN};
use crate::tables::cff::index::parse_index32;
use crate::var_store::ItemVariationStoreSummary;
use crate::{DecodeError, DecodeResult, Result, Tag};

/// Enumerates some operators defined in the OpenType CFF2 specification,
/// Table 9 Top DICT Operator Entries
mod top_dict_operator {
    pub const CHAR_STRINGS_OFFSET: u16 = 17;
    pub const VARIATION_STORE_OFFSET: u16 = 24;
    pub const FONT_MATRIX: u16 = 1207;
    pub const FONT_DICT_INDEX_OFFSET: u16 = 1236;
    pub const FONT_DICT_SELECT_OFFSET: u16 = 1237;
}

/// A [Compact Font Format 2 Table](https://docs.microsoft.com/en-us/typography/opentype/spec/cff2) summary.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub major_version: u8,
    pub minor_version: u8,
    pub header_size: u8,
    pub top_dict_length: u16,
    pub global_subr_count: u32,
    /// The CharStrings INDEX count.
    pub glyph_count: u32,
    pub has_font_matrix: bool,
    pub font_dict_count: u32,
    pub has_fd_select: bool,
    pub item_variation_store: Option<ItemVariationStoreSummary>,
}

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, &mut notes);
    notes.finish(table)
}

#[derive(Default)]
struct TopDict {
    char_strings_offset: Option<usize>,
    variation_store_offset: Option<usize>,
    has_font_matrix: bool,
    font_dict_index_offset: Option<usize>,
    has_fd_select: bool,
}

fn parse(data: &[u8], notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);
    let major_version = s.read::<u8>()?;
    let minor_version = s.read::<u8>()?;
    let header_size = s.read::<u8>()?;
    let top_dict_length = s.read::<u16>()?;

    if major_version != 2 {
        let version = u32::from(major_version) << 16 | u32::from(minor_version);
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"CFF2"), version });
    }

    // Jump to Top DICT. It's not necessarily right after the header.
    let mut s = Stream::new_at(data, usize::from(header_size))?;
    let top_dict = parse_top_dict(s.read_bytes(usize::from(top_dict_length))?);

    let mut table = Table {
        major_version,
        minor_version,
        header_size,
        top_dict_length,
        has_font_matrix: top_dict.has_font_matrix,
        has_fd_select: top_dict.has_fd_select,
        ..Table::default()
    };

    // Global Subr INDEX follows the Top DICT.
    match parse_index32(&mut s) {
        Ok(subrs) => table.global_subr_count = subrs.len(),
        Err(e) => notes.skipped("global subroutines", e),
    }

    match top_dict.char_strings_offset {
        Some(offset) => match Stream::new_at(data, offset).and_then(|mut s| parse_index32(&mut s)) {
            Ok(char_strings) => table.glyph_count = char_strings.len(),
            Err(e) => notes.skipped("CharStrings INDEX", e),
        },
        None => notes.push("CFF2 Top DICT has no CharStrings offset"),
    }

    // 'FDArray is required for CFF2 fonts.'
    match top_dict.font_dict_index_offset {
        Some(offset) => match Stream::new_at(data, offset).and_then(|mut s| parse_index32(&mut s)) {
            Ok(fd_array) => table.font_dict_count = fd_array.len(),
            Err(e) => notes.skipped("FDArray", e),
        },
        None => notes.push("CFF2 Top DICT has no FDArray offset"),
    }

    if let Some(offset) = top_dict.variation_store_offset {
        // The store is prefixed with its length.
        let store = slice_from(data, offset, "variation store").and_then(|data| {
            let mut s = Stream::new(data);
            let length = s.read::<u16>()?;
            ItemVariationStoreSummary::parse(s.read_bytes(usize::from(length))?)
        });

        match store {
            Ok(store) => table.item_variation_store = Some(store),
            Err(e) => notes.skipped("variation store", e),
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
            top_dict_operator::CHAR_STRINGS_OFFSET => {
                top_dict.char_strings_offset = dict_parser.parse_offset();
            }
            top_dict_operator::VARIATION_STORE_OFFSET => {
                top_dict.variation_store_offset = dict_parser.parse_offset();
            }
            top_dict_operator::FONT_MATRIX => top_dict.has_font_matrix = true,
            top_dict_operator::FONT_DICT_INDEX_OFFSET => {
                top_dict.font_dict_index_offset = dict_parser.parse_offset();
            }
            top_dict_operator::FONT_DICT_SELECT_OFFSET => top_dict.has_fd_select = true,
            _ => {}
        }
    }

    top_dict
}
