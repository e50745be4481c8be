//! A [Font Header Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/head) implementation.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{Fixed, Stream};
use crate::{DecodeError, DecodeResult, Rect, Result, Tag};

const TABLE_SIZE: usize = 54;
const MAGIC_NUMBER: u32 = 0x5F0F3CF5;

/// Seconds between 1904-01-01 and 1970-01-01.
const MAC_EPOCH_OFFSET: i64 = 2_082_844_800;

/// An index format used by the [Index to Location Table](
/// https://docs.microsoft.com/en-us/typography/opentype/spec/loca).
#[allow(missing_docs)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub enum IndexToLocationFormat {
    #[default]
    Short,
    Long,
}


/// `macStyle` bits.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
#[allow(missing_docs)]
pub struct MacStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub outline: bool,
    pub shadow: bool,
    pub condensed: bool,
    pub extended: bool,
}

impl MacStyle {
    /// Decodes a raw `macStyle` value.
    pub fn decode(n: u16) -> Self {
        MacStyle {
            bold: n & 0x0001 != 0,
            italic: n & 0x0002 != 0,
            underline: n & 0x0004 != 0,
            outline: n & 0x0008 != 0,
            shadow: n & 0x0010 != 0,
            condensed: n & 0x0020 != 0,
            extended: n & 0x0040 != 0,
        }
    }

    /// Encodes bits back into a raw value.
    pub fn encode(&self) -> u16 {
        [self.bold, self.italic, self.underline, self.outline, self.shadow, self.condensed, self.extended]
            .iter()
            .enumerate()
            .filter(|(_, set)| **set)
            .fold(0, |n, (bit, _)| n | (1 << bit))
    }
}


/// A [Font Header Table](https://docs.microsoft.com/en-us/typography/opentype/spec/head).
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub major_version: u16,
    pub minor_version: u16,
    pub font_revision: Fixed,
    pub checksum_adjustment: u32,
    pub magic_number: u32,
    pub flags: u16,
    pub units_per_em: u16,
    /// Seconds since 1904-01-01 00:00 UTC.
    pub created: i64,
    /// Seconds since 1904-01-01 00:00 UTC.
    pub modified: i64,
    /// A bounding box that large enough to enclose any glyph from the face.
    pub global_bbox: Rect,
    pub mac_style: MacStyle,
    pub lowest_rec_ppem: u16,
    pub font_direction_hint: i16,
    pub index_to_location_format: IndexToLocationFormat,
    pub glyph_data_format: i16,
}

impl Table {
    /// Returns the creation time as a Unix timestamp.
    #[inline]
    pub fn created_unix(&self) -> i64 {
        self.created.saturating_sub(MAC_EPOCH_OFFSET)
    }

    /// Returns the modification time as a Unix timestamp.
    #[inline]
    pub fn modified_unix(&self) -> i64 {
        self.modified.saturating_sub(MAC_EPOCH_OFFSET)
    }
}

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, &mut notes);
    notes.finish(table)
}

pub(crate) fn parse(data: &[u8], notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);
    let major_version = s.read::<u16>()?;
    let minor_version = s.read::<u16>()?;
    if major_version != 1 {
        let version = u32::from(major_version) << 16 | u32::from(minor_version);
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"head"), version });
    }

    let font_revision = s.read::<Fixed>()?;
    let checksum_adjustment = s.read::<u32>()?;
    let magic_number = s.read::<u32>()?;
    let flags = s.read::<u16>()?;
    let units_per_em = s.read::<u16>()?;
    let created = s.read::<i64>()?;
    let modified = s.read::<i64>()?;
    let global_bbox = Rect {
        x_min: s.read::<i16>()?,
        y_min: s.read::<i16>()?,
        x_max: s.read::<i16>()?,
        y_max: s.read::<i16>()?,
    };
    let mac_style = MacStyle::decode(s.read::<u16>()?);
    let lowest_rec_ppem = s.read::<u16>()?;
    let font_direction_hint = s.read::<i16>()?;
    let index_to_location_format = match s.read::<i16>()? {
        0 => IndexToLocationFormat::Short,
        1 => IndexToLocationFormat::Long,
        n => return Err(DecodeError::InvalidValue { what: "indexToLocFormat", value: n as u32 }),
    };
    let glyph_data_format = s.read::<i16>()?;

    if magic_number != MAGIC_NUMBER {
        notes.push(format!("invalid magic number 0x{:08X}", magic_number));
    }

    if !(16..=16384).contains(&units_per_em) {
        notes.push(format!("unitsPerEm {} is outside of 16..=16384", units_per_em));
    }

    if data.len() > TABLE_SIZE {
        notes.push(format!("{} trailing bytes", data.len() - TABLE_SIZE));
    }

    Ok(Table {
        major_version,
        minor_version,
        font_revision,
        checksum_adjustment,
        magic_number,
        flags,
        units_per_em,
        created,
        modified,
        global_bbox,
        mac_style,
        lowest_rec_ppem,
        font_direction_hint,
        index_to_location_format,
        glyph_data_format,
    })
}
