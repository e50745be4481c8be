/*!
A kerning table implementation.

Supports both
[OpenType](https://docs.microsoft.com/en-us/typography/opentype/spec/kern)
and
[Apple Advanced Typography](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6kern.html)
variants.

Only format 0 subtables are summarized. Other formats are listed and skipped.
*/

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{FromData, Stream};
use crate::{DecodeError, DecodeResult, Result, Tag};

const OT_HEADER_SIZE: usize = 6;
const AAT_HEADER_SIZE: usize = 8;

#[derive(Clone, Copy)]
struct KerningRecord {
    left: u16,
    right: u16,
    value: i16,
}

impl FromData for KerningRecord {
    const SIZE: usize = 6;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(KerningRecord {
            left: s.read::<u16>().ok()?,
            right: s.read::<u16>().ok()?,
            value: s.read::<i16>().ok()?,
        })
    }
}


/// A kerning table header variant.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub enum Variant {
    /// A Microsoft `kern` with a 16-bit version 0.
    #[default]
    OpenType,
    /// An Apple `kern` with a 32-bit version 1.0.
    Apple,
}

/// A kerning subtable summary.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Subtable {
    pub format: u8,
    pub is_horizontal: bool,
    pub has_cross_stream: bool,
    /// Apple only.
    pub is_variable: bool,
    /// `None` for formats other than 0.
    pub pair_count: Option<u16>,
    pub min_value: Option<i16>,
    pub max_value: Option<i16>,
}

/// A [Kerning Table](https://docs.microsoft.com/en-us/typography/opentype/spec/kern).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub variant: Variant,
    pub subtable_count: u32,
    pub subtables: Vec<Subtable>,
    /// The total number of format 0 pairs.
    pub pair_count: u32,
}

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, &mut notes);
    notes.finish(table)
}

fn parse(data: &[u8], notes: &mut Notes) -> Result<Table> {
    // The OpenType variant starts with a u16 version 0,
    // while the Apple one starts with a 16.16 version 1.0.
    // So the first two bytes are 0x0000 and 0x0001 respectively.
    let mut s = Stream::new(data);
    let (variant, subtable_count) = match s.read::<u16>()? {
        0 => (Variant::OpenType, u32::from(s.read::<u16>()?)),
        1 => {
            let minor = s.read::<u16>()?;
            if minor != 0 {
                return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"kern"), version: 0x10000 | u32::from(minor) });
            }
            (Variant::Apple, s.read::<u32>()?)
        }
        version => {
            return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"kern"), version: u32::from(version) });
        }
    };

    let mut table = Table { variant, subtable_count, ..Table::default() };
    for index in 0..subtable_count {
        if s.at_end() {
            notes.push(format!("{} of {} kerning subtables are missing", subtable_count - index, subtable_count));
            break;
        }

        let subtable = match variant {
            Variant::OpenType => parse_ot_subtable(&mut s, subtable_count == 1),
            Variant::Apple => parse_aat_subtable(&mut s),
        };

        let (mut subtable, data) = match subtable {
            Ok(v) => v,
            Err(e) => {
                notes.skipped(&format!("kerning subtable {}", index), e);
                break;
            }
        };

        if subtable.format == 0 {
            match parse_format0(data, &mut subtable) {
                Ok(()) => table.pair_count += u32::from(subtable.pair_count.unwrap_or(0)),
                Err(e) => notes.skipped(&format!("kerning subtable {}", index), e),
            }
        } else {
            notes.push(format!("kerning subtable {} has unsupported format {}", index, subtable.format));
        }

        table.subtables.push(subtable);
    }

    Ok(table)
}

fn parse_ot_subtable<'a>(s: &mut Stream<'a>, is_single: bool) -> Result<(Subtable, &'a [u8])> {
    s.skip::<u16>(); // version
    let length = s.read::<u16>()?;
    // In the OpenType variant, `format` comes first.
    let format = s.read::<u8>()?;
    let coverage = s.read::<u8>()?;

    let data_len = if is_single {
        // A single subtable may exceed the u16 length, which some fonts abuse.
        // Its data runs to the end of the table instead.
        s.remaining()
    } else {
        usize::from(length).checked_sub(OT_HEADER_SIZE).ok_or(DecodeError::InvalidValue {
            what: "kerning subtable length",
            value: u32::from(length),
        })?
    };

    let subtable = Subtable {
        format,
        is_horizontal: coverage & (1 << 0) != 0,
        has_cross_stream: coverage & (1 << 2) != 0,
        ..Subtable::default()
    };

    Ok((subtable, s.read_bytes(data_len)?))
}

fn parse_aat_subtable<'a>(s: &mut Stream<'a>) -> Result<(Subtable, &'a [u8])> {
    let length = s.read::<u32>()?;
    let coverage = s.read::<u8>()?;
    let format = s.read::<u8>()?;
    s.skip::<u16>(); // variation tuple index

    let data_len = (length as usize).checked_sub(AAT_HEADER_SIZE).ok_or(DecodeError::InvalidValue {
        what: "kerning subtable length",
        value: length,
    })?;

    let subtable = Subtable {
        format,
        is_horizontal: coverage & (1 << 7) == 0,
        has_cross_stream: coverage & (1 << 6) != 0,
        is_variable: coverage & (1 << 5) != 0,
        ..Subtable::default()
    };

    Ok((subtable, s.read_bytes(data_len)?))
}

fn parse_format0(data: &[u8], subtable: &mut Subtable) -> Result<()> {
    let mut s = Stream::new(data);
    let pair_count = s.read::<u16>()?;
    s.advance(6); // search_range (u16) + entry_selector (u16) + range_shift (u16)
    let pairs = s.read_array16::<KerningRecord>(pair_count)?;

    let mut unsorted = false;
    let mut prev = None;
    for pair in pairs {
        let key = u32::from(pair.left) << 16 | u32::from(pair.right);
        unsorted |= prev.map_or(false, |prev| prev > key);
        prev = Some(key);

        subtable.min_value = Some(subtable.min_value.map_or(pair.value, |n| n.min(pair.value)));
        subtable.max_value = Some(subtable.max_value.map_or(pair.value, |n| n.max(pair.value)));
    }

    if unsorted {
        log::debug!("kerning pairs are not sorted");
    }

    subtable.pair_count = Some(pair_count);
    Ok(())
}
