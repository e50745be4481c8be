//! A [CVT Variations Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/cvar) implementation.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{F2Dot14, Offset, Offset16, Stream};
use crate::{DecodeError, DecodeResult, Result, Tag};

const SHARED_POINT_NUMBERS: u16 = 0x8000;
const COUNT_MASK: u16 = 0x0FFF;

const EMBEDDED_PEAK_TUPLE: u16 = 0x8000;
const INTERMEDIATE_REGION: u16 = 0x4000;
const PRIVATE_POINT_NUMBERS: u16 = 0x2000;

/// A tuple variation header.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct TupleVariation {
    pub data_size: u16,
    /// Empty when the tuple has no embedded peak, which `cvar` forbids.
    pub peak: Vec<F2Dot14>,
    pub intermediate_start: Option<Vec<F2Dot14>>,
    pub intermediate_end: Option<Vec<F2Dot14>>,
    pub private_point_numbers: bool,
}

/// A [CVT Variations Table](https://docs.microsoft.com/en-us/typography/opentype/spec/cvar).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub major_version: u16,
    pub minor_version: u16,
    pub tuple_variation_count: u16,
    pub shared_point_numbers: bool,
    pub data_offset: u16,
    /// Empty when the axis count is unknown.
    pub tuple_variations: Vec<TupleVariation>,
}

/// Decodes a table.
///
/// Tuple headers have an axis-dependent size,
/// so they are only decoded when `axis_count` from `fvar` is known.
pub fn decode(data: &[u8], axis_count: Option<u16>) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, axis_count, &mut notes);
    notes.finish(table)
}

fn parse(data: &[u8], axis_count: Option<u16>, notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);
    let major_version = s.read::<u16>()?;
    let minor_version = s.read::<u16>()?;
    if major_version != 1 {
        let version = u32::from(major_version) << 16 | u32::from(minor_version);
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"cvar"), version });
    }

    let count = s.read::<u16>()?;
    let data_offset = s.read::<Offset16>()?;
    let mut table = Table {
        major_version,
        minor_version,
        tuple_variation_count: count & COUNT_MASK,
        shared_point_numbers: count & SHARED_POINT_NUMBERS != 0,
        data_offset: data_offset.0,
        tuple_variations: Vec::new(),
    };

    let axis_count = match axis_count {
        Some(n) => n,
        None => {
            if table.tuple_variation_count != 0 {
                notes.push("tuple variation headers skipped: axis count is unknown");
            }
            return Ok(table);
        }
    };

    let mut total_size = 0usize;
    for index in 0..table.tuple_variation_count {
        match parse_tuple_header(&mut s, axis_count) {
            Ok(tuple) => {
                if tuple.peak.is_empty() {
                    notes.push(format!("tuple variation {} has no embedded peak", index));
                }
                total_size += usize::from(tuple.data_size);
                table.tuple_variations.push(tuple);
            }
            Err(e) => {
                notes.skipped(&format!("tuple variation {}", index), e);
                break;
            }
        }
    }

    if data_offset.to_usize().saturating_add(total_size) > data.len() {
        notes.push("tuple variation data extends past the end of the table");
    }

    Ok(table)
}

fn parse_tuple_header(s: &mut Stream, axis_count: u16) -> Result<TupleVariation> {
    let data_size = s.read::<u16>()?;
    let tuple_index = s.read::<u16>()?;

    let peak = if tuple_index & EMBEDDED_PEAK_TUPLE != 0 {
        s.read_vec::<F2Dot14>(axis_count)?
    } else {
        Vec::new()
    };

    let (intermediate_start, intermediate_end) = if tuple_index & INTERMEDIATE_REGION != 0 {
        (Some(s.read_vec::<F2Dot14>(axis_count)?), Some(s.read_vec::<F2Dot14>(axis_count)?))
    } else {
        (None, None)
    };

    Ok(TupleVariation {
        data_size,
        peak,
        intermediate_start,
        intermediate_end,
        private_point_numbers: tuple_index & PRIVATE_POINT_NUMBERS != 0,
    })
}
