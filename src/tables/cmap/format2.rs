// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-2-high-byte-mapping-through-table

use serde::Serialize;

use crate::parser::{FromData, Stream};
use crate::Result;

#[derive(Clone, Copy)]
struct SubHeaderRecord {
    first_code: u16,
    entry_count: u16,
}

impl FromData for SubHeaderRecord {
    const SIZE: usize = 8;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(SubHeaderRecord {
            first_code: s.read::<u16>().ok()?,
            entry_count: s.read::<u16>().ok()?,
            // id_delta and id_range_offset are not summarized.
        })
    }
}

/// A format 2 summary.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct HighByteMapping {
    pub language: u16,
    pub sub_header_count: u16,
    /// High bytes that start a two-byte character code.
    pub two_byte_high_bytes: u16,
    /// The total `entryCount` of all sub-headers.
    pub entry_count: u32,
}

pub fn summarize(data: &[u8]) -> Result<HighByteMapping> {
    let mut s = Stream::new(data);
    s.skip::<u16>(); // format
    s.skip::<u16>(); // length
    let language = s.read::<u16>()?;
    let sub_header_keys = s.read_array16::<u16>(256)?;

    // Keys are sub-header indices multiplied by 8. The largest one gives the count.
    let sub_header_count = sub_header_keys.into_iter().map(|n| n / 8).max().unwrap_or(0) + 1;
    let two_byte_high_bytes = sub_header_keys.into_iter().filter(|n| *n != 0).count() as u16;

    let sub_headers = s.read_array16::<SubHeaderRecord>(sub_header_count)?;
    let mut entry_count = 0u32;
    for header in sub_headers {
        if u32::from(header.first_code) + u32::from(header.entry_count) > 256 {
            log::debug!("cmap format 2 sub-header exceeds the low byte range");
        }
        entry_count += u32::from(header.entry_count);
    }

    Ok(HighByteMapping { language, sub_header_count, two_byte_high_bytes, entry_count })
}
