// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values

use serde::Serialize;

use crate::parser::Stream;
use crate::{DecodeError, Result};

/// A format 4 summary.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct SegmentMapping {
    pub language: u16,
    pub segment_count: u16,
    /// The number of codes covered by segments. The final `0xFFFF` segment is excluded.
    pub code_count: u32,
    pub first_code: Option<u16>,
    pub last_code: Option<u16>,
    /// Segments that map through the glyph ID array instead of a delta.
    pub range_offset_segments: u16,
}

pub fn summarize(data: &[u8]) -> Result<SegmentMapping> {
    let mut s = Stream::new(data);
    s.skip::<u16>(); // format
    s.skip::<u16>(); // length
    let language = s.read::<u16>()?;
    let seg_count_x2 = s.read::<u16>()?;
    if seg_count_x2 % 2 != 0 {
        return Err(DecodeError::InvalidValue { what: "cmap format 4 segCountX2", value: u32::from(seg_count_x2) });
    }

    let segment_count = seg_count_x2 / 2;
    s.advance(6); // searchRange + entrySelector + rangeShift

    let end_codes = s.read_array16::<u16>(segment_count)?;
    s.skip::<u16>(); // reservedPad
    let start_codes = s.read_array16::<u16>(segment_count)?;
    s.read_array16::<i16>(segment_count)?; // idDelta
    let id_range_offsets = s.read_array16::<u16>(segment_count)?;

    let mut code_count = 0u32;
    let mut first_code = None;
    let mut last_code = None;
    for (start, end) in start_codes.into_iter().zip(end_codes) {
        if start == 0xFFFF && end == 0xFFFF {
            continue;
        }

        // An inverted segment covers nothing.
        if start > end {
            continue;
        }

        code_count += u32::from(end - start) + 1;
        first_code = Some(first_code.map_or(start, |n: u16| n.min(start)));
        last_code = Some(last_code.map_or(end, |n: u16| n.max(end)));
    }

    let range_offset_segments = id_range_offsets.into_iter().filter(|n| *n != 0).count() as u16;

    Ok(SegmentMapping {
        language,
        segment_count,
        code_count,
        first_code,
        last_code,
        range_offset_segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_segments() {
        let data = &[
            0x00, 0x04, // format: 4
            0x00, 0x28, // subtable size: 40
            0x00, 0x00, // language ID: 0
            0x00, 0x06, // 2 x segCount: 6
            0x00, 0x04, // search range: 4
            0x00, 0x01, // entry selector: 1
            0x00, 0x02, // range shift: 2
            // End character codes
            0x00, 0x45, // char code [0]: 69
            0x00, 0x5A, // char code [1]: 90
            0xFF, 0xFF, // char code [2]: 65535
            0x00, 0x00, // reserved: 0
            // Start character codes
            0x00, 0x41, // char code [0]: 65
            0x00, 0x50, // char code [1]: 80
            0xFF, 0xFF, // char code [2]: 65535
            // Deltas
            0xFF, 0xC0, // delta [0]: -64
            0xFF, 0xC0, // delta [1]: -64
            0x00, 0x01, // delta [2]: 1
            // Offsets into Glyph index array
            0x00, 0x00, // offset [0]: 0
            0x00, 0x00, // offset [1]: 0
            0x00, 0x00, // offset [2]: 0
        ];

        let summary = summarize(data).unwrap();
        assert_eq!(summary.segment_count, 3);
        assert_eq!(summary.code_count, 5 + 11);
        assert_eq!(summary.first_code, Some(65));
        assert_eq!(summary.last_code, Some(90));
        assert_eq!(summary.range_offset_segments, 0);
    }

    #[test]
    fn odd_seg_count() {
        let data = &[
            0x00, 0x04, // format: 4
            0x00, 0x10, // subtable size: 16
            0x00, 0x00, // language ID: 0
            0x00, 0x03, // 2 x segCount: 3
        ];
        assert!(summarize(data).is_err());
    }
}
