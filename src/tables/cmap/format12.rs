// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-12-segmented-coverage

use serde::Serialize;

use crate::parser::{FromData, Stream};
use crate::Result;

#[derive(Clone, Copy)]
struct SequentialMapGroup {
    start_char_code: u32,
    end_char_code: u32,
}

impl FromData for SequentialMapGroup {
    const SIZE: usize = 12;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(SequentialMapGroup {
            start_char_code: s.read::<u32>().ok()?,
            end_char_code: s.read::<u32>().ok()?,
            // start_glyph_id is not summarized.
        })
    }
}

/// Statistics over sequential or constant map groups.
///
/// Shared by formats 8, 12 and 13.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct GroupStats {
    pub group_count: u32,
    pub code_count: u64,
    pub first_code: Option<u32>,
    pub last_code: Option<u32>,
}

/// Reads `numGroups` followed by the groups.
pub(crate) fn read_groups(s: &mut Stream) -> Result<GroupStats> {
    let group_count = s.read::<u32>()?;
    let data = s.read_bytes((group_count as usize).saturating_mul(SequentialMapGroup::SIZE))?;

    let mut stats = GroupStats { group_count, ..GroupStats::default() };
    for chunk in data.chunks_exact(SequentialMapGroup::SIZE) {
        let group = match SequentialMapGroup::parse(chunk) {
            Some(v) => v,
            None => continue,
        };

        if group.start_char_code > group.end_char_code {
            continue;
        }

        stats.code_count += u64::from(group.end_char_code - group.start_char_code) + 1;
        stats.first_code = Some(stats.first_code.map_or(group.start_char_code, |n| n.min(group.start_char_code)));
        stats.last_code = Some(stats.last_code.map_or(group.end_char_code, |n| n.max(group.end_char_code)));
    }

    Ok(stats)
}

/// A format 12 summary.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct SegmentedCoverage {
    pub language: u32,
    pub groups: GroupStats,
}

pub fn summarize(data: &[u8]) -> Result<SegmentedCoverage> {
    let mut s = Stream::new(data);
    s.skip::<u16>(); // format
    s.skip::<u16>(); // reserved
    s.skip::<u32>(); // length
    let language = s.read::<u32>()?;
    let groups = read_groups(&mut s)?;
    Ok(SegmentedCoverage { language, groups })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups() {
        let data = &[
            0x00, 0x0C, // format: 12
            0x00, 0x00, // reserved
            0x00, 0x00, 0x00, 0x34, // length: 52
            0x00, 0x00, 0x00, 0x00, // language: 0
            0x00, 0x00, 0x00, 0x03, // number of groups: 3
            // group [0]
            0x00, 0x00, 0x00, 0x41, // start char code: 65
            0x00, 0x00, 0x00, 0x43, // end char code: 67
            0x00, 0x00, 0x00, 0x01, // start glyph ID: 1
            // group [1]
            0x00, 0x01, 0xF6, 0x00, // start char code: 0x1F600
            0x00, 0x01, 0xF6, 0x00, // end char code: 0x1F600
            0x00, 0x00, 0x00, 0x04, // start glyph ID: 4
            // group [2], inverted
            0x00, 0x00, 0x00, 0x50, // start char code: 80
            0x00, 0x00, 0x00, 0x40, // end char code: 64
            0x00, 0x00, 0x00, 0x05, // start glyph ID: 5
        ];

        let summary = summarize(data).unwrap();
        assert_eq!(summary.groups, GroupStats {
            group_count: 3,
            code_count: 4,
            first_code: Some(65),
            last_code: Some(0x1F600),
        });
    }

    #[test]
    fn huge_group_count() {
        let data = &[
            0x00, 0x0C, // format: 12
            0x00, 0x00, // reserved
            0x00, 0x00, 0x00, 0x10, // length: 16
            0x00, 0x00, 0x00, 0x00, // language: 0
            0xFF, 0xFF, 0xFF, 0xFF, // number of groups: 4294967295
        ];
        assert!(summarize(data).is_err());
    }
}
