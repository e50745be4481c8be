// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-13-many-to-one-range-mappings

use serde::Serialize;

use crate::parser::Stream;
use crate::Result;

use super::format12::{read_groups, GroupStats};

/// A format 13 summary.
///
/// Same layout as format 12, but every code in a group maps to one glyph.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct ManyToOneRanges {
    pub language: u32,
    pub groups: GroupStats,
}

pub fn summarize(data: &[u8]) -> Result<ManyToOneRanges> {
    let mut s = Stream::new(data);
    s.skip::<u16>(); // format
    s.skip::<u16>(); // reserved
    s.skip::<u32>(); // length
    let language = s.read::<u32>()?;
    let groups = read_groups(&mut s)?;
    Ok(ManyToOneRanges { language, groups })
}
