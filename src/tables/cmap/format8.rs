// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-8-mixed-16-bit-and-32-bit-coverage

use serde::Serialize;

use crate::parser::Stream;
use crate::Result;

use super::format12::{read_groups, GroupStats};

/// A format 8 summary.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct MixedCoverage {
    pub language: u32,
    /// Bytes of the `is32` array that mark at least one high word.
    pub is32_bytes_set: u16,
    pub groups: GroupStats,
}

pub fn summarize(data: &[u8]) -> Result<MixedCoverage> {
    let mut s = Stream::new(data);
    s.skip::<u16>(); // format
    s.skip::<u16>(); // reserved
    s.skip::<u32>(); // length
    let language = s.read::<u32>()?;
    let is32 = s.read_bytes(8192)?;
    let is32_bytes_set = is32.iter().filter(|b| **b != 0).count() as u16;
    let groups = read_groups(&mut s)?;
    Ok(MixedCoverage { language, is32_bytes_set, groups })
}
