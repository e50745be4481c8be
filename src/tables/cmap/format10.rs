// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-10-trimmed-array

use serde::Serialize;

use crate::parser::Stream;
use crate::Result;

/// A format 10 summary.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct TrimmedArray {
    pub language: u32,
    pub start_code: u32,
    pub code_count: u32,
}

pub fn summarize(data: &[u8]) -> Result<TrimmedArray> {
    let mut s = Stream::new(data);
    s.skip::<u16>(); // format
    s.skip::<u16>(); // reserved
    s.skip::<u32>(); // length
    let language = s.read::<u32>()?;
    let start_code = s.read::<u32>()?;
    let code_count = s.read::<u32>()?;
    s.read_bytes((code_count as usize).saturating_mul(2))?;
    Ok(TrimmedArray { language, start_code, code_count })
}
