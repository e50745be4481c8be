// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-6-trimmed-table-mapping

use serde::Serialize;

use crate::parser::Stream;
use crate::Result;

/// A format 6 summary.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct TrimmedTable {
    pub language: u16,
    pub first_code: u16,
    pub entry_count: u16,
}

pub fn summarize(data: &[u8]) -> Result<TrimmedTable> {
    let mut s = Stream::new(data);
    s.skip::<u16>(); // format
    s.skip::<u16>(); // length
    let language = s.read::<u16>()?;
    let first_code = s.read::<u16>()?;
    let entry_count = s.read::<u16>()?;
    s.read_array16::<u16>(entry_count)?;
    Ok(TrimmedTable { language, first_code, entry_count })
}
