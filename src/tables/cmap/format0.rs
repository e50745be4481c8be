// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-0-byte-encoding-table

use serde::Serialize;

use crate::parser::Stream;
use crate::Result;

/// A format 0 summary.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct ByteEncoding {
    pub language: u16,
    /// The number of codes mapped to a non-zero glyph.
    pub mapped_count: u16,
}

pub fn summarize(data: &[u8]) -> Result<ByteEncoding> {
    let mut s = Stream::new(data);
    s.skip::<u16>(); // format
    s.skip::<u16>(); // length
    let language = s.read::<u16>()?;

    // The array always has 256 entries, even when the font has fewer glyphs.
    let glyphs = s.read_bytes(256)?;
    let mapped_count = glyphs.iter().filter(|id| **id != 0).count() as u16;

    Ok(ByteEncoding { language, mapped_count })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapped_codes() {
        let mut data = vec![
            0x00, 0x00, // format: 0
            0x01, 0x06, // subtable size: 262
            0x00, 0x00, // language ID: 0
        ];
        data.extend_from_slice(&[0; 256]);
        data[6 + 0x41] = 17;
        data[6 + 0x42] = 18;

        assert_eq!(summarize(&data).unwrap(), ByteEncoding { language: 0, mapped_count: 2 });
        assert!(summarize(&data[..200]).is_err());
    }
}
