//! [Code page character ranges](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/os2#ulcodepagerange).

use serde::{Serialize, Serializer};

/// Code page names for bits 0..=63. `None` is reserved.
const CODE_PAGES: [Option<&str>; 64] = [
    Some("1252 Latin 1"),
    Some("1250 Latin 2: Eastern Europe"),
    Some("1251 Cyrillic"),
    Some("1253 Greek"),
    Some("1254 Turkish"),
    Some("1255 Hebrew"),
    Some("1256 Arabic"),
    Some("1257 Windows Baltic"),
    Some("1258 Vietnamese"),
    None, None, None, None, None, None, None,
    Some("874 Thai"),
    Some("932 JIS/Japan"),
    Some("936 Chinese: Simplified"),
    Some("949 Korean Wansung"),
    Some("950 Chinese: Traditional"),
    Some("1361 Korean Johab"),
    None, None, None, None, None, None, None,
    Some("Macintosh Character Set (US Roman)"),
    Some("OEM Character Set"),
    Some("Symbol Character Set"),
    None, None, None, None, None, None, None, None,
    None, None, None, None, None, None, None, None,
    Some("869 IBM Greek"),
    Some("866 MS-DOS Russian"),
    Some("865 MS-DOS Nordic"),
    Some("864 Arabic"),
    Some("863 MS-DOS Canadian French"),
    Some("862 Hebrew"),
    Some("861 MS-DOS Icelandic"),
    Some("860 MS-DOS Portuguese"),
    Some("857 IBM Turkish"),
    Some("855 IBM Cyrillic"),
    Some("852 Latin 2"),
    Some("775 MS-DOS Baltic"),
    Some("737 Greek"),
    Some("708 Arabic; ASMO 708"),
    Some("850 WE/Latin 1"),
    Some("437 US"),
];

/// Returns the name of a code page bit, or a `"Reserved bit N"` placeholder.
pub fn code_page_name(bit: u8) -> String {
    match CODE_PAGES.get(usize::from(bit)).copied().flatten() {
        Some(name) => name.to_string(),
        None => format!("Reserved bit {}", bit),
    }
}

/// Decoded `ulCodePageRange1` and `ulCodePageRange2` bits.
///
/// Serialized as a list of set bit names.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct CodePageRanges(pub u64);

impl CodePageRanges {
    /// Decodes both raw range values.
    #[inline]
    pub fn decode(range1: u32, range2: u32) -> Self {
        CodePageRanges(u64::from(range2) << 32 | u64::from(range1))
    }

    /// Encodes bits back into raw `(range1, range2)` values.
    #[inline]
    pub fn encode(&self) -> (u32, u32) {
        (self.0 as u32, (self.0 >> 32) as u32)
    }

    /// Checks that a bit is set.
    #[inline]
    pub fn contains(&self, bit: u8) -> bool {
        bit < 64 && self.0 & (1 << bit) != 0
    }

    /// Returns names of set bits in bit order.
    pub fn names(&self) -> Vec<String> {
        (0..64).filter(|bit| self.contains(*bit)).map(code_page_name).collect()
    }
}

impl Serialize for CodePageRanges {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

/// Returns names of the code pages set in raw `ulCodePageRange1` and `ulCodePageRange2` values.
pub fn code_page_ranges(range1: u32, range2: u32) -> Vec<String> {
    CodePageRanges::decode(range1, range2).names()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        assert_eq!(code_page_ranges(0x0000_0003, 0x8000_0000), ["1252 Latin 1", "1250 Latin 2: Eastern Europe", "437 US"]);
        assert_eq!(code_page_name(10), "Reserved bit 10");
    }

    #[test]
    fn round_trip() {
        let ranges = CodePageRanges::decode(0x2000_0001, 0x0001_0000);
        assert_eq!(ranges.encode(), (0x2000_0001, 0x0001_0000));
        assert!(ranges.contains(29));
        assert!(ranges.contains(48));
    }
}
