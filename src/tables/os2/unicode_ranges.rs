//! [Unicode character ranges](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/os2#ulunicoderange1-bits-031ulunicoderange2-bits-3263ulunicoderange3-bits-6495ulunicoderange4-bits-96127).

use serde::{Serialize, Serializer};

/// Block names for bits 0..=122. Higher bits are reserved.
const UNICODE_RANGES: [&str; 123] = [
    "Basic Latin",
    "Latin-1 Supplement",
    "Latin Extended-A",
    "Latin Extended-B",
    "IPA Extensions",
    "Spacing Modifier Letters",
    "Combining Diacritical Marks",
    "Greek and Coptic",
    "Coptic",
    "Cyrillic",
    "Armenian",
    "Hebrew",
    "Vai",
    "Arabic",
    "NKo",
    "Devanagari",
    "Bengali",
    "Gurmukhi",
    "Gujarati",
    "Oriya",
    "Tamil",
    "Telugu",
    "Kannada",
    "Malayalam",
    "Thai",
    "Lao",
    "Georgian",
    "Balinese",
    "Hangul Jamo",
    "Latin Extended Additional",
    "Greek Extended",
    "General Punctuation",
    "Superscripts And Subscripts",
    "Currency Symbols",
    "Combining Diacritical Marks For Symbols",
    "Letterlike Symbols",
    "Number Forms",
    "Arrows",
    "Mathematical Operators",
    "Miscellaneous Technical",
    "Control Pictures",
    "Optical Character Recognition",
    "Enclosed Alphanumerics",
    "Box Drawing",
    "Block Elements",
    "Geometric Shapes",
    "Miscellaneous Symbols",
    "Dingbats",
    "CJK Symbols And Punctuation",
    "Hiragana",
    "Katakana",
    "Bopomofo",
    "Hangul Compatibility Jamo",
    "Phags-pa",
    "Enclosed CJK Letters And Months",
    "CJK Compatibility",
    "Hangul Syllables",
    "Non-Plane 0",
    "Phoenician",
    "CJK Unified Ideographs",
    "Private Use Area (plane 0)",
    "CJK Strokes",
    "Alphabetic Presentation Forms",
    "Arabic Presentation Forms-A",
    "Combining Half Marks",
    "Vertical Forms",
    "Small Form Variants",
    "Arabic Presentation Forms-B",
    "Halfwidth And Fullwidth Forms",
    "Specials",
    "Tibetan",
    "Syriac",
    "Thaana",
    "Sinhala",
    "Myanmar",
    "Ethiopic",
    "Cherokee",
    "Unified Canadian Aboriginal Syllabics",
    "Ogham",
    "Runic",
    "Khmer",
    "Mongolian",
    "Braille Patterns",
    "Yi Syllables",
    "Tagalog",
    "Old Italic",
    "Gothic",
    "Deseret",
    "Byzantine Musical Symbols",
    "Mathematical Alphanumeric Symbols",
    "Private Use (plane 15)",
    "Variation Selectors",
    "Tags",
    "Limbu",
    "Tai Le",
    "New Tai Lue",
    "Buginese",
    "Glagolitic",
    "Tifinagh",
    "Yijing Hexagram Symbols",
    "Syloti Nagri",
    "Linear B Syllabary",
    "Ancient Greek Numbers",
    "Ugaritic",
    "Old Persian",
    "Shavian",
    "Osmanya",
    "Cypriot Syllabary",
    "Kharoshthi",
    "Tai Xuan Jing Symbols",
    "Cuneiform",
    "Counting Rod Numerals",
    "Sundanese",
    "Lepcha",
    "Ol Chiki",
    "Saurashtra",
    "Kayah Li",
    "Rejang",
    "Cham",
    "Ancient Symbols",
    "Phaistos Disc",
    "Carian",
    "Domino Tiles",
];

/// Returns the name of a Unicode range bit, or a `"Reserved bit N"` placeholder.
pub fn unicode_range_name(bit: u8) -> String {
    match UNICODE_RANGES.get(usize::from(bit)) {
        Some(name) => name.to_string(),
        None => format!("Reserved bit {}", bit),
    }
}

/// Decoded `ulUnicodeRange1..4` bits.
///
/// Serialized as a list of set bit names.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct UnicodeRanges(pub u128);

impl UnicodeRanges {
    /// Decodes four raw range values, `ulUnicodeRange1` first.
    pub fn decode(ranges: [u32; 4]) -> Self {
        let n = ranges
            .iter()
            .enumerate()
            .fold(0u128, |n, (i, r)| n | u128::from(*r) << (32 * i));
        UnicodeRanges(n)
    }

    /// Encodes bits back into four raw range values.
    pub fn encode(&self) -> [u32; 4] {
        [self.0 as u32, (self.0 >> 32) as u32, (self.0 >> 64) as u32, (self.0 >> 96) as u32]
    }

    /// Checks that a bit is set.
    #[inline]
    pub fn contains(&self, bit: u8) -> bool {
        bit < 128 && self.0 & (1 << bit) != 0
    }

    /// Returns names of set bits in bit order.
    pub fn names(&self) -> Vec<String> {
        (0..128).filter(|bit| self.contains(*bit)).map(unicode_range_name).collect()
    }
}

impl Serialize for UnicodeRanges {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

/// Returns names of the ranges set in raw `ulUnicodeRange1..4` values.
pub fn unicode_ranges(ranges: [u32; 4]) -> Vec<String> {
    UnicodeRanges::decode(ranges).names()
}
