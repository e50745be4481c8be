//! A [PostScript Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/post) implementation.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{Fixed, Stream};
use crate::{DecodeError, DecodeResult, Result, Tag};

const TABLE_SIZE: usize = 32;

const VERSION_1: u32 = 0x00010000;
const VERSION_2: u32 = 0x00020000;
const VERSION_2_5: u32 = 0x00025000;
const VERSION_3: u32 = 0x00030000;
const VERSION_4: u32 = 0x00040000;

/// The number of glyph names in the standard Macintosh order.
pub const STANDARD_NAMES_COUNT: usize = 258;

// https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6post.html
/// A list of Macintosh glyph names.
#[cfg(feature = "glyph-names")]
const MACINTOSH_NAMES: &[&str; STANDARD_NAMES_COUNT] = &[
    ".notdef",
    ".null",
    "nonmarkingreturn",
    "space",
    "exclam",
    "quotedbl",
    "numbersign",
    "dollar",
    "percent",
    "ampersand",
    "quotesingle",
    "parenleft",
    "parenright",
    "asterisk",
    "plus",
    "comma",
    "hyphen",
    "period",
    "slash",
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "colon",
    "semicolon",
    "less",
    "equal",
    "greater",
    "question",
    "at",
    "A",
    "B",
    "C",
    "D",
    "E",
    "F",
    "G",
    "H",
    "I",
    "J",
    "K",
    "L",
    "M",
    "N",
    "O",
    "P",
    "Q",
    "R",
    "S",
    "T",
    "U",
    "V",
    "W",
    "X",
    "Y",
    "Z",
    "bracketleft",
    "backslash",
    "bracketright",
    "asciicircum",
    "underscore",
    "grave",
    "a",
    "b",
    "c",
    "d",
    "e",
    "f",
    "g",
    "h",
    "i",
    "j",
    "k",
    "l",
    "m",
    "n",
    "o",
    "p",
    "q",
    "r",
    "s",
    "t",
    "u",
    "v",
    "w",
    "x",
    "y",
    "z",
    "braceleft",
    "bar",
    "braceright",
    "asciitilde",
    "Adieresis",
    "Aring",
    "Ccedilla",
    "Eacute",
    "Ntilde",
    "Odieresis",
    "Udieresis",
    "aacute",
    "agrave",
    "acircumflex",
    "adieresis",
    "atilde",
    "aring",
    "ccedilla",
    "eacute",
    "egrave",
    "ecircumflex",
    "edieresis",
    "iacute",
    "igrave",
    "icircumflex",
    "idieresis",
    "ntilde",
    "oacute",
    "ograve",
    "ocircumflex",
    "odieresis",
    "otilde",
    "uacute",
    "ugrave",
    "ucircumflex",
    "udieresis",
    "dagger",
    "degree",
    "cent",
    "sterling",
    "section",
    "bullet",
    "paragraph",
    "germandbls",
    "registered",
    "copyright",
    "trademark",
    "acute",
    "dieresis",
    "notequal",
    "AE",
    "Oslash",
    "infinity",
    "plusminus",
    "lessequal",
    "greaterequal",
    "yen",
    "mu",
    "partialdiff",
    "summation",
    "product",
    "pi",
    "integral",
    "ordfeminine",
    "ordmasculine",
    "Omega",
    "ae",
    "oslash",
    "questiondown",
    "exclamdown",
    "logicalnot",
    "radical",
    "florin",
    "approxequal",
    "Delta",
    "guillemotleft",
    "guillemotright",
    "ellipsis",
    "nonbreakingspace",
    "Agrave",
    "Atilde",
    "Otilde",
    "OE",
    "oe",
    "endash",
    "emdash",
    "quotedblleft",
    "quotedblright",
    "quoteleft",
    "quoteright",
    "divide",
    "lozenge",
    "ydieresis",
    "Ydieresis",
    "fraction",
    "currency",
    "guilsinglleft",
    "guilsinglright",
    "fi",
    "fl",
    "daggerdbl",
    "periodcentered",
    "quotesinglbase",
    "quotedblbase",
    "perthousand",
    "Acircumflex",
    "Ecircumflex",
    "Aacute",
    "Edieresis",
    "Egrave",
    "Iacute",
    "Icircumflex",
    "Idieresis",
    "Igrave",
    "Oacute",
    "Ocircumflex",
    "apple",
    "Ograve",
    "Uacute",
    "Ucircumflex",
    "Ugrave",
    "dotlessi",
    "circumflex",
    "tilde",
    "macron",
    "breve",
    "dotaccent",
    "ring",
    "cedilla",
    "hungarumlaut",
    "ogonek",
    "caron",
    "Lslash",
    "lslash",
    "Scaron",
    "scaron",
    "Zcaron",
    "zcaron",
    "brokenbar",
    "Eth",
    "eth",
    "Yacute",
    "yacute",
    "Thorn",
    "thorn",
    "minus",
    "multiply",
    "onesuperior",
    "twosuperior",
    "threesuperior",
    "onehalf",
    "onequarter",
    "threequarters",
    "franc",
    "Gbreve",
    "gbreve",
    "Idotaccent",
    "Scedilla",
    "scedilla",
    "Cacute",
    "cacute",
    "Ccaron",
    "ccaron",
    "dcroat",
];

/// Returns a glyph name in the standard Macintosh order.
///
/// Always `None` when the `glyph-names` feature is disabled.
pub fn standard_name(index: u16) -> Option<&'static str> {
    #[cfg(feature = "glyph-names")]
    {
        MACINTOSH_NAMES.get(usize::from(index)).copied()
    }

    #[cfg(not(feature = "glyph-names"))]
    {
        let _ = index;
        None
    }
}


/// A [PostScript Table](https://docs.microsoft.com/en-us/typography/opentype/spec/post).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub version: Fixed,
    /// Italic angle in counter-clockwise degrees from the vertical.
    pub italic_angle: Fixed,
    pub underline_position: i16,
    pub underline_thickness: i16,
    pub is_fixed_pitch: bool,
    pub min_mem_type42: u32,
    pub max_mem_type42: u32,
    pub min_mem_type1: u32,
    pub max_mem_type1: u32,
    /// `numGlyphs` of formats 2.0 and 2.5.
    pub glyph_count: Option<u16>,
    /// The number of Pascal strings stored by format 2.0.
    pub custom_name_count: u32,
    /// Glyph names by glyph ID. Empty for formats 3.0 and 4.0.
    ///
    /// A name is `None` when its index points past the stored strings
    /// or when standard names are disabled.
    pub glyph_names: Vec<Option<String>>,
}

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, &mut notes);
    notes.finish(table)
}

fn parse(data: &[u8], notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);
    let version = s.read::<u32>()?;
    if !matches!(version, VERSION_1 | VERSION_2 | VERSION_2_5 | VERSION_3 | VERSION_4) {
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"post"), version });
    }

    let mut table = Table {
        version: Fixed(version as i32),
        italic_angle: s.read::<Fixed>()?,
        underline_position: s.read::<i16>()?,
        underline_thickness: s.read::<i16>()?,
        is_fixed_pitch: s.read::<u32>()? != 0,
        min_mem_type42: s.read::<u32>()?,
        max_mem_type42: s.read::<u32>()?,
        min_mem_type1: s.read::<u32>()?,
        max_mem_type1: s.read::<u32>()?,
        ..Table::default()
    };
    debug_assert_eq!(s.offset(), TABLE_SIZE);

    let names = match version {
        VERSION_1 => {
            Ok((0..STANDARD_NAMES_COUNT as u16).map(|i| standard_name(i).map(String::from)).collect())
        }
        VERSION_2 => parse_v2_names(&mut s, &mut table, notes),
        VERSION_2_5 => parse_v2_5_names(&mut s, &mut table),
        _ => Ok(Vec::new()),
    };

    match names {
        Ok(names) => table.glyph_names = names,
        Err(e) => notes.skipped("glyph names", e),
    }

    Ok(table)
}

fn parse_v2_names(s: &mut Stream, table: &mut Table, notes: &mut Notes) -> Result<Vec<Option<String>>> {
    let count = s.read::<u16>()?;
    table.glyph_count = Some(count);
    let indexes = s.read_array16::<u16>(count)?;

    // Pascal strings follow the index array until the end of the table.
    let mut strings = Vec::new();
    while !s.at_end() {
        let len = s.read::<u8>()?;
        match s.read_bytes(usize::from(len)) {
            Ok(bytes) => strings.push(String::from_utf8_lossy(bytes).into_owned()),
            Err(e) => {
                notes.skipped("glyph name string", e);
                break;
            }
        }
    }
    table.custom_name_count = u32::try_from(strings.len()).unwrap_or(u32::MAX);

    let mut missing = 0;
    let names: Vec<_> = indexes
        .into_iter()
        .map(|index| {
            // 'If the name index is between 258 and 65535, then subtract 258 and use that
            // to index into the list of Pascal strings at the end of the table.'
            let name = match usize::from(index).checked_sub(STANDARD_NAMES_COUNT) {
                None => standard_name(index).map(String::from),
                Some(index) => strings.get(index).cloned(),
            };

            if name.is_none() && usize::from(index) >= STANDARD_NAMES_COUNT {
                missing += 1;
            }

            name
        })
        .collect();

    if missing != 0 {
        notes.push(format!("{} glyph name indices point past the name strings", missing));
    }

    Ok(names)
}

fn parse_v2_5_names(s: &mut Stream, table: &mut Table) -> Result<Vec<Option<String>>> {
    let count = s.read::<u16>()?;
    table.glyph_count = Some(count);
    let offsets = s.read_array16::<i8>(count)?;

    Ok((0..count)
        .zip(offsets)
        .map(|(glyph, offset)| {
            let index = i32::from(glyph) + i32::from(offset);
            u16::try_from(index).ok().and_then(standard_name).map(String::from)
        })
        .collect())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    fn header(version: u32) -> Vec<u8> {
        let mut data = vec![0u8; TABLE_SIZE];
        data[0..4].copy_from_slice(&version.to_be_bytes());
        data[4..8].copy_from_slice(&(-12i32 << 16).to_be_bytes()); // italic angle: -12
        data[8..10].copy_from_slice(&(-100i16).to_be_bytes()); // underline position
        data[10..12].copy_from_slice(&50i16.to_be_bytes()); // underline thickness
        data[15] = 1; // is fixed pitch
        data
    }

    #[test]
    fn version_3() {
        let table = decode(&header(VERSION_3));
        assert!(table.is_complete());
        let table = table.data;
        assert_eq!(table.italic_angle.to_string(), "-12");
        assert_eq!(table.underline_position, -100);
        assert!(table.is_fixed_pitch);
        assert!(table.glyph_names.is_empty());
    }

    #[cfg(feature = "glyph-names")]
    #[test]
    fn version_2_names() {
        let mut data = header(VERSION_2);
        data.extend_from_slice(&[
            0x00, 0x03, // number of glyphs: 3
            0x00, 0x00, // glyph name index [0]: 0
            0x01, 0x02, // glyph name index [1]: 258
            0x00, 0x24, // glyph name index [2]: 36
            0x04, // string length: 4
            b'f', b'_', b'f', b'i',
        ]);

        let table = decode(&data);
        assert!(table.is_complete());
        assert_eq!(table.data.custom_name_count, 1);
        assert_eq!(table.data.glyph_names, vec![
            Some(".notdef".to_string()),
            Some("f_fi".to_string()),
            Some("A".to_string()),
        ]);
    }

    #[test]
    fn version_2_missing_string() {
        let mut data = header(VERSION_2);
        data.extend_from_slice(&[
            0x00, 0x01, // number of glyphs: 1
            0x01, 0x05, // glyph name index [0]: 261
        ]);

        let table = decode(&data);
        assert!(matches!(table.status, Status::Partial(_)));
        assert_eq!(table.data.glyph_names, vec![None]);
    }

    #[cfg(feature = "glyph-names")]
    #[test]
    fn more_strings_than_glyph_ids() {
        let mut data = header(VERSION_2);
        data.extend_from_slice(&[
            0x00, 0x01, // glyph count: 1
            0x01, 0x02, // name index [0]: 258
        ]);
        // Empty Pascal strings, more than a 16-bit count can hold.
        data.resize(data.len() + 70_000, 0);

        let table = decode(&data);
        assert!(table.is_complete());
        assert_eq!(table.data.custom_name_count, 70_000);
        assert_eq!(table.data.glyph_names, vec![Some(String::new())]);
    }

    #[test]
    fn version_2_5() {
        let mut data = header(VERSION_2_5);
        data.extend_from_slice(&[
            0x00, 0x02, // number of glyphs: 2
            0x00, // offset [0]: 0
            0x23, // offset [1]: 35
        ]);

        let table = decode(&data).data;
        assert_eq!(table.glyph_names, vec![Some(".notdef".to_string()), Some("A".to_string())]);
    }

    #[test]
    fn truncated_header() {
        let data = header(VERSION_1);
        for len in 0..TABLE_SIZE {
            assert!(decode(&data[..len]).is_error());
        }
    }

    #[test]
    fn unknown_version() {
        assert!(decode(&header(0x00050000)).is_error());
    }
}
