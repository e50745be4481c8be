//! Labels for [platform, encoding, language and name IDs](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/name#name-ids).

/// A list of name IDs.
pub mod name_id {
    #![allow(missing_docs)]

    pub const COPYRIGHT_NOTICE: u16                     = 0;
    pub const FAMILY: u16                               = 1;
    pub const SUBFAMILY: u16                            = 2;
    pub const UNIQUE_ID: u16                            = 3;
    pub const FULL_NAME: u16                            = 4;
    pub const VERSION: u16                              = 5;
    pub const POST_SCRIPT_NAME: u16                     = 6;
    pub const TRADEMARK: u16                            = 7;
    pub const MANUFACTURER: u16                         = 8;
    pub const DESIGNER: u16                             = 9;
    pub const DESCRIPTION: u16                          = 10;
    pub const VENDOR_URL: u16                           = 11;
    pub const DESIGNER_URL: u16                         = 12;
    pub const LICENSE: u16                              = 13;
    pub const LICENSE_URL: u16                          = 14;
    //        RESERVED                                  = 15
    pub const TYPOGRAPHIC_FAMILY: u16                   = 16;
    pub const TYPOGRAPHIC_SUBFAMILY: u16                = 17;
    pub const COMPATIBLE_FULL: u16                      = 18;
    pub const SAMPLE_TEXT: u16                          = 19;
    pub const POST_SCRIPT_CID: u16                      = 20;
    pub const WWS_FAMILY: u16                           = 21;
    pub const WWS_SUBFAMILY: u16                        = 22;
    pub const LIGHT_BACKGROUND_PALETTE: u16             = 23;
    pub const DARK_BACKGROUND_PALETTE: u16              = 24;
    pub const VARIATIONS_POST_SCRIPT_NAME_PREFIX: u16   = 25;

    /// The last predefined name ID.
    pub const LAST_PREDEFINED: u16                      = 25;
    /// The first font-specific name ID.
    pub const FIRST_FONT_SPECIFIC: u16                  = 256;
}

pub const PLATFORM_UNICODE: u16 = 0;
pub const PLATFORM_MACINTOSH: u16 = 1;
pub const PLATFORM_ISO: u16 = 2;
pub const PLATFORM_WINDOWS: u16 = 3;
pub const PLATFORM_CUSTOM: u16 = 4;

/// Windows `en-US`.
pub const WINDOWS_ENGLISH_US: u16 = 0x0409;

/// Returns a name ID label.
pub fn name_id_label(id: u16) -> &'static str {
    match id {
        0 => "Copyright notice",
        1 => "Font family name",
        2 => "Font subfamily name",
        3 => "Unique font identifier",
        4 => "Full font name",
        5 => "Version string",
        6 => "PostScript name",
        7 => "Trademark",
        8 => "Manufacturer name",
        9 => "Designer",
        10 => "Description",
        11 => "Vendor URL",
        12 => "Designer URL",
        13 => "License description",
        14 => "License info URL",
        15 => "Reserved",
        16 => "Typographic family name",
        17 => "Typographic subfamily name",
        18 => "Compatible full name",
        19 => "Sample text",
        20 => "PostScript CID findfont name",
        21 => "WWS family name",
        22 => "WWS subfamily name",
        23 => "Light background palette",
        24 => "Dark background palette",
        25 => "Variations PostScript name prefix",
        26..=255 => "Reserved",
        _ => "Font-specific",
    }
}

/// Returns a platform ID label.
pub fn platform_label(platform_id: u16) -> &'static str {
    match platform_id {
        PLATFORM_UNICODE => "Unicode",
        PLATFORM_MACINTOSH => "Macintosh",
        PLATFORM_ISO => "ISO",
        PLATFORM_WINDOWS => "Windows",
        PLATFORM_CUSTOM => "Custom",
        _ => "Unknown",
    }
}

/// Returns an encoding ID label. Encoding IDs are platform-specific.
pub fn encoding_label(platform_id: u16, encoding_id: u16) -> &'static str {
    match (platform_id, encoding_id) {
        (PLATFORM_UNICODE, 0) => "Unicode 1.0",
        (PLATFORM_UNICODE, 1) => "Unicode 1.1",
        (PLATFORM_UNICODE, 2) => "ISO/IEC 10646",
        (PLATFORM_UNICODE, 3) => "Unicode 2.0 BMP",
        (PLATFORM_UNICODE, 4) => "Unicode 2.0 full",
        (PLATFORM_UNICODE, 5) => "Unicode variation sequences",
        (PLATFORM_UNICODE, 6) => "Unicode full",

        (PLATFORM_MACINTOSH, 0) => "Roman",
        (PLATFORM_MACINTOSH, 1) => "Japanese",
        (PLATFORM_MACINTOSH, 2) => "Chinese (Traditional)",
        (PLATFORM_MACINTOSH, 3) => "Korean",
        (PLATFORM_MACINTOSH, 4) => "Arabic",
        (PLATFORM_MACINTOSH, 5) => "Hebrew",
        (PLATFORM_MACINTOSH, 6) => "Greek",
        (PLATFORM_MACINTOSH, 7) => "Russian",
        (PLATFORM_MACINTOSH, 8) => "RSymbol",
        (PLATFORM_MACINTOSH, 9) => "Devanagari",
        (PLATFORM_MACINTOSH, 21) => "Thai",
        (PLATFORM_MACINTOSH, 25) => "Chinese (Simplified)",
        (PLATFORM_MACINTOSH, 32) => "Uninterpreted",

        (PLATFORM_ISO, 0) => "7-bit ASCII",
        (PLATFORM_ISO, 1) => "ISO 10646",
        (PLATFORM_ISO, 2) => "ISO 8859-1",

        (PLATFORM_WINDOWS, 0) => "Symbol",
        (PLATFORM_WINDOWS, 1) => "Unicode BMP",
        (PLATFORM_WINDOWS, 2) => "ShiftJIS",
        (PLATFORM_WINDOWS, 3) => "PRC",
        (PLATFORM_WINDOWS, 4) => "Big5",
        (PLATFORM_WINDOWS, 5) => "Wansung",
        (PLATFORM_WINDOWS, 6) => "Johab",
        (PLATFORM_WINDOWS, 10) => "Unicode full repertoire",

        _ => "Unknown",
    }
}

/// Returns a language label.
///
/// Language IDs at or above `0x8000` refer to format 1 language tags
/// and are resolved by the name table itself.
pub fn language_label(platform_id: u16, language_id: u16) -> String {
    let label = match platform_id {
        PLATFORM_WINDOWS => windows_language(language_id),
        PLATFORM_MACINTOSH => mac_language(language_id),
        PLATFORM_UNICODE if language_id == 0 => Some("Default"),
        _ => None,
    };

    match label {
        Some(label) => label.to_string(),
        None => format!("Unknown (0x{:04X})", language_id),
    }
}

fn windows_language(id: u16) -> Option<&'static str> {
    let label = match id {
        0x0401 => "Arabic (Saudi Arabia)",
        0x0402 => "Bulgarian",
        0x0403 => "Catalan",
        0x0404 => "Chinese (Taiwan)",
        0x0405 => "Czech",
        0x0406 => "Danish",
        0x0407 => "German (Germany)",
        0x0408 => "Greek",
        0x0409 => "English (United States)",
        0x040A => "Spanish (Traditional Sort)",
        0x040B => "Finnish",
        0x040C => "French (France)",
        0x040D => "Hebrew",
        0x040E => "Hungarian",
        0x040F => "Icelandic",
        0x0410 => "Italian (Italy)",
        0x0411 => "Japanese",
        0x0412 => "Korean",
        0x0413 => "Dutch (Netherlands)",
        0x0414 => "Norwegian (Bokmal)",
        0x0415 => "Polish",
        0x0416 => "Portuguese (Brazil)",
        0x0418 => "Romanian",
        0x0419 => "Russian",
        0x041A => "Croatian",
        0x041B => "Slovak",
        0x041D => "Swedish (Sweden)",
        0x041E => "Thai",
        0x041F => "Turkish",
        0x0420 => "Urdu",
        0x0421 => "Indonesian",
        0x0422 => "Ukrainian",
        0x0423 => "Belarusian",
        0x0424 => "Slovenian",
        0x0425 => "Estonian",
        0x0426 => "Latvian",
        0x0427 => "Lithuanian",
        0x0429 => "Persian",
        0x042A => "Vietnamese",
        0x042D => "Basque",
        0x0439 => "Hindi",
        0x043E => "Malay (Malaysia)",
        0x0445 => "Bengali (India)",
        0x0449 => "Tamil",
        0x0804 => "Chinese (PRC)",
        0x0809 => "English (United Kingdom)",
        0x080A => "Spanish (Mexico)",
        0x0816 => "Portuguese (Portugal)",
        0x0C04 => "Chinese (Hong Kong)",
        0x0C07 => "German (Austria)",
        0x0C09 => "English (Australia)",
        0x0C0A => "Spanish (Modern Sort)",
        0x0C0C => "French (Canada)",
        0x1004 => "Chinese (Singapore)",
        0x1009 => "English (Canada)",
        _ => return None,
    };
    Some(label)
}

fn mac_language(id: u16) -> Option<&'static str> {
    let label = match id {
        0 => "English",
        1 => "French",
        2 => "German",
        3 => "Italian",
        4 => "Dutch",
        5 => "Swedish",
        6 => "Spanish",
        7 => "Danish",
        8 => "Portuguese",
        9 => "Norwegian",
        10 => "Hebrew",
        11 => "Japanese",
        12 => "Arabic",
        13 => "Finnish",
        14 => "Greek",
        15 => "Icelandic",
        16 => "Maltese",
        17 => "Turkish",
        18 => "Croatian",
        19 => "Chinese (Traditional)",
        20 => "Urdu",
        21 => "Hindi",
        22 => "Thai",
        23 => "Korean",
        24 => "Lithuanian",
        25 => "Polish",
        26 => "Hungarian",
        27 => "Estonian",
        28 => "Latvian",
        31 => "Persian",
        32 => "Russian",
        33 => "Chinese (Simplified)",
        37 => "Romanian",
        38 => "Czech",
        39 => "Slovak",
        40 => "Slovenian",
        45 => "Ukrainian",
        80 => "Vietnamese",
        81 => "Indonesian",
        _ => return None,
    };
    Some(label)
}
