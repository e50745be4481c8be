mod directory;
mod metrics;
mod truncation;
#[cfg(feature = "opentype-layout")]
mod gsub;
#[cfg(feature = "variable-fonts")]
mod variations;

#[allow(dead_code)]
#[derive(Clone, Copy)]
pub enum Unit {
    Raw(u8),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Fixed(f32),
    RawTag(&'static [u8; 4]),
}

pub fn convert(units: &[Unit]) -> Vec<u8> {
    let mut data = Vec::with_capacity(256);
    for v in units {
        convert_unit(*v, &mut data);
    }

    data
}

fn convert_unit(unit: Unit, data: &mut Vec<u8>) {
    match unit {
        Unit::Raw(n) => data.push(n),
        Unit::Int8(n) => data.extend_from_slice(&i8::to_be_bytes(n)),
        Unit::UInt8(n) => data.extend_from_slice(&u8::to_be_bytes(n)),
        Unit::Int16(n) => data.extend_from_slice(&i16::to_be_bytes(n)),
        Unit::UInt16(n) => data.extend_from_slice(&u16::to_be_bytes(n)),
        Unit::Int32(n) => data.extend_from_slice(&i32::to_be_bytes(n)),
        Unit::UInt32(n) => data.extend_from_slice(&u32::to_be_bytes(n)),
        Unit::Fixed(n) => data.extend_from_slice(&i32::to_be_bytes((n * 65536.0) as i32)),
        Unit::RawTag(tag) => data.extend_from_slice(tag),
    }
}

/// Assembles a TrueType font from tables in the given order.
///
/// Tables are padded to 4 bytes.
pub fn font(tables: &[(&[u8; 4], Vec<u8>)]) -> Vec<u8> {
    use Unit::*;

    let mut data = convert(&[
        UInt32(0x00010000), // sfnt version
        UInt16(tables.len() as u16), // number of tables
        UInt16(0), // search range
        UInt16(0), // entry selector
        UInt16(0), // range shift
    ]);

    let mut body = Vec::new();
    let body_start = 12 + 16 * tables.len();
    for (tag, table) in tables {
        data.extend_from_slice(*tag);
        data.extend(convert(&[
            UInt32(0), // checksum
            UInt32((body_start + body.len()) as u32), // offset
            UInt32(table.len() as u32), // length
        ]));

        body.extend_from_slice(table);
        while body.len() % 4 != 0 {
            body.push(0);
        }
    }

    data.extend(body);
    data
}

/// A format 0 `name` table with Windows English (US) records.
pub fn name_table(names: &[(u16, &str)]) -> Vec<u8> {
    use Unit::*;

    let mut storage = Vec::new();
    let mut data = convert(&[
        UInt16(0), // format
        UInt16(names.len() as u16), // count
        UInt16(6 + 12 * names.len() as u16), // storage offset
    ]);

    for (name_id, value) in names {
        let encoded: Vec<u8> = value.encode_utf16().flat_map(|c| c.to_be_bytes()).collect();
        data.extend(convert(&[
            UInt16(3), // platform: Windows
            UInt16(1), // encoding: Unicode BMP
            UInt16(0x0409), // language: English (US)
            UInt16(*name_id),
            UInt16(encoded.len() as u16), // length
            UInt16(storage.len() as u16), // offset
        ]));
        storage.extend(encoded);
    }

    data.extend(storage);
    data
}

/// A `head` table with 1000 units per em.
pub fn head_table(long_loca: bool) -> Vec<u8> {
    use Unit::*;

    let mut data = convert(&[
        UInt16(1), UInt16(0), // version: 1.0
        Fixed(1.0), // font revision
        UInt32(0), // checksum adjustment
        UInt32(0x5F0F3CF5), // magic number
        UInt16(0), // flags
        UInt16(1000), // units per em
    ]);
    data.extend_from_slice(&[0; 16]); // created and modified
    data.extend(convert(&[
        Int16(0), Int16(-200), Int16(1000), Int16(800), // bbox
        UInt16(0), // mac style
        UInt16(8), // lowest rec ppem
        Int16(2), // font direction hint
        Int16(long_loca as i16), // index to location format
        Int16(0), // glyph data format
    ]));
    data
}

/// A version 0.5 `maxp` table.
pub fn maxp_table(number_of_glyphs: u16) -> Vec<u8> {
    use Unit::*;
    convert(&[UInt32(0x00005000), UInt16(number_of_glyphs)])
}

/// An `hhea` table with the given number of long metrics.
pub fn hhea_table(number_of_metrics: u16) -> Vec<u8> {
    use Unit::*;

    let mut data = convert(&[
        UInt16(1), UInt16(0), // version: 1.0
        Int16(800), // ascender
        Int16(-200), // descender
        Int16(0), // line gap
        UInt16(600), // advance max
        Int16(0), // min left side bearing
        Int16(0), // min right side bearing
        Int16(600), // max extent
        Int16(1), // caret slope rise
        Int16(0), // caret slope run
        Int16(0), // caret offset
    ]);
    data.extend_from_slice(&[0; 8]); // reserved
    data.extend(convert(&[Int16(0), UInt16(number_of_metrics)]));
    data
}
