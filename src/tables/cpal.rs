//! A [Color Palette Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/cpal) implementation.

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{slice_from, FromData, Offset, Offset32, Stream};
use crate::{DecodeError, DecodeResult, Result, Tag};

/// A BGRA color in sRGB.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Color {
    pub blue: u8,
    pub green: u8,
    pub red: u8,
    pub alpha: u8,
}

impl Color {
    /// Formats the color as `#RRGGBBAA`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.red, self.green, self.blue, self.alpha)
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl FromData for Color {
    const SIZE: usize = 4;

    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(Self {
            blue: s.read::<u8>().ok()?,
            green: s.read::<u8>().ok()?,
            red: s.read::<u8>().ok()?,
            alpha: s.read::<u8>().ok()?,
        })
    }
}


/// A single palette.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Palette {
    pub first_color_index: u16,
    pub colors: Vec<Color>,
    /// Version 1 palette type flags.
    pub usable_with_light_background: bool,
    pub usable_with_dark_background: bool,
    /// Version 1 palette label.
    pub label_name_id: Option<u16>,
}

/// A [Color Palette Table](
/// https://docs.microsoft.com/en-us/typography/opentype/spec/cpal).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub version: u16,
    pub palette_entry_count: u16,
    pub color_record_count: u16,
    pub palettes: Vec<Palette>,
    /// Version 1 entry labels. `None` entries have no label.
    pub entry_label_name_ids: Vec<Option<u16>>,
}

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, &mut notes);
    notes.finish(table)
}

fn parse(data: &[u8], notes: &mut Notes) -> Result<Table> {
    let mut s = Stream::new(data);

    let version = s.read::<u16>()?;
    if version > 1 {
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"CPAL"), version: u32::from(version) });
    }

    let palette_entry_count = s.read::<u16>()?;
    let palette_count = s.read::<u16>()?;
    let color_record_count = s.read::<u16>()?;
    let color_records_offset = s.read::<Offset32>()?;
    let color_indices = s.read_array16::<u16>(palette_count)?;

    let colors = Stream::new_at(data, color_records_offset.to_usize())?
        .read_array16::<Color>(color_record_count)?;

    let mut palettes = Vec::with_capacity(usize::from(palette_count));
    for (index, first_color_index) in color_indices.into_iter().enumerate() {
        let end = u32::from(first_color_index) + u32::from(palette_entry_count);
        if end > u32::from(color_record_count) {
            notes.push(format!("palette {} is outside of the color records", index));
        }

        let colors = (0..palette_entry_count)
            .filter_map(|i| first_color_index.checked_add(i))
            .filter_map(|i| colors.get(i))
            .collect();

        palettes.push(Palette { first_color_index, colors, ..Palette::default() });
    }

    let mut table = Table { version, palette_entry_count, color_record_count, palettes, entry_label_name_ids: Vec::new() };
    if version == 0 {
        return Ok(table);
    }

    let types_offset = s.read::<Option<Offset32>>()?;
    let labels_offset = s.read::<Option<Offset32>>()?;
    let entry_labels_offset = s.read::<Option<Offset32>>()?;

    if let Some(offset) = types_offset {
        let types = slice_from(data, offset.to_usize(), "palette types")
            .and_then(|data| Stream::new(data).read_vec::<u32>(palette_count));
        match types {
            Ok(types) => {
                for (palette, flags) in table.palettes.iter_mut().zip(types) {
                    palette.usable_with_light_background = flags & 0x0001 != 0;
                    palette.usable_with_dark_background = flags & 0x0002 != 0;
                }
            }
            Err(e) => notes.skipped("palette types", e),
        }
    }

    if let Some(offset) = labels_offset {
        let labels = slice_from(data, offset.to_usize(), "palette labels")
            .and_then(|data| Stream::new(data).read_vec::<u16>(palette_count));
        match labels {
            Ok(labels) => {
                for (palette, id) in table.palettes.iter_mut().zip(labels) {
                    palette.label_name_id = label(id);
                }
            }
            Err(e) => notes.skipped("palette labels", e),
        }
    }

    if let Some(offset) = entry_labels_offset {
        let labels = slice_from(data, offset.to_usize(), "palette entry labels")
            .and_then(|data| Stream::new(data).read_vec::<u16>(palette_entry_count));
        match labels {
            Ok(labels) => table.entry_label_name_ids = labels.into_iter().map(label).collect(),
            Err(e) => notes.skipped("palette entry labels", e),
        }
    }

    Ok(table)
}

#[inline]
fn label(id: u16) -> Option<u16> {
    if id == 0xFFFF { None } else { Some(id) }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    #[test]
    fn two_palettes() {
        let data = &[
            0x00, 0x00, // version: 0
            0x00, 0x01, // number of palette entries: 1
            0x00, 0x02, // number of palettes: 2
            0x00, 0x02, // number of colors: 2
            0x00, 0x00, 0x00, 0x10, // offset to colors: 16
            0x00, 0x00, // index of palette 0's first color: 0
            0x00, 0x01, // index of palette 1's first color: 1
            // colors (16)
            0x00, 0x00, 0xFF, 0xFF, // red
            0xFF, 0x00, 0x00, 0x80, // half-transparent blue
        ];

        let table = decode(data);
        assert!(table.is_complete());
        let table = table.data;
        assert_eq!(table.palettes.len(), 2);
        assert_eq!(table.palettes[0].colors[0].to_hex(), "#FF0000FF");
        assert_eq!(table.palettes[1].colors[0].to_hex(), "#0000FF80");
    }

    #[test]
    fn palette_out_of_range() {
        let data = &[
            0x00, 0x00, // version: 0
            0x00, 0x02, // number of palette entries: 2
            0x00, 0x01, // number of palettes: 1
            0x00, 0x02, // number of colors: 2
            0x00, 0x00, 0x00, 0x0E, // offset to colors: 14
            0x00, 0x01, // index of palette 0's first color: 1
            // colors (14)
            0x00, 0x00, 0xFF, 0xFF,
            0xFF, 0x00, 0x00, 0xFF,
        ];

        let table = decode(data);
        assert!(matches!(table.status, Status::Partial(_)));
        assert_eq!(table.data.palettes[0].colors.len(), 1);
    }

    #[test]
    fn version_1_labels() {
        let data = &[
            0x00, 0x01, // version: 1
            0x00, 0x01, // number of palette entries: 1
            0x00, 0x01, // number of palettes: 1
            0x00, 0x01, // number of colors: 1
            0x00, 0x00, 0x00, 0x1A, // offset to colors: 26
            0x00, 0x00, // index of palette 0's first color: 0
            0x00, 0x00, 0x00, 0x1E, // palette types offset: 30
            0x00, 0x00, 0x00, 0x22, // palette labels offset: 34
            0x00, 0x00, 0x00, 0x00, // palette entry labels offset: NULL
            // colors (26)
            0x00, 0x00, 0x00, 0xFF,
            // palette types (30)
            0x00, 0x00, 0x00, 0x02, // usable with dark background
            // palette labels (34)
            0x01, 0x00, // name ID: 256
        ];

        let table = decode(data);
        assert!(table.is_complete());
        let palette = &table.data.palettes[0];
        assert!(!palette.usable_with_light_background);
        assert!(palette.usable_with_dark_background);
        assert_eq!(palette.label_name_id, Some(256));
        assert!(table.data.entry_label_name_ids.is_empty());
    }
}
