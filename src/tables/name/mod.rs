//! A [Naming Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/name) implementation.

mod encoding;
pub mod ids;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{slice_from, FromData, Offset, Offset16, Stream};
use crate::{DecodeError, DecodeResult, Font, Result, Tag};
use encoding::TextEncoding;
use ids::{name_id, PLATFORM_MACINTOSH, PLATFORM_UNICODE, PLATFORM_WINDOWS, WINDOWS_ENGLISH_US};

/// The first language ID that refers to a language-tag record.
const LANG_TAG_BASE: u16 = 0x8000;

#[derive(Clone, Copy)]
struct NameRecordRaw {
    platform_id: u16,
    encoding_id: u16,
    language_id: u16,
    name_id: u16,
    length: u16,
    offset: Offset16,
}

impl FromData for NameRecordRaw {
    const SIZE: usize = 12;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(NameRecordRaw {
            platform_id: s.read::<u16>().ok()?,
            encoding_id: s.read::<u16>().ok()?,
            language_id: s.read::<u16>().ok()?,
            name_id: s.read::<u16>().ok()?,
            length: s.read::<u16>().ok()?,
            offset: s.read::<Offset16>().ok()?,
        })
    }
}

impl NameRecordRaw {
    fn bytes<'a>(&self, storage: &'a [u8]) -> Result<&'a [u8]> {
        let start = self.offset.to_usize();
        let end = start + usize::from(self.length);
        storage.get(start..end).ok_or(DecodeError::MalformedOffset {
            what: "name string",
            offset: start,
            length: storage.len(),
        })
    }

    fn decode_string(&self, storage: &[u8]) -> Result<String> {
        let bytes = self.bytes(storage)?;
        Ok(TextEncoding::detect(self.platform_id, self.encoding_id).decode(bytes))
    }

    /// Returns a preference rank. Lower is better.
    ///
    /// Windows English comes first, then any Windows Unicode,
    /// then the Unicode platform, then Mac English.
    fn rank(&self) -> u8 {
        match (self.platform_id, self.encoding_id, self.language_id) {
            (PLATFORM_WINDOWS, e, WINDOWS_ENGLISH_US) if e != 0 => 0,
            (PLATFORM_WINDOWS, e, _) if e != 0 => 1,
            (PLATFORM_UNICODE, _, _) => 2,
            (PLATFORM_MACINTOSH, 0, 0) => 3,
            _ => 4,
        }
    }
}


/// A decoded [Name Record](https://docs.microsoft.com/en-us/typography/opentype/spec/name#name-records).
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct NameRecord {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub language_id: u16,
    pub name_id: u16,
    pub platform: &'static str,
    pub encoding: &'static str,
    /// A language label or a format 1 language tag.
    pub language: String,
    pub name_label: &'static str,
    pub value: String,
}

/// A best-choice string for a predefined name ID.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct PrimaryName {
    pub label: &'static str,
    pub value: String,
    pub platform_id: u16,
    pub language_id: u16,
}

/// A [Naming Table](https://docs.microsoft.com/en-us/typography/opentype/spec/name).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub format: u16,
    /// The declared number of records.
    pub count: u16,
    /// Records that could be decoded, in file order.
    pub records: Vec<NameRecord>,
    /// Format 1 language tags.
    pub lang_tags: Vec<String>,
    /// Preferred strings for name IDs 0..=25.
    pub primary_names: BTreeMap<u16, PrimaryName>,
}

impl Table {
    /// Returns the preferred string for a name ID.
    pub fn primary(&self, id: u16) -> Option<&str> {
        self.primary_names.get(&id).map(|n| n.value.as_str())
    }
}

/// Decodes a table.
pub fn decode(data: &[u8]) -> DecodeResult<Table> {
    let mut notes = Notes::new();
    let table = parse(data, &mut notes);
    notes.finish(table)
}

struct Header<'a> {
    format: u16,
    records: crate::parser::LazyArray16<'a, NameRecordRaw>,
    lang_tags: Vec<String>,
    storage: &'a [u8],
}

fn parse_header<'a>(data: &'a [u8], notes: &mut Notes) -> Result<Header<'a>> {
    let mut s = Stream::new(data);
    let format = s.read::<u16>()?;
    if format > 1 {
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"name"), version: u32::from(format) });
    }

    let count = s.read::<u16>()?;
    let storage_offset = s.read::<Offset16>()?;
    let records = s.read_array16::<NameRecordRaw>(count)?;
    let storage = slice_from(data, storage_offset.to_usize(), "string storage")?;

    let mut lang_tags = Vec::new();
    if format == 1 {
        match parse_lang_tags(&mut s, storage) {
            Ok(tags) => lang_tags = tags,
            Err(e) => notes.skipped("language tags", e),
        }
    }

    Ok(Header { format, records, lang_tags, storage })
}

fn parse_lang_tags(s: &mut Stream, storage: &[u8]) -> Result<Vec<String>> {
    let count = s.read::<u16>()?;
    let mut tags = Vec::with_capacity(usize::from(count));
    for _ in 0..count {
        let length = s.read::<u16>()?;
        let offset = s.read::<Offset16>()?;
        let start = offset.to_usize();
        let bytes = storage.get(start..start + usize::from(length)).ok_or(DecodeError::MalformedOffset {
            what: "language tag",
            offset: start,
            length: storage.len(),
        })?;
        // Language tags are always UTF-16BE.
        tags.push(TextEncoding::Utf16Be.decode(bytes));
    }
    Ok(tags)
}

fn parse(data: &[u8], notes: &mut Notes) -> Result<Table> {
    let header = parse_header(data, notes)?;

    let mut records = Vec::with_capacity(usize::from(header.records.len()));
    let mut best: BTreeMap<u16, (u8, usize)> = BTreeMap::new();
    for (i, raw) in header.records.into_iter().enumerate() {
        let value = match raw.decode_string(header.storage) {
            Ok(value) => value,
            Err(e) => {
                notes.skipped(&format!("name record {} (ID {})", i, raw.name_id), e);
                continue;
            }
        };

        let language = if header.format == 1 && raw.language_id >= LANG_TAG_BASE {
            match header.lang_tags.get(usize::from(raw.language_id - LANG_TAG_BASE)) {
                Some(tag) => tag.clone(),
                None => ids::language_label(raw.platform_id, raw.language_id),
            }
        } else {
            ids::language_label(raw.platform_id, raw.language_id)
        };

        if raw.name_id <= name_id::LAST_PREDEFINED && !value.is_empty() {
            let rank = raw.rank();
            let candidate = (rank, records.len());
            best.entry(raw.name_id)
                .and_modify(|b| if rank < b.0 { *b = candidate })
                .or_insert(candidate);
        }

        records.push(NameRecord {
            platform_id: raw.platform_id,
            encoding_id: raw.encoding_id,
            language_id: raw.language_id,
            name_id: raw.name_id,
            platform: ids::platform_label(raw.platform_id),
            encoding: ids::encoding_label(raw.platform_id, raw.encoding_id),
            language,
            name_label: ids::name_id_label(raw.name_id),
            value,
        });
    }

    let primary_names = best
        .into_iter()
        .map(|(id, (_, index))| {
            let record = &records[index];
            (id, PrimaryName {
                label: record.name_label,
                value: record.value.clone(),
                platform_id: record.platform_id,
                language_id: record.language_id,
            })
        })
        .collect();

    Ok(Table {
        format: header.format,
        count: header.records.len(),
        records,
        lang_tags: header.lang_tags,
        primary_names,
    })
}


/// Resolves name IDs in a single pass over the `name` table of a font.
///
/// `font_data` is the whole font. Windows English is preferred,
/// then the first decodable record in preference order.
/// IDs without a non-empty string are absent from the result.
pub fn resolve_name_ids(font_data: &[u8], ids: &[u16]) -> BTreeMap<u16, String> {
    let font = Font::from_data(font_data).data;
    match font.table_data(Tag::from_bytes(b"name")) {
        Some(data) => resolve_in_table(data, ids),
        None => BTreeMap::new(),
    }
}

/// Resolves name IDs in a single pass over raw `name` table data.
pub(crate) fn resolve_in_table(data: &[u8], ids: &[u16]) -> BTreeMap<u16, String> {
    let wanted: BTreeSet<u16> = ids.iter().copied().collect();
    let mut best: BTreeMap<u16, (u8, String)> = BTreeMap::new();

    let header = match parse_header(data, &mut Notes::new()) {
        Ok(header) => header,
        Err(e) => {
            log::debug!("cannot resolve names: {}", e);
            return BTreeMap::new();
        }
    };

    for raw in header.records {
        if !wanted.contains(&raw.name_id) {
            continue;
        }

        let rank = raw.rank();
        if best.get(&raw.name_id).map_or(false, |(r, _)| *r <= rank) {
            continue;
        }

        if let Ok(value) = raw.decode_string(header.storage) {
            if !value.is_empty() {
                best.insert(raw.name_id, (rank, value));
            }
        }
    }

    best.into_iter().map(|(id, (_, value))| (id, value)).collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    #[test]
    fn windows_and_mac() {
        let data = &[
            0x00, 0x00, // format: 0
            0x00, 0x03, // count: 3
            0x00, 0x2A, // storage offset: 42
            // record [0]: Mac, Roman, English, family
            0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x04, 0x00, 0x00,
            // record [1]: Windows, Unicode BMP, en-US, family
            0x00, 0x03, 0x00, 0x01, 0x04, 0x09, 0x00, 0x01, 0x00, 0x08, 0x00, 0x04,
            // record [2]: Windows, Unicode BMP, en-US, ID 256, out of bounds
            0x00, 0x03, 0x00, 0x01, 0x04, 0x09, 0x01, 0x00, 0x00, 0x08, 0x00, 0xF0,
            // storage (42)
            0x43, 0x61, 0x66, 0x8E, // "Café" in Mac Roman
            0x00, 0x54, 0x00, 0x65, 0x00, 0x73, 0x00, 0x74, // "Test"
        ];

        let table = decode(data);
        assert!(matches!(table.status, Status::Partial(_)));
        let table = table.data;
        assert_eq!(table.count, 3);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].value, "Café");
        assert_eq!(table.records[0].language, "English");
        assert_eq!(table.records[1].value, "Test");
        assert_eq!(table.primary(name_id::FAMILY), Some("Test"));

        let names = resolve_in_table(data, &[1, 2, 256]);
        assert_eq!(names.len(), 1);
        assert_eq!(names[&1], "Test");
    }

    #[test]
    fn format1_lang_tags() {
        let data = &[
            0x00, 0x01, // format: 1
            0x00, 0x01, // count: 1
            0x00, 0x18, // storage offset: 24
            // record [0]: Windows, Unicode BMP, lang tag 0, family
            0x00, 0x03, 0x00, 0x01, 0x80, 0x00, 0x00, 0x01, 0x00, 0x02, 0x00, 0x00,
            0x00, 0x01, // lang tag count: 1
            0x00, 0x04, 0x00, 0x02, // lang tag [0]: length 4, offset 2
            // storage (24)
            0x00, 0x41, // "A"
            0x00, 0x64, 0x00, 0x65, // "de"
        ];

        let table = decode(data);
        assert!(table.is_complete());
        assert_eq!(table.data.lang_tags, ["de"]);
        assert_eq!(table.data.records[0].language, "de");
        assert_eq!(table.data.records[0].value, "A");
    }

    #[test]
    fn unsupported_format() {
        assert!(decode(&[0x00, 0x02, 0x00, 0x00, 0x00, 0x06]).is_error());
    }
}
