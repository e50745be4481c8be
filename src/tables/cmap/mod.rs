/*!
A [character to glyph index mapping](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap)
table implementation.

Subtables are summarized per format. Mappings themselves are not expanded.
*/

mod format0;
mod format10;
mod format12;
mod format13;
mod format14;
mod format2;
mod format4;
mod format6;
mod format8;

pub use format0::ByteEncoding;
pub use format10::TrimmedArray;
pub use format12::{GroupStats, SegmentedCoverage};
pub use format13::ManyToOneRanges;
pub use format14::{VariationSelector, VariationSequences};
pub use format2::HighByteMapping;
pub use format4::SegmentMapping;
pub use format6::TrimmedTable;
pub use format8::MixedCoverage;

use serde::Serialize;

use crate::decode::Notes;
use crate::parser::{slice_from, FromData, Stream};
use crate::tables::name::ids::{encoding_label, platform_label, PLATFORM_UNICODE, PLATFORM_WINDOWS};
use crate::{DecodeError, DecodeResult, Result, Tag};

#[derive(Clone, Copy)]
struct EncodingRecord {
    platform_id: u16,
    encoding_id: u16,
    offset: u32,
}

impl FromData for EncodingRecord {
    const SIZE: usize = 8;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(EncodingRecord {
            platform_id: s.read::<u16>().ok()?,
            encoding_id: s.read::<u16>().ok()?,
            offset: s.read::<u32>().ok()?,
        })
    }
}


/// A per-format subtable summary.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "format")]
#[allow(missing_docs)]
pub enum FormatSummary {
    #[serde(rename = "0")]
    ByteEncoding(ByteEncoding),
    #[serde(rename = "2")]
    HighByteMapping(HighByteMapping),
    #[serde(rename = "4")]
    SegmentMapping(SegmentMapping),
    #[serde(rename = "6")]
    TrimmedTable(TrimmedTable),
    #[serde(rename = "8")]
    MixedCoverage(MixedCoverage),
    #[serde(rename = "10")]
    TrimmedArray(TrimmedArray),
    #[serde(rename = "12")]
    SegmentedCoverage(SegmentedCoverage),
    #[serde(rename = "13")]
    ManyToOneRanges(ManyToOneRanges),
    #[serde(rename = "14")]
    VariationSequences(VariationSequences),
}

/// A character encoding subtable.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Subtable {
    pub platform_id: u16,
    pub encoding_id: u16,
    pub platform: &'static str,
    pub encoding: &'static str,
    pub offset: u32,
    /// `None` when the subtable offset is out of bounds.
    pub format: Option<u16>,
    pub is_unicode: bool,
    /// `None` for unknown formats and for subtables that failed to parse.
    pub summary: Option<FormatSummary>,
}

/// A [Character to Glyph Index Mapping Table](
/// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap).
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Table {
    pub version: u16,
    pub subtables: Vec<Subtable>,
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
    if version != 0 {
        return Err(DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"cmap"), version: u32::from(version) });
    }

    let count = s.read::<u16>()?;
    let records = s.read_array16::<EncodingRecord>(count)?;

    let mut subtables = Vec::with_capacity(usize::from(count));
    for record in records {
        let mut subtable = Subtable {
            platform_id: record.platform_id,
            encoding_id: record.encoding_id,
            platform: platform_label(record.platform_id),
            encoding: encoding_label(record.platform_id, record.encoding_id),
            offset: record.offset,
            format: None,
            is_unicode: false,
            summary: None,
        };

        let subtable_data = match slice_from(data, record.offset as usize, "cmap subtable") {
            Ok(v) => v,
            Err(e) => {
                notes.skipped("cmap subtable", e);
                subtables.push(subtable);
                continue;
            }
        };

        let format = match Stream::read_at::<u16>(subtable_data, 0) {
            Ok(v) => v,
            Err(e) => {
                notes.skipped("cmap subtable", e);
                subtables.push(subtable);
                continue;
            }
        };

        subtable.format = Some(format);
        subtable.is_unicode = is_unicode(record.platform_id, record.encoding_id, format);
        match summarize(format, subtable_data, notes) {
            Ok(Some(summary)) => subtable.summary = Some(summary),
            Ok(None) => notes.push(format!("unknown cmap subtable format {}", format)),
            Err(e) => notes.skipped("cmap subtable", e),
        }

        subtables.push(subtable);
    }

    Ok(Table { version, subtables })
}

fn summarize(format: u16, data: &[u8], notes: &mut Notes) -> Result<Option<FormatSummary>> {
    let summary = match format {
        0 => FormatSummary::ByteEncoding(format0::summarize(data)?),
        2 => FormatSummary::HighByteMapping(format2::summarize(data)?),
        4 => FormatSummary::SegmentMapping(format4::summarize(data)?),
        6 => FormatSummary::TrimmedTable(format6::summarize(data)?),
        8 => FormatSummary::MixedCoverage(format8::summarize(data)?),
        10 => FormatSummary::TrimmedArray(format10::summarize(data)?),
        12 => FormatSummary::SegmentedCoverage(format12::summarize(data)?),
        13 => FormatSummary::ManyToOneRanges(format13::summarize(data)?),
        14 => FormatSummary::VariationSequences(format14::summarize(data, notes)?),
        _ => return Ok(None),
    };

    Ok(Some(summary))
}

/// Checks that an encoding is Unicode compatible.
fn is_unicode(platform_id: u16, encoding_id: u16, format: u16) -> bool {
    // https://docs.microsoft.com/en-us/typography/opentype/spec/name#windows-encoding-ids
    const WINDOWS_UNICODE_BMP_ENCODING_ID: u16 = 1;
    const WINDOWS_UNICODE_FULL_REPERTOIRE_ENCODING_ID: u16 = 10;

    match platform_id {
        PLATFORM_UNICODE => true,
        PLATFORM_WINDOWS if encoding_id == WINDOWS_UNICODE_BMP_ENCODING_ID => true,
        PLATFORM_WINDOWS => {
            encoding_id == WINDOWS_UNICODE_FULL_REPERTOIRE_ENCODING_ID && (format == 12 || format == 13)
        }
        _ => false,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    #[test]
    fn format6_and_unknown() {
        let data = &[
            0x00, 0x00, // version: 0
            0x00, 0x02, // number of tables: 2
            0x00, 0x03, 0x00, 0x01, // platform: Windows, encoding: Unicode BMP
            0x00, 0x00, 0x00, 0x14, // offset: 20
            0x00, 0x01, 0x00, 0x00, // platform: Macintosh, encoding: Roman
            0x00, 0x00, 0x00, 0x20, // offset: 32

            // format 6 (20)
            0x00, 0x06, // format: 6
            0x00, 0x0C, // length: 12
            0x00, 0x00, // language: 0
            0x00, 0x41, // first code: 65
            0x00, 0x02, // entry count: 2
            0x00, 0x01, 0x00, 0x02, // glyph IDs

            // format 3 (32)
            0x00, 0x03, // format: 3
        ];

        let table = decode(data);
        assert!(matches!(table.status, Status::Partial(_)));
        let subtables = table.data.subtables;
        assert_eq!(subtables.len(), 2);
        assert!(subtables[0].is_unicode);
        assert_eq!(subtables[0].platform, "Windows");
        assert_eq!(
            subtables[0].summary,
            Some(FormatSummary::TrimmedTable(TrimmedTable { language: 0, first_code: 65, entry_count: 2 }))
        );
        assert!(!subtables[1].is_unicode);
        assert_eq!(subtables[1].format, Some(3));
        assert_eq!(subtables[1].summary, None);
    }

    #[test]
    fn bad_subtable_offset() {
        let data = &[
            0x00, 0x00, // version: 0
            0x00, 0x01, // number of tables: 1
            0x00, 0x00, 0x00, 0x03, // platform: Unicode, encoding: 3
            0x00, 0x00, 0x10, 0x00, // offset: 4096
        ];

        let table = decode(data);
        assert!(matches!(table.status, Status::Partial(_)));
        assert_eq!(table.data.subtables[0].format, None);
    }

    #[test]
    fn truncated_records() {
        let data = &[
            0x00, 0x00, // version: 0
            0x00, 0x02, // number of tables: 2
            0x00, 0x03, 0x00, 0x01, // platform: Windows, encoding: Unicode BMP
        ];
        assert!(decode(data).is_error());
    }
}
