//! An [SFNT table directory](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/otff#table-directory) reader.

use serde::Serialize;

use crate::parser::{FromData, Stream};
use crate::{DecodeError, DecodeResult, Tag};

const SFNT_VERSION_TRUE_TYPE: u32 = 0x00010000;
const SFNT_VERSION_APPLE: u32 = 0x74727565; // 'true'
const SFNT_VERSION_OPEN_TYPE: u32 = 0x4F54544F; // 'OTTO'

const OFFSET_TABLE_SIZE: usize = 12;


/// A single [table record](https://docs.microsoft.com/en-us/typography/opentype/spec/otff#table-directory).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct TableDirectoryEntry {
    pub tag: Tag,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

impl FromData for TableDirectoryEntry {
    const SIZE: usize = 16;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(TableDirectoryEntry {
            tag: s.read::<Tag>().ok()?,
            checksum: s.read::<u32>().ok()?,
            offset: s.read::<u32>().ok()?,
            length: s.read::<u32>().ok()?,
        })
    }
}


/// A font flavor as declared by the `sfntVersion` field.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Serialize)]
#[allow(missing_docs)]
pub enum Flavor {
    #[default]
    TrueType,
    AppleTrueType,
    OpenTypeCff,
}


/// An ordered list of table records.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct TableDirectory {
    pub flavor: Flavor,
    /// The `numTables` value from the header.
    pub declared_count: u16,
    /// Records in file order.
    pub entries: Vec<TableDirectoryEntry>,
}

impl TableDirectory {
    /// Reads the SFNT header and table records.
    ///
    /// A header that declares more tables than the buffer can hold
    /// produces the records read so far and a `Partial` status.
    pub fn parse(data: &[u8]) -> DecodeResult<Self> {
        let mut s = Stream::new(data);
        let sfnt_version = match s.read::<u32>() {
            Ok(v) => v,
            Err(e) => return DecodeResult::error(Self::default(), &e),
        };

        let flavor = match sfnt_version {
            SFNT_VERSION_TRUE_TYPE => Flavor::TrueType,
            SFNT_VERSION_APPLE => Flavor::AppleTrueType,
            SFNT_VERSION_OPEN_TYPE => Flavor::OpenTypeCff,
            // WOFF, WOFF2 and collections must be unwrapped by the caller.
            _ => {
                let e = DecodeError::UnsupportedVersion { table: Tag::from_bytes(b"sfnt"), version: sfnt_version };
                return DecodeResult::error(Self::default(), &e);
            }
        };

        let declared_count = match s.read::<u16>() {
            Ok(v) => v,
            Err(e) => return DecodeResult::error(Self { flavor, ..Self::default() }, &e),
        };

        // searchRange, entrySelector and rangeShift are not trusted.
        let mut s = match Stream::new_at(data, OFFSET_TABLE_SIZE) {
            Ok(s) => s,
            Err(e) => return DecodeResult::error(Self { flavor, declared_count, ..Self::default() }, &e),
        };

        let fits = (s.remaining() / TableDirectoryEntry::SIZE).min(usize::from(declared_count));
        let mut entries = Vec::with_capacity(fits);
        for _ in 0..fits {
            match s.read::<TableDirectoryEntry>() {
                Ok(entry) => entries.push(entry),
                Err(_) => break,
            }
        }

        let directory = TableDirectory { flavor, declared_count, entries };
        if directory.entries.len() < usize::from(declared_count) {
            let note = format!(
                "header declares {} tables, only {} fit in the buffer",
                declared_count, directory.entries.len()
            );
            log::warn!("{}", note);
            DecodeResult::partial(directory, note)
        } else {
            DecodeResult::complete(directory)
        }
    }

    /// Returns the first record with the tag.
    ///
    /// Tags are compared case-sensitively, including trailing spaces.
    #[inline]
    pub fn find(&self, tag: Tag) -> Option<&TableDirectoryEntry> {
        self.entries.iter().find(|e| e.tag == tag)
    }

    /// Returns the first `(offset, length)` pair for the tag.
    #[inline]
    pub fn find_table(&self, tag: Tag) -> Option<(u32, u32)> {
        self.find(tag).map(|e| (e.offset, e.length))
    }

    /// Returns the number of records read.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks that there are no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns tags in file order, skipping duplicates.
    pub fn unique_tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(i, e)| !self.entries[..*i].iter().any(|prev| prev.tag == e.tag))
            .map(|(_, e)| e.tag)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    fn font_with(tags: &[&[u8; 4]]) -> Vec<u8> {
        let mut data = vec![
            0x00, 0x01, 0x00, 0x00, // sfntVersion
        ];
        data.extend_from_slice(&(tags.len() as u16).to_be_bytes());
        data.extend_from_slice(&[0; 6]);
        for (i, tag) in tags.iter().enumerate() {
            data.extend_from_slice(*tag);
            data.extend_from_slice(&0u32.to_be_bytes()); // checksum
            data.extend_from_slice(&(100 * i as u32).to_be_bytes()); // offset
            data.extend_from_slice(&(i as u32 + 1).to_be_bytes()); // length
        }
        data
    }

    #[test]
    fn zero_tables() {
        let dir = TableDirectory::parse(&font_with(&[]));
        assert!(dir.is_complete());
        assert!(dir.data.is_empty());
        assert_eq!(dir.data.find_table(Tag::from_bytes(b"head")), None);
    }

    #[test]
    fn finds_first_match() {
        let dir = TableDirectory::parse(&font_with(&[b"head", b"cvt ", b"head"])).data;
        assert_eq!(dir.find_table(Tag::from_bytes(b"head")), Some((0, 1)));
        assert_eq!(dir.find_table(Tag::from_bytes(b"cvt ")), Some((100, 2)));
        assert_eq!(dir.find_table(Tag::from_bytes(b"CVT ")), None);
        assert_eq!(dir.unique_tags().count(), 2);
    }

    #[test]
    fn too_many_tables() {
        let mut data = font_with(&[b"head", b"name"]);
        data[5] = 0xFF; // numTables: 255
        let dir = TableDirectory::parse(&data);
        assert!(matches!(dir.status, Status::Partial(_)));
        assert_eq!(dir.data.len(), 2);
        assert_eq!(dir.data.declared_count, 255);
    }

    #[test]
    fn unknown_magic() {
        let dir = TableDirectory::parse(b"wOFF\x00\x00\x00\x00\x00\x00\x00\x00");
        assert!(dir.is_error());
    }
}
