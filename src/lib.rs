/*!
A safe, defensive OpenType/TrueType table decoder for font inspection.

## Features

- Reads the table directory and decodes tables directly from the raw buffer.
- Pure and stateless. Decoders never mutate or cache anything,
  so any number of tables can be decoded concurrently.
- Never panics on malformed data. Every decoder returns a [`DecodeResult`]
  with an explicit [`Status`] instead of failing.
- Owned, serializable output. Decoded values do not borrow the font buffer.

## Error handling

Truncated tables are decoded as far as possible and reported as
[`Status::Partial`]. Unsupported versions and unusable tables are reported as
[`Status::Error`] with a default stub. Unknown tables are not errors and are
reported as [`Status::NotImplemented`].

Skipped sub-structures are also reported through the `log` crate.

## Example

```no_run
let data = std::fs::read("font.ttf").unwrap();
let font = ttf_inspect::Font::from_data(&data).data;
for (tag, result) in font.decode_all() {
    println!("{}: {:?}", tag, result.status);
}
```
*/

#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]

mod decode;
mod error;

pub mod directory;
pub mod ggg;
pub mod parser;
pub mod registry;
pub mod tables;
pub mod var_store;

use serde::Serialize;

pub use decode::{DecodeResult, Status};
pub use directory::{TableDirectory, TableDirectoryEntry};
pub use error::{DecodeError, Result};
pub use parser::{F2Dot14, Fixed, Tag};
pub use registry::{decode_table, KnownTable, TableData, TableGroup, TableStub};


/// A rectangle.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
#[allow(missing_docs)]
pub struct Rect {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

impl Rect {
    /// Returns a rectangle that contains both rectangles.
    #[inline]
    pub fn union(self, other: Rect) -> Rect {
        Rect {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }
}


/// A font buffer paired with its table directory.
///
/// This is the entry point for cross-table decoding:
/// `hmtx` needs `hhea` and `maxp`, `loca` needs `head`, names are resolved via `name`, etc.
#[derive(Clone, Default, Debug)]
pub struct Font<'a> {
    data: &'a [u8],
    directory: TableDirectory,
}

impl<'a> Font<'a> {
    /// Reads the table directory of a font.
    ///
    /// The status mirrors the directory status.
    /// A font with an unreadable directory still produces a `Font` without tables.
    pub fn from_data(data: &'a [u8]) -> DecodeResult<Self> {
        TableDirectory::parse(data).map(|directory| Font { data, directory })
    }

    /// Returns the raw font data.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the table directory.
    #[inline]
    pub fn directory(&self) -> &TableDirectory {
        &self.directory
    }

    /// Returns the first `(offset, length)` pair for the tag.
    #[inline]
    pub fn find_table(&self, tag: Tag) -> Option<(u32, u32)> {
        self.directory.find_table(tag)
    }

    /// Checks that the directory lists a table.
    #[inline]
    pub fn has_table(&self, tag: Tag) -> bool {
        self.find_table(tag).is_some()
    }

    /// Returns the table's data.
    ///
    /// A table that extends past the end of the buffer is clipped.
    /// Returns `None` when the table is missing or starts past the end of the buffer.
    pub fn table_data(&self, tag: Tag) -> Option<&'a [u8]> {
        let (offset, length) = self.find_table(tag)?;
        clip_range(self.data, offset, length).map(|(data, _)| data)
    }

    /// Returns the table's data or a `MissingTable` error.
    pub(crate) fn required_table(&self, tag: Tag) -> Result<&'a [u8]> {
        self.table_data(tag).ok_or(DecodeError::MissingTable(tag))
    }

    /// Decodes a single table.
    pub fn decode(&self, tag: Tag) -> DecodeResult<TableData> {
        match self.find_table(tag) {
            Some((offset, length)) => registry::decode_with_font(self, tag, offset, length),
            None => DecodeResult::error(
                TableData::Stub(TableStub { tag, length: 0 }),
                &DecodeError::MissingTable(tag),
            ),
        }
    }

    /// Decodes all tables in directory order.
    ///
    /// Duplicated tags are decoded once.
    pub fn decode_all(&self) -> Vec<(Tag, DecodeResult<TableData>)> {
        self.directory.unique_tags().map(|tag| (tag, self.decode(tag))).collect()
    }
}

/// Returns the table slice and whether it was clipped.
pub(crate) fn clip_range(data: &[u8], offset: u32, length: u32) -> Option<(&[u8], bool)> {
    let start = offset as usize;
    if start > data.len() {
        return None;
    }

    let end = start.saturating_add(length as usize);
    if end <= data.len() {
        Some((&data[start..end], false))
    } else {
        Some((&data[start..], true))
    }
}
