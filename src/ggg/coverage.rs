//! A [Coverage Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-table) expansion.

use serde::Serialize;

use crate::parser::{FromData, Stream};
use crate::{DecodeError, Result};

/// The maximum number of glyphs a single expansion can produce.
///
/// Glyph IDs are 16-bit, so a well-formed table never exceeds it.
pub const MAX_EXPANDED_GLYPHS: usize = 1 << 16;


#[derive(Clone, Copy, Debug)]
pub(crate) struct RangeRecord {
    pub start: u16,
    pub end: u16,
    pub value: u16,
}

impl FromData for RangeRecord {
    const SIZE: usize = 6;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(RangeRecord {
            start: s.read::<u16>().ok()?,
            end: s.read::<u16>().ok()?,
            value: s.read::<u16>().ok()?,
        })
    }
}

impl RangeRecord {
    /// Returns the range length, treating an inverted range as empty.
    #[inline]
    pub fn len(&self) -> usize {
        if self.start > self.end { 0 } else { usize::from(self.end - self.start) + 1 }
    }
}


/// An expanded coverage table.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct Coverage {
    pub format: u16,
    /// Glyphs in coverage index order.
    pub glyphs: Vec<u16>,
}

impl Coverage {
    /// Parses and expands a coverage table.
    ///
    /// Inverted ranges contribute nothing
    /// and the result is capped at [`MAX_EXPANDED_GLYPHS`].
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let format = s.read::<u16>()?;
        let count = s.read::<u16>()?;
        let glyphs = match format {
            1 => s.read_vec::<u16>(count)?,
            2 => {
                let records = s.read_array16::<RangeRecord>(count)?;
                let mut glyphs = Vec::new();
                for record in records {
                    let room = MAX_EXPANDED_GLYPHS - glyphs.len();
                    if room == 0 {
                        break;
                    }

                    let len = record.len().min(room);
                    glyphs.extend((0..len).map(|i| record.start.wrapping_add(i as u16)));
                }
                glyphs
            }
            _ => return Err(DecodeError::InvalidValue { what: "coverage format", value: u32::from(format) }),
        };

        Ok(Coverage { format, glyphs })
    }

    /// Returns the number of covered glyphs.
    #[inline]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Checks that nothing is covered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Checks that the glyph is covered.
    #[inline]
    pub fn contains(&self, glyph: u16) -> bool {
        self.index_of(glyph).is_some()
    }

    /// Returns the coverage index of a glyph.
    pub fn index_of(&self, glyph: u16) -> Option<usize> {
        self.glyphs.iter().position(|g| *g == glyph)
    }
}
