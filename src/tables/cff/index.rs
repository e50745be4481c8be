//! A CFF/CFF2 [INDEX](http://wwwimages.adobe.com/content/dam/Adobe/en/devnet/font/pdfs/5176.CFF.pdf)
//! reader.

use crate::parser::{FromData, Stream, U24};
use crate::{DecodeError, Result};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum OffsetSize {
    Size1 = 1,
    Size2 = 2,
    Size3 = 3,
    Size4 = 4,
}

impl OffsetSize {
    #[inline]
    fn to_usize(self) -> usize {
        self as usize
    }
}

fn parse_offset_size(s: &mut Stream) -> Result<OffsetSize> {
    match s.read::<u8>()? {
        1 => Ok(OffsetSize::Size1),
        2 => Ok(OffsetSize::Size2),
        3 => Ok(OffsetSize::Size3),
        4 => Ok(OffsetSize::Size4),
        n => Err(DecodeError::InvalidValue { what: "CFF INDEX offset size", value: u32::from(n) }),
    }
}


#[derive(Clone, Copy, Debug)]
struct VarOffsets<'a> {
    data: &'a [u8],
    offset_size: OffsetSize,
}

impl<'a> VarOffsets<'a> {
    fn get(&self, index: usize) -> Option<u32> {
        let start = index.checked_mul(self.offset_size.to_usize())?;
        let end = start + self.offset_size.to_usize();
        let data = self.data.get(start..end)?;
        let n = match self.offset_size {
            OffsetSize::Size1 => u32::from(u8::parse(data)?),
            OffsetSize::Size2 => u32::from(u16::parse(data)?),
            OffsetSize::Size3 => U24::parse(data)?.0,
            OffsetSize::Size4 => u32::parse(data)?,
        };

        // Offsets are offset by one byte in the font,
        // so we have to shift them back.
        n.checked_sub(1)
    }

    #[inline]
    fn len(&self) -> usize {
        self.data.len() / self.offset_size.to_usize()
    }
}


/// A parsed INDEX.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Index<'a> {
    data: &'a [u8],
    offsets: VarOffsets<'a>,
}

impl<'a> Default for Index<'a> {
    #[inline]
    fn default() -> Self {
        Index {
            data: b"",
            offsets: VarOffsets { data: b"", offset_size: OffsetSize::Size1 },
        }
    }
}

impl<'a> Index<'a> {
    /// Returns the number of items.
    #[inline]
    pub fn len(&self) -> u32 {
        // There is one more offset than there are items.
        self.offsets.len().saturating_sub(1) as u32
    }

    /// Returns an item's data.
    pub fn get(&self, index: u32) -> Option<&'a [u8]> {
        let index = index as usize;
        let start = self.offsets.get(index)? as usize;
        let end = self.offsets.get(index + 1)? as usize;
        self.data.get(start..end)
    }

    /// Iterates over items. Stops at the first malformed item.
    pub fn items(&self) -> impl Iterator<Item = &'a [u8]> {
        let index = *self;
        (0..self.len()).map_while(move |i| index.get(i))
    }
}

/// Parses a CFF INDEX with a 16-bit count.
pub(crate) fn parse_index<'a>(s: &mut Stream<'a>) -> Result<Index<'a>> {
    let count = s.read::<u16>()?;
    parse_index_impl(u32::from(count), s)
}

/// Parses a CFF2 INDEX with a 32-bit count.
pub(crate) fn parse_index32<'a>(s: &mut Stream<'a>) -> Result<Index<'a>> {
    let count = s.read::<u32>()?;
    parse_index_impl(count, s)
}

fn parse_index_impl<'a>(count: u32, s: &mut Stream<'a>) -> Result<Index<'a>> {
    // An empty INDEX has no offset size.
    if count == 0 {
        return Ok(Index::default());
    }

    let offset_size = parse_offset_size(s)?;
    let offsets_len = (count as usize + 1).saturating_mul(offset_size.to_usize());
    let offsets = VarOffsets { data: s.read_bytes(offsets_len)?, offset_size };

    // The last offset is the data size.
    let last = offsets.get(offsets.len() - 1).ok_or(DecodeError::InvalidValue {
        what: "CFF INDEX offset",
        value: 0,
    })?;
    let data = s.read_bytes(last as usize)?;
    Ok(Index { data, offsets })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_items() {
        let data = &[
            0x00, 0x02, // count: 2
            0x01, // offset size: 1
            0x01, 0x03, 0x04, // offsets
            b'a', b'b', b'c',
            0xFF, // trailing
        ];

        let mut s = Stream::new(data);
        let index = parse_index(&mut s).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(0), Some(&b"ab"[..]));
        assert_eq!(index.get(1), Some(&b"c"[..]));
        assert_eq!(index.get(2), None);
        assert_eq!(s.remaining(), 1);
    }

    #[test]
    fn empty() {
        let mut s = Stream::new(&[0x00, 0x00]);
        assert_eq!(parse_index(&mut s).unwrap().len(), 0);
        assert!(s.at_end());
    }

    #[test]
    fn zero_offset() {
        let data = &[
            0x00, 0x01, // count: 1
            0x01, // offset size: 1
            0x01, 0x00, // offsets
        ];
        assert!(parse_index(&mut Stream::new(data)).is_err());
    }

    #[test]
    fn bad_offset_size() {
        assert!(parse_index32(&mut Stream::new(&[0x00, 0x00, 0x00, 0x01, 0x05])).is_err());
    }
}
