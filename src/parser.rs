//! Binary parsing utils.
//!
//! All multi-byte values are big-endian.
//! Every read is bounds-checked against the slice it was given,
//! and a slice given to a table decoder is exactly the table's byte range.

use core::cmp::Ordering;
use core::fmt;
use core::marker::PhantomData;

use serde::{Serialize, Serializer};

use crate::{DecodeError, Result};

/// A trait for parsing raw binary data of a fixed size.
pub trait FromData: Sized {
    /// Object's raw data size.
    ///
    /// Not always the same as `mem::size_of`.
    const SIZE: usize;

    /// Parses an object from a raw data.
    ///
    /// `data` is guaranteed to be at least `SIZE` bytes long.
    fn parse(data: &[u8]) -> Option<Self>;
}

impl FromData for u8 {
    const SIZE: usize = 1;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        data.first().copied()
    }
}

impl FromData for i8 {
    const SIZE: usize = 1;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        data.first().map(|b| *b as i8)
    }
}

impl FromData for u16 {
    const SIZE: usize = 2;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        Some(u16::from_be_bytes(data.get(0..2)?.try_into().ok()?))
    }
}

impl FromData for i16 {
    const SIZE: usize = 2;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        Some(i16::from_be_bytes(data.get(0..2)?.try_into().ok()?))
    }
}

impl FromData for u32 {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        Some(u32::from_be_bytes(data.get(0..4)?.try_into().ok()?))
    }
}

impl FromData for i32 {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        Some(i32::from_be_bytes(data.get(0..4)?.try_into().ok()?))
    }
}

impl FromData for u64 {
    const SIZE: usize = 8;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        Some(u64::from_be_bytes(data.get(0..8)?.try_into().ok()?))
    }
}

impl FromData for i64 {
    const SIZE: usize = 8;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        Some(i64::from_be_bytes(data.get(0..8)?.try_into().ok()?))
    }
}


/// A 24-bit unsigned integer.
///
/// https://docs.microsoft.com/en-us/typography/opentype/spec/otff#data-types
#[derive(Clone, Copy, Debug)]
pub struct U24(pub u32);

impl FromData for U24 {
    const SIZE: usize = 3;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let data = data.get(0..3)?;
        Some(U24(u32::from(data[0]) << 16 | u32::from(data[1]) << 8 | u32::from(data[2])))
    }
}


/// A 4-byte table, script, language or feature tag.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(pub u32);

impl Tag {
    /// Creates a `Tag` from bytes.
    #[inline]
    pub const fn from_bytes(bytes: &[u8; 4]) -> Self {
        Tag(((bytes[0] as u32) << 24) | ((bytes[1] as u32) << 16) |
            ((bytes[2] as u32) << 8) | (bytes[3] as u32))
    }

    /// Creates a `Tag` from a string, padding it with spaces.
    ///
    /// Returns `None` for an empty string or a string longer than 4 bytes.
    pub fn from_str_padded(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.is_empty() || bytes.len() > 4 {
            return None;
        }

        let mut tag = [b' '; 4];
        tag[..bytes.len()].copy_from_slice(bytes);
        Some(Tag::from_bytes(&tag))
    }

    /// Returns tag as 4-element byte array.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Returns tag as a string.
    ///
    /// Non-printable bytes are replaced with `?`.
    pub fn to_string_lossy(self) -> String {
        self.to_bytes()
            .iter()
            .map(|b| if (0x20..0x7F).contains(b) { *b as char } else { '?' })
            .collect()
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({})", self.to_string_lossy())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string_lossy())
    }
}

impl FromData for Tag {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        u32::parse(data).map(Tag)
    }
}


/// A 16.16 fixed-point number.
///
/// Stored as raw bits, so values compare exactly.
/// Rendered as a decimal string.
///
/// https://docs.microsoft.com/en-us/typography/opentype/spec/otff#data-types
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed(pub i32);

impl Fixed {
    /// Creates a value from an integer.
    #[inline]
    pub const fn from_i16(n: i16) -> Self {
        Fixed((n as i32) << 16)
    }

    /// Converts the value into `f64`.
    #[inline]
    pub fn to_f64(self) -> f64 {
        f64::from(self.0) / 65536.0
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Fixed({})", self)
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // 5 fractional digits are enough to round-trip 1/65536.
        f.write_str(&format_decimal(self.to_f64(), 5))
    }
}

impl Serialize for Fixed {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromData for Fixed {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        i32::parse(data).map(Fixed)
    }
}


/// A 2.14 fixed-point number.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct F2Dot14(pub i16);

impl F2Dot14 {
    /// Converts the value into `f64`.
    #[inline]
    pub fn to_f64(self) -> f64 {
        f64::from(self.0) / 16384.0
    }
}

impl fmt::Debug for F2Dot14 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "F2Dot14({})", self)
    }
}

impl fmt::Display for F2Dot14 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&format_decimal(self.to_f64(), 5))
    }
}

impl Serialize for F2Dot14 {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromData for F2Dot14 {
    const SIZE: usize = 2;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        i16::parse(data).map(F2Dot14)
    }
}

/// Formats a number with up to `precision` fractional digits and no trailing zeros.
fn format_decimal(n: f64, precision: usize) -> String {
    let mut s = format!("{:.*}", precision, n);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }

    if s == "-0" {
        s.remove(0);
    }

    s
}


/// A 16-bit offset.
#[derive(Clone, Copy, Debug)]
pub struct Offset16(pub u16);

/// A 32-bit offset.
#[derive(Clone, Copy, Debug)]
pub struct Offset32(pub u32);

/// A common offset methods.
pub trait Offset {
    /// Converts the offset to `usize`.
    fn to_usize(&self) -> usize;

    /// Checks that offset is null.
    fn is_null(&self) -> bool { self.to_usize() == 0 }
}

impl Offset for Offset16 {
    #[inline]
    fn to_usize(&self) -> usize {
        usize::from(self.0)
    }
}

impl Offset for Offset32 {
    #[inline]
    fn to_usize(&self) -> usize {
        self.0 as usize
    }
}

impl FromData for Offset16 {
    const SIZE: usize = 2;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        u16::parse(data).map(Offset16)
    }
}

impl FromData for Option<Offset16> {
    const SIZE: usize = Offset16::SIZE;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let offset = Offset16::parse(data)?;
        if offset.0 != 0 { Some(Some(offset)) } else { Some(None) }
    }
}

impl FromData for Offset32 {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        u32::parse(data).map(Offset32)
    }
}

impl FromData for Option<Offset32> {
    const SIZE: usize = Offset32::SIZE;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let offset = Offset32::parse(data)?;
        if offset.0 != 0 { Some(Some(offset)) } else { Some(None) }
    }
}


/// Reads a `u8` at an absolute offset.
#[inline]
pub fn read_u8(data: &[u8], offset: usize) -> Result<u8> {
    Stream::read_at(data, offset)
}

/// Reads a big-endian `u16` at an absolute offset.
#[inline]
pub fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    Stream::read_at(data, offset)
}

/// Reads a big-endian `u32` at an absolute offset.
#[inline]
pub fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    Stream::read_at(data, offset)
}

/// Reads a big-endian `i16` at an absolute offset.
#[inline]
pub fn read_i16(data: &[u8], offset: usize) -> Result<i16> {
    Stream::read_at(data, offset)
}

/// Reads a big-endian `i32` at an absolute offset.
#[inline]
pub fn read_i32(data: &[u8], offset: usize) -> Result<i32> {
    Stream::read_at(data, offset)
}

/// Reads a 4-byte tag at an absolute offset.
#[inline]
pub fn read_tag(data: &[u8], offset: usize) -> Result<Tag> {
    Stream::read_at(data, offset)
}

/// Reads a 16.16 fixed-point number at an absolute offset.
#[inline]
pub fn read_fixed(data: &[u8], offset: usize) -> Result<Fixed> {
    Stream::read_at(data, offset)
}


/// A slice-like container that converts internal binary data only on access.
pub struct LazyArray16<'a, T> {
    data: &'a [u8],
    data_type: PhantomData<T>,
}

// Derives would require `T: Copy`, while only the byte slice is copied.
impl<T> Clone for LazyArray16<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for LazyArray16<'_, T> {}

impl<T> Default for LazyArray16<'_, T> {
    #[inline]
    fn default() -> Self {
        LazyArray16 { data: &[], data_type: PhantomData }
    }
}

impl<'a, T: FromData> LazyArray16<'a, T> {
    /// Creates a new `LazyArray`.
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        LazyArray16 { data, data_type: PhantomData }
    }

    /// Returns a value at `index`.
    #[inline]
    pub fn get(&self, index: u16) -> Option<T> {
        if index < self.len() {
            let start = usize::from(index) * T::SIZE;
            let end = start + T::SIZE;
            self.data.get(start..end).and_then(T::parse)
        } else {
            None
        }
    }

    /// Returns array's length.
    #[inline]
    pub fn len(&self) -> u16 {
        (self.data.len() / T::SIZE) as u16
    }

    /// Checks if array is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Performs a binary search using specified closure.
    pub fn binary_search_by<F>(&self, mut f: F) -> Option<(u16, T)>
        where F: FnMut(&T) -> Ordering
    {
        // Based on Rust std implementation.

        let mut size = self.len();
        if size == 0 {
            return None;
        }

        let mut base = 0;
        while size > 1 {
            let half = size / 2;
            let mid = base + half;
            // mid is always in [0, size), that means mid is >= 0 and < size.
            // mid >= 0: by definition
            // mid < size: mid = size / 2 + size / 4 + size / 8 ...
            let cmp = f(&self.get(mid)?);
            base = if cmp == Ordering::Greater { base } else { mid };
            size -= half;
        }

        // base is always in [0, size) because base <= mid.
        let value = self.get(base)?;
        if f(&value) == Ordering::Equal { Some((base, value)) } else { None }
    }
}

impl<'a, T: FromData + fmt::Debug> fmt::Debug for LazyArray16<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(*self).finish()
    }
}

impl<'a, T: FromData> IntoIterator for LazyArray16<'a, T> {
    type Item = T;
    type IntoIter = LazyArrayIter16<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        LazyArrayIter16 { data: self, index: 0 }
    }
}

/// An iterator over `LazyArray16`.
pub struct LazyArrayIter16<'a, T> {
    data: LazyArray16<'a, T>,
    index: u16,
}

impl<T> Clone for LazyArrayIter16<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        LazyArrayIter16 { data: self.data, index: self.index }
    }
}

impl<'a, T: FromData> Iterator for LazyArrayIter16<'a, T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let value = self.data.get(self.index)?;
        self.index += 1;
        Some(value)
    }
}


/// A streaming binary parser.
#[derive(Clone, Copy, Default, Debug)]
pub struct Stream<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Stream<'a> {
    /// Creates a new `Stream` parser.
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Stream { data, offset: 0 }
    }

    /// Creates a new `Stream` parser at offset.
    ///
    /// Returns `Err` when `offset` is past the end of `data`.
    #[inline]
    pub fn new_at(data: &'a [u8], offset: usize) -> Result<Self> {
        if offset <= data.len() {
            Ok(Stream { data, offset })
        } else {
            Err(DecodeError::MalformedOffset { what: "stream", offset, length: data.len() })
        }
    }

    /// Checks that stream reached the end of the data.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Returns the current offset.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the number of bytes left.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    /// Returns the trailing data.
    #[inline]
    pub fn tail(&self) -> &'a [u8] {
        self.data.get(self.offset..).unwrap_or(&[])
    }

    /// Advances by `FromData::SIZE`.
    ///
    /// Doesn't check bounds; the next read will.
    #[inline]
    pub fn skip<T: FromData>(&mut self) {
        self.advance(T::SIZE);
    }

    /// Advances by the specified `len`.
    ///
    /// Doesn't check bounds; the next read will.
    #[inline]
    pub fn advance(&mut self, len: usize) {
        self.offset = self.offset.saturating_add(len);
    }

    /// Parses the type from the stream.
    #[inline]
    pub fn read<T: FromData>(&mut self) -> Result<T> {
        let start = self.offset;
        let v = Self::read_at(self.data, start)?;
        self.offset = start + T::SIZE;
        Ok(v)
    }

    /// Parses the type from the slice at offset.
    #[inline]
    pub fn read_at<T: FromData>(data: &[u8], offset: usize) -> Result<T> {
        let truncated = || DecodeError::Truncated {
            offset,
            size: T::SIZE,
            available: data.len().saturating_sub(offset),
        };

        let end = offset.checked_add(T::SIZE).ok_or_else(truncated)?;
        let bytes = data.get(offset..end).ok_or_else(truncated)?;
        T::parse(bytes).ok_or_else(truncated)
    }

    /// Reads N bytes from the stream.
    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let offset = self.offset;
        let truncated = DecodeError::Truncated {
            offset,
            size: len,
            available: self.remaining(),
        };

        let end = offset.checked_add(len).ok_or_else(|| truncated.clone())?;
        let bytes = self.data.get(offset..end).ok_or(truncated)?;
        self.offset = end;
        Ok(bytes)
    }

    /// Reads the next `count` values as a lazy array.
    #[inline]
    pub fn read_array16<T: FromData>(&mut self, count: u16) -> Result<LazyArray16<'a, T>> {
        let len = usize::from(count) * T::SIZE;
        self.read_bytes(len).map(LazyArray16::new)
    }

    /// Reads `count` values into a `Vec`.
    pub fn read_vec<T: FromData>(&mut self, count: u16) -> Result<Vec<T>> {
        Ok(self.read_array16::<T>(count)?.into_iter().collect())
    }
}

/// Returns a slice of `data` starting at `offset`.
///
/// A null offset is still a valid offset here; callers must check for it.
#[inline]
pub(crate) fn slice_from<'a>(data: &'a [u8], offset: usize, what: &'static str) -> Result<&'a [u8]> {
    data.get(offset..).ok_or(DecodeError::MalformedOffset { what, offset, length: data.len() })
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_big_endian() {
        let data = [0x12, 0x34, 0x56, 0x78];
        assert_eq!(read_u16(&data, 0).unwrap(), 0x1234);
        assert_eq!(read_u32(&data, 0).unwrap(), 0x12345678);
        assert_eq!(read_i16(&[0xFF, 0xFE], 0).unwrap(), -2);
        assert_eq!(read_i32(&[0xFF, 0xFF, 0xFF, 0xFE], 0).unwrap(), -2);
        assert_eq!(read_tag(b"\0glyf", 1).unwrap(), Tag::from_bytes(b"glyf"));
    }

    #[test]
    fn out_of_bounds_read() {
        let data = [0x00, 0x01, 0x02];
        assert_eq!(
            read_u16(&data, 2),
            Err(DecodeError::Truncated { offset: 2, size: 2, available: 1 })
        );
        assert!(read_u32(&data, usize::MAX).is_err());
        assert!(read_u8(&[], 0).is_err());
    }

    #[test]
    fn fixed_display() {
        assert_eq!(read_fixed(&[0x00, 0x01, 0x00, 0x00], 0).unwrap().to_string(), "1");
        assert_eq!(Fixed(0x0002_8000).to_string(), "2.5");
        assert_eq!(Fixed(-0x0001_0000).to_string(), "-1");
        assert_eq!(Fixed::from_i16(700).to_f64(), 700.0);
        assert_eq!(F2Dot14(-16384).to_string(), "-1");
    }

    #[test]
    fn lazy_array_of_owned_values() {
        #[derive(PartialEq, Debug)]
        struct Letter(String);

        impl FromData for Letter {
            const SIZE: usize = 1;

            fn parse(data: &[u8]) -> Option<Self> {
                Some(Letter(char::from(data[0]).to_string()))
            }
        }

        let array = LazyArray16::<Letter>::new(b"ab");
        let copy = array;
        assert_eq!(format!("{:?}", array), r#"[Letter("a"), Letter("b")]"#);
        assert_eq!(copy.len(), 2);
        assert_eq!(Clone::clone(&copy).into_iter().last(), Some(Letter("b".to_string())));
    }

    #[test]
    fn tag_padding() {
        assert_eq!(Tag::from_str_padded("cvt"), Some(Tag::from_bytes(b"cvt ")));
        assert_eq!(Tag::from_str_padded("OS/2").unwrap().to_string(), "OS/2");
        assert_eq!(Tag::from_str_padded("toolong"), None);
    }

    #[test]
    fn stream_does_not_overflow() {
        let mut s = Stream::new(&[0, 1]);
        s.advance(usize::MAX);
        assert!(s.read::<u16>().is_err());
        assert!(s.read_bytes(usize::MAX).is_err());
    }
}
