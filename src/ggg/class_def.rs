//! A [Class Definition Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/chapter2#class-definition-table) expansion.

use std::collections::BTreeMap;

use serde::Serialize;

use super::coverage::{RangeRecord, MAX_EXPANDED_GLYPHS};
use crate::parser::Stream;
use crate::{DecodeError, Result};

/// An expanded class definition table.
///
/// Glyphs outside of any declared range have no entry.
/// This is not the same as class 0, even though OpenType treats them as such.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize)]
pub struct ClassMap {
    pub format: u16,
    classes: BTreeMap<u16, u16>,
}

impl ClassMap {
    /// Parses and expands a class definition table.
    ///
    /// Format 2 ranges are walked for at most [`MAX_EXPANDED_GLYPHS`] glyphs in total.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let format = s.read::<u16>()?;
        let mut classes = BTreeMap::new();
        match format {
            1 => {
                let start = s.read::<u16>()?;
                let count = s.read::<u16>()?;
                let values = s.read_array16::<u16>(count)?;
                for (i, class) in values.into_iter().enumerate() {
                    // Prevent overflow.
                    let glyph = match u16::try_from(usize::from(start) + i) {
                        Ok(g) => g,
                        Err(_) => break,
                    };
                    classes.insert(glyph, class);
                }
            }
            2 => {
                let count = s.read::<u16>()?;
                let records = s.read_array16::<RangeRecord>(count)?;
                // Counts visited glyphs, not inserted ones, since ranges can overlap.
                let mut room = MAX_EXPANDED_GLYPHS;
                for record in records {
                    if room == 0 {
                        break;
                    }

                    let len = record.len().min(room);
                    room -= len;
                    for i in 0..len {
                        // Overlapping ranges: the first one wins.
                        classes.entry(record.start.wrapping_add(i as u16)).or_insert(record.value);
                    }
                }
            }
            _ => return Err(DecodeError::InvalidValue { what: "class definition format", value: u32::from(format) }),
        }

        Ok(ClassMap { format, classes })
    }

    /// Returns a glyph's class.
    #[inline]
    pub fn class_of(&self, glyph: u16) -> Option<u16> {
        self.classes.get(&glyph).copied()
    }

    /// Returns the number of glyphs with an entry.
    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Checks that there are no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Returns the number of glyphs per class.
    pub fn class_counts(&self) -> BTreeMap<u16, usize> {
        let mut counts = BTreeMap::new();
        for class in self.classes.values() {
            *counts.entry(*class).or_insert(0) += 1;
        }
        counts
    }

    /// Returns an iterator over `(glyph, class)` pairs in glyph order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.classes.iter().map(|(g, c)| (*g, *c))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format1() {
        let data = &[
            0x00, 0x01, // format: 1
            0x00, 0x05, // start glyph: 5
            0x00, 0x03, // glyph count: 3
            0x00, 0x01, // class [0]: 1
            0x00, 0x00, // class [1]: 0
            0x00, 0x02, // class [2]: 2
        ];
        let map = ClassMap::parse(data).unwrap();
        assert_eq!(map.class_of(4), None);
        assert_eq!(map.class_of(5), Some(1));
        assert_eq!(map.class_of(6), Some(0));
        assert_eq!(map.class_of(7), Some(2));
        assert_eq!(map.class_of(8), None);
    }

    #[test]
    fn format1_overflow() {
        let data = &[
            0x00, 0x01, // format: 1
            0xFF, 0xFF, // start glyph: 65535
            0x00, 0x02, // glyph count: 2
            0x00, 0x01, // class [0]: 1
            0x00, 0x01, // class [1]: 1
        ];
        let map = ClassMap::parse(data).unwrap();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn format2() {
        let data = &[
            0x00, 0x02, // format: 2
            0x00, 0x02, // range count: 2
            0x00, 0x00, 0x00, 0x04, 0x00, 0x01, // 0..=4 -> 1
            0x00, 0x05, 0x00, 0x09, 0x00, 0x02, // 5..=9 -> 2
        ];
        let map = ClassMap::parse(data).unwrap();
        assert_eq!(map.class_of(3), Some(1));
        assert_eq!(map.class_of(7), Some(2));
        assert_eq!(map.class_of(100), None);
        assert_eq!(map.class_counts().get(&2), Some(&5));
    }

    #[test]
    fn format2_overlapping_ranges() {
        let mut data = vec![
            0x00, 0x02, // format: 2
            0x00, 0x04, // range count: 4
        ];
        for class in 1..=3 {
            data.extend_from_slice(&[0x00, 0x00, 0x7F, 0xFF, 0x00, class]); // 0..=32767
        }
        data.extend_from_slice(&[0x9C, 0x40, 0x9C, 0x40, 0x00, 0x04]); // 40000..=40000 -> 4

        let map = ClassMap::parse(&data).unwrap();
        assert_eq!(map.len(), 32768);
        assert_eq!(map.class_of(0), Some(1));
        assert_eq!(map.class_of(32767), Some(1));
        // The first two ranges used up the walk.
        assert_eq!(map.class_of(40000), None);
    }
}
