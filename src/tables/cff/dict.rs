//! A CFF DICT parser.

use core::convert::TryFrom;
use core::ops::Range;

use crate::parser::Stream;

// Limits according to the Adobe Technical Note #5176, chapter 4 DICT Data.
pub(crate) const MAX_OPERANDS_LEN: usize = 48;

const TWO_BYTE_OPERATOR_MARK: u8 = 12;
const END_OF_FLOAT_FLAG: u8 = 0xf;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Operator(pub u16);

impl Operator {
    #[inline]
    pub fn get(self) -> u16 { self.0 }
}


pub(crate) struct DictionaryParser<'a> {
    data: &'a [u8],
    // The current offset.
    offset: usize,
    // Offset to the last operands start.
    operands_offset: usize,
    // Actual operands.
    operands: &'a mut [i32],
    // An amount of operands in the `operands` array.
    operands_len: u16,
}

impl<'a> DictionaryParser<'a> {
    #[inline]
    pub fn new(data: &'a [u8], operands_buffer: &'a mut [i32]) -> Self {
        DictionaryParser {
            data,
            offset: 0,
            operands_offset: 0,
            operands: operands_buffer,
            operands_len: 0,
        }
    }

    /// Finds the next operator. Operands are skipped, not parsed.
    #[inline(never)]
    pub fn parse_next(&mut self) -> Option<Operator> {
        let mut s = Stream::new_at(self.data, self.offset).ok()?;
        self.operands_offset = self.offset;
        while !s.at_end() {
            let b = s.read::<u8>().ok()?;
            if is_dict_one_byte_op(b) {
                let mut operator = u16::from(b);

                // Use a 1200 'prefix' to make two byte operators more readable.
                // 12 3 => 1203
                if b == TWO_BYTE_OPERATOR_MARK {
                    operator = 1200 + u16::from(s.read::<u8>().ok()?);
                }

                self.offset = s.offset();
                return Some(Operator(operator));
            } else {
                skip_number(b, &mut s)?;
            }
        }

        None
    }

    /// Parses operands of the current operator.
    ///
    /// Operands precede an operator, so the operator must be found first.
    pub fn parse_operands(&mut self) -> Option<()> {
        let mut s = Stream::new_at(self.data, self.operands_offset).ok()?;
        self.operands_len = 0;
        while !s.at_end() {
            let b = s.read::<u8>().ok()?;
            if is_dict_one_byte_op(b) {
                break;
            }

            let op = parse_number(b, &mut s)?;
            self.operands[usize::from(self.operands_len)] = op;
            self.operands_len += 1;

            if usize::from(self.operands_len) >= self.operands.len() {
                break;
            }
        }

        Some(())
    }

    #[inline]
    pub fn operands(&self) -> &[i32] {
        &self.operands[..usize::from(self.operands_len)]
    }

    #[inline]
    pub fn parse_offset(&mut self) -> Option<usize> {
        self.parse_operands()?;
        match *self.operands() {
            [n] => usize::try_from(n).ok(),
            _ => None,
        }
    }

    #[inline]
    pub fn parse_range(&mut self) -> Option<Range<usize>> {
        self.parse_operands()?;
        match *self.operands() {
            [len, start] => {
                let len = usize::try_from(len).ok()?;
                let start = usize::try_from(start).ok()?;
                let end = start.checked_add(len)?;
                Some(start..end)
            }
            _ => None,
        }
    }
}

// One-byte CFF DICT Operators according to the
// Adobe Technical Note #5176, Appendix H CFF DICT Encoding.
fn is_dict_one_byte_op(b: u8) -> bool {
    match b {
        0..=27 => true,
        28..=30 => false, // numbers
        31 => true, // Reserved
        32..=254 => false, // numbers
        255 => true, // Reserved
    }
}

// Adobe Technical Note #5177, Table 3 Operand Encoding
fn parse_number(b0: u8, s: &mut Stream) -> Option<i32> {
    match b0 {
        28 => s.read::<i16>().ok().map(i32::from),
        29 => s.read::<i32>().ok(),
        30 => {
            // Real numbers are never needed for summaries.
            skip_real(s)?;
            Some(0)
        }
        32..=246 => Some(i32::from(b0) - 139),
        247..=250 => {
            let b1 = i32::from(s.read::<u8>().ok()?);
            Some((i32::from(b0) - 247) * 256 + b1 + 108)
        }
        251..=254 => {
            let b1 = i32::from(s.read::<u8>().ok()?);
            Some(-(i32::from(b0) - 251) * 256 - b1 - 108)
        }
        _ => None,
    }
}

// Just like `parse_number`, but doesn't actually parse the data.
fn skip_number(b0: u8, s: &mut Stream) -> Option<()> {
    match b0 {
        28 => s.skip::<u16>(),
        29 => s.skip::<u32>(),
        30 => skip_real(s)?,
        32..=246 => {}
        247..=254 => s.skip::<u8>(),
        _ => return None,
    }

    Some(())
}

fn skip_real(s: &mut Stream) -> Option<()> {
    while !s.at_end() {
        let b1 = s.read::<u8>().ok()?;
        let nibble1 = b1 >> 4;
        let nibble2 = b1 & 15;
        if nibble1 == END_OF_FLOAT_FLAG || nibble2 == END_OF_FLOAT_FLAG {
            break;
        }
    }

    Some(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_dict_number() {
        assert_eq!(parse_number(0xFA, &mut Stream::new(&[0x7C])).unwrap(), 1000);
        assert_eq!(parse_number(0xFE, &mut Stream::new(&[0x7C])).unwrap(), -1000);
        assert_eq!(parse_number(0x1C, &mut Stream::new(&[0x27, 0x10])).unwrap(), 10000);
        assert_eq!(parse_number(0x1C, &mut Stream::new(&[0xD8, 0xF0])).unwrap(), -10000);
        assert_eq!(parse_number(0x1D, &mut Stream::new(&[0x00, 0x01, 0x86, 0xA0])).unwrap(), 100000);
        assert_eq!(parse_number(0x1D, &mut Stream::new(&[0xFF, 0xFE, 0x79, 0x60])).unwrap(), -100000);
    }

    #[test]
    fn operators_and_operands() {
        let data = &[
            0x8B, 0x11, // 0 CharStrings
            0x1E, 0x1F, 0x0C, 0x07, // 1.? FontMatrix (real skipped)
            0xF7, 0x00, 0x8C, 0x12, // 108 1 Private
        ];

        let mut buffer = [0; MAX_OPERANDS_LEN];
        let mut parser = DictionaryParser::new(data, &mut buffer);
        assert_eq!(parser.parse_next(), Some(Operator(17)));
        assert_eq!(parser.parse_offset(), Some(0));
        assert_eq!(parser.parse_next(), Some(Operator(1207)));
        assert_eq!(parser.parse_next(), Some(Operator(18)));
        assert_eq!(parser.parse_range(), Some(1..109));
        assert_eq!(parser.parse_next(), None);
    }
}
