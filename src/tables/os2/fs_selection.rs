//! [Font selection flags](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/os2#fsselection).

use serde::Serialize;

/// Decoded `fsSelection` bits.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
#[allow(missing_docs)]
pub struct FsSelection {
    pub italic: bool,
    pub underscore: bool,
    pub negative: bool,
    pub outlined: bool,
    pub strikeout: bool,
    pub bold: bool,
    pub regular: bool,
    /// Version 4+.
    pub use_typo_metrics: bool,
    /// Version 4+.
    pub wws: bool,
    /// Version 4+.
    pub oblique: bool,
    pub reserved_bits: u16,
}

impl FsSelection {
    /// Decodes a raw `fsSelection` value.
    pub fn decode(n: u16) -> Self {
        let bit = |i: u16| n & (1 << i) != 0;
        FsSelection {
            italic: bit(0),
            underscore: bit(1),
            negative: bit(2),
            outlined: bit(3),
            strikeout: bit(4),
            bold: bit(5),
            regular: bit(6),
            use_typo_metrics: bit(7),
            wws: bit(8),
            oblique: bit(9),
            reserved_bits: n & 0xFC00,
        }
    }

    /// Encodes flags back into a raw value.
    pub fn encode(&self) -> u16 {
        [
            self.italic, self.underscore, self.negative, self.outlined, self.strikeout,
            self.bold, self.regular, self.use_typo_metrics, self.wws, self.oblique,
        ]
            .iter()
            .enumerate()
            .filter(|(_, set)| **set)
            .fold(self.reserved_bits & 0xFC00, |n, (i, _)| n | (1 << i))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_italic() {
        let flags = FsSelection::decode(0x0021);
        assert!(flags.italic && flags.bold && !flags.regular);
        assert_eq!(flags.encode(), 0x0021);
    }

    #[test]
    fn round_trip() {
        for n in 0..=u16::MAX {
            assert_eq!(FsSelection::decode(n).encode(), n);
        }
    }
}
