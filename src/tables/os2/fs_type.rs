//! [Embedding permissions](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/os2#fstype).

use serde::Serialize;

const RESTRICTED_LICENSE: u16 = 0x0002;
const PREVIEW_AND_PRINT: u16 = 0x0004;
const EDITABLE: u16 = 0x0008;
const NO_SUBSETTING: u16 = 0x0100;
const BITMAP_EMBEDDING_ONLY: u16 = 0x0200;

const KNOWN_BITS: u16 = RESTRICTED_LICENSE | PREVIEW_AND_PRINT | EDITABLE | NO_SUBSETTING | BITMAP_EMBEDDING_ONLY;

/// Decoded `fsType` bits.
///
/// A zero value is a distinct "installable" state,
/// not the absence of permissions.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize)]
pub struct FsType {
    /// Installable embedding. Set only when the whole value is zero.
    pub unrestricted: bool,
    pub restricted_license: bool,
    pub preview_and_print: bool,
    pub editable: bool,
    pub no_subsetting: bool,
    pub bitmap_embedding_only: bool,
    /// Bits not defined by OpenType.
    pub reserved_bits: u16,
}

impl FsType {
    /// Decodes a raw `fsType` value.
    pub fn decode(n: u16) -> Self {
        FsType {
            unrestricted: n == 0,
            restricted_license: n & RESTRICTED_LICENSE != 0,
            preview_and_print: n & PREVIEW_AND_PRINT != 0,
            editable: n & EDITABLE != 0,
            no_subsetting: n & NO_SUBSETTING != 0,
            bitmap_embedding_only: n & BITMAP_EMBEDDING_ONLY != 0,
            reserved_bits: n & !KNOWN_BITS,
        }
    }

    /// Encodes flags back into a raw value.
    ///
    /// `unrestricted` has no bit of its own and is implied by all other fields being unset.
    pub fn encode(&self) -> u16 {
        let mut n = self.reserved_bits & !KNOWN_BITS;
        if self.restricted_license { n |= RESTRICTED_LICENSE; }
        if self.preview_and_print { n |= PREVIEW_AND_PRINT; }
        if self.editable { n |= EDITABLE; }
        if self.no_subsetting { n |= NO_SUBSETTING; }
        if self.bitmap_embedding_only { n |= BITMAP_EMBEDDING_ONLY; }
        n
    }

    /// Returns the effective usage permission.
    ///
    /// When several usage bits are set, the least restrictive one applies.
    pub fn permission(&self) -> &'static str {
        if self.unrestricted {
            "Installable"
        } else if self.editable {
            "Editable"
        } else if self.preview_and_print {
            "Preview & Print"
        } else if self.restricted_license {
            "Restricted License"
        } else {
            "Installable"
        }
    }
}
