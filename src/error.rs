//! Decoding errors.

use crate::Tag;

/// A result type used by internal parsers.
pub type Result<T> = core::result::Result<T, DecodeError>;

/// A reason why a table or a part of it could not be decoded.
///
/// Decoders never return this type to the caller directly.
/// It is folded into a [`Status`](crate::Status) by [`DecodeResult`](crate::DecodeResult).
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum DecodeError {
    /// A read of `size` bytes at `offset` went past the end of the data.
    #[error("truncated data: need {size} bytes at offset {offset}, only {available} available")]
    Truncated {
        offset: usize,
        size: usize,
        available: usize,
    },

    /// A table has a version this crate does not decode.
    #[error("unsupported {table} version {version:#x}")]
    UnsupportedVersion { table: Tag, version: u32 },

    /// An offset inside a table points outside of it.
    #[error("{what} offset {offset} is outside of the table (length {length})")]
    MalformedOffset {
        what: &'static str,
        offset: usize,
        length: usize,
    },

    /// A value is outside of its allowed range.
    #[error("invalid {what}: {value}")]
    InvalidValue { what: &'static str, value: u32 },

    /// A table this decoder depends on is missing or unusable.
    #[error("required table {0} is missing")]
    MissingTable(Tag),
}
