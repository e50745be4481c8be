//! A uniform decode result.

use serde::Serialize;

use crate::DecodeError;

/// A decoding status.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "kind", content = "note")]
pub enum Status {
    /// Everything was decoded.
    Complete,
    /// Some parts were skipped or truncated. The note explains which.
    Partial(String),
    /// The table is recognized or unknown, but there is no decoder for it.
    NotImplemented,
    /// Nothing useful could be decoded. Data is a stub.
    Error(String),
}

/// A decoded value paired with a [`Status`].
///
/// Every decoder returns this shape instead of `Result`,
/// so a malformed table never aborts the caller.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct DecodeResult<T> {
    pub data: T,
    pub status: Status,
}

impl<T> DecodeResult<T> {
    #[inline]
    pub fn complete(data: T) -> Self {
        DecodeResult { data, status: Status::Complete }
    }

    #[inline]
    pub fn partial(data: T, note: impl Into<String>) -> Self {
        DecodeResult { data, status: Status::Partial(note.into()) }
    }

    #[inline]
    pub fn not_implemented(data: T) -> Self {
        DecodeResult { data, status: Status::NotImplemented }
    }

    #[inline]
    pub fn error(data: T, error: &DecodeError) -> Self {
        DecodeResult { data, status: Status::Error(error.to_string()) }
    }

    /// Checks that the status is [`Status::Complete`].
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.status == Status::Complete
    }

    /// Checks that the status is [`Status::Error`].
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self.status, Status::Error(_))
    }

    /// Maps the decoded data, keeping the status.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> DecodeResult<U> {
        DecodeResult { data: f(self.data), status: self.status }
    }
}

/// Collects notes about skipped sub-structures.
#[derive(Clone, Default, Debug)]
pub(crate) struct Notes {
    items: Vec<String>,
}

impl Notes {
    #[inline]
    pub fn new() -> Self {
        Notes::default()
    }

    pub fn push(&mut self, note: impl Into<String>) {
        let note = note.into();
        log::warn!("{}", note);
        self.items.push(note);
    }

    /// Records a sub-structure that was skipped because of `error`.
    pub fn skipped(&mut self, what: &str, error: DecodeError) {
        self.push(format!("skipped {}: {}", what, error));
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Folds a parsing outcome and the collected notes into a `DecodeResult`.
    pub fn finish<T: Default>(self, result: crate::Result<T>) -> DecodeResult<T> {
        match result {
            Ok(data) if self.is_empty() => DecodeResult::complete(data),
            Ok(data) => DecodeResult::partial(data, self.items.join("; ")),
            Err(e) => {
                log::warn!("{}", e);
                DecodeResult::error(T::default(), &e)
            }
        }
    }
}

/// Decodes a table that has no sub-structure notes.
pub(crate) fn finish<T: Default>(result: crate::Result<T>) -> DecodeResult<T> {
    Notes::new().finish(result)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_turn_complete_into_partial() {
        let mut notes = Notes::new();
        notes.push("skipped coverage");
        let result = notes.finish(Ok(5u16));
        assert_eq!(result.data, 5);
        assert_eq!(result.status, Status::Partial("skipped coverage".into()));
    }

    #[test]
    fn error_keeps_default_stub() {
        let e = DecodeError::Truncated { offset: 4, size: 2, available: 5 };
        let result: DecodeResult<u16> = finish(Err(e));
        assert!(result.is_error());
        assert_eq!(result.data, 0);
    }
}
