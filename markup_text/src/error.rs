// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::MarkupType;

/// Error type for markup text operations.
///
/// Carries a non-exhaustive [`ErrorKind`] plus the context needed to report it: the attempted
/// range and text length for range errors, the offending [`MarkupType`] for registry and
/// construction errors, and the enclosing UTF-8 character span for boundary errors.
///
/// Every operation validates before it mutates, so an `Err` never leaves a partial effect.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    kind: ErrorKind,

    /// The start byte index of the caller-provided range, or `0`.
    start: usize,

    /// The end byte index (exclusive) of the caller-provided range, or `0`.
    end: usize,

    /// The length in bytes of the underlying text at the time of failure.
    len: usize,

    /// Extra detail for boundary-related errors.
    boundary: Option<BoundaryInfo>,

    /// The markup type the failing operation referred to.
    markup_type: Option<MarkupType>,
}

#[expect(
    clippy::len_without_is_empty,
    reason = "`Error::len` reports source text length context; an `is_empty` method would be misleading and unused."
)]
impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The start byte index of the range provided by the caller.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The end byte index of the range provided by the caller.
    pub fn end(&self) -> usize {
        self.end
    }

    /// The length in bytes of the underlying text at the time of the error.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Extra details for boundary-related errors, if available.
    pub fn boundary(&self) -> Option<BoundaryInfo> {
        self.boundary
    }

    /// The markup type involved in a registry or construction error.
    pub fn markup_type(&self) -> Option<MarkupType> {
        self.markup_type
    }

    fn range_error(kind: ErrorKind, start: usize, end: usize, len: usize) -> Self {
        Self {
            kind,
            start,
            end,
            len,
            boundary: None,
            markup_type: None,
        }
    }

    fn markup_error(kind: ErrorKind, markup_type: MarkupType) -> Self {
        Self {
            kind,
            start: 0,
            end: 0,
            len: 0,
            boundary: None,
            markup_type: Some(markup_type),
        }
    }

    pub(crate) fn invalid_bounds(start: usize, end: usize, len: usize) -> Self {
        Self::range_error(ErrorKind::InvalidBounds, start, end, len)
    }

    pub(crate) fn invalid_range(start: usize, end: usize, len: usize) -> Self {
        Self::range_error(ErrorKind::InvalidRange, start, end, len)
    }

    pub(crate) fn not_on_char_boundary(
        text: &str,
        start: usize,
        end: usize,
        which: Endpoint,
        index: usize,
    ) -> Self {
        let (char_start, char_end) = enclosing_char_span(text, index).unwrap_or((index, index));
        Self {
            boundary: Some(BoundaryInfo {
                which,
                index,
                char_start,
                char_end,
            }),
            ..Self::range_error(ErrorKind::NotOnCharBoundary, start, end, text.len())
        }
    }

    pub(crate) fn unknown_type(markup_type: MarkupType) -> Self {
        Self::markup_error(ErrorKind::UnknownType, markup_type)
    }

    /// An attributed markup was constructed without the value it requires.
    ///
    /// Public so that host-provided [`MarkupFactory`](crate::MarkupFactory) functions can
    /// report construction failures the same way the built-in factories do.
    pub fn missing_value(markup_type: MarkupType) -> Self {
        Self::markup_error(ErrorKind::MissingValue, markup_type)
    }

    /// A markup was constructed with a value it cannot use.
    pub fn unexpected_value(markup_type: MarkupType) -> Self {
        Self::markup_error(ErrorKind::UnexpectedValue, markup_type)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::InvalidBounds => write!(
                f,
                "range {}..{} out of bounds for len {}",
                self.start, self.end, self.len
            ),
            ErrorKind::InvalidRange => {
                write!(f, "invalid range {}..{}: start > end", self.start, self.end)
            }
            ErrorKind::NotOnCharBoundary => match self.boundary {
                Some(b) => {
                    let which = match b.which {
                        Endpoint::Start => "start",
                        Endpoint::End => "end",
                    };
                    write!(
                        f,
                        "range {}..{}: {} index {} not on UTF-8 boundary (char {}..{})",
                        self.start, self.end, which, b.index, b.char_start, b.char_end
                    )
                }
                None => write!(
                    f,
                    "range {}..{} not on UTF-8 boundary",
                    self.start, self.end
                ),
            },
            ErrorKind::UnknownType => match self.markup_type {
                Some(ty) => write!(f, "markup type {ty} is not registered"),
                None => f.write_str("markup type is not registered"),
            },
            ErrorKind::MissingValue => match self.markup_type {
                Some(ty) => write!(f, "markup type {ty} requires a value"),
                None => f.write_str("markup requires a value"),
            },
            ErrorKind::UnexpectedValue => match self.markup_type {
                Some(ty) => write!(f, "markup type {ty} does not accept this value"),
                None => f.write_str("markup does not accept this value"),
            },
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Provided range indices were out of bounds relative to the text length.
    InvalidBounds,

    /// The provided range had `start > end`.
    InvalidRange,

    /// Either `start` or `end` was not aligned to a UTF-8 character boundary.
    NotOnCharBoundary,

    /// The operation referred to a markup type that was never registered.
    UnknownType,

    /// An attributed markup type was instantiated without a value.
    MissingValue,

    /// A markup type was instantiated with a value of the wrong shape.
    UnexpectedValue,
}

/// Identifies which endpoint of a range failed boundary validation.
///
/// This type is surfaced via [`BoundaryInfo`], which is attached to [`Error`]
/// for boundary-related failures.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// The `start` endpoint of the range.
    Start,

    /// The `end` endpoint of the range.
    End,
}

/// Details about an offending index that was not on a UTF-8 character boundary.
///
/// Returned by [`Error::boundary`] when the error kind is
/// [`ErrorKind::NotOnCharBoundary`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoundaryInfo {
    /// Which endpoint (`start` or `end`) was invalid.
    pub which: Endpoint,

    /// The offending byte index.
    pub index: usize,

    /// The start byte index of the enclosing UTF-8 codepoint.
    pub char_start: usize,

    /// The end byte index (exclusive) of the enclosing UTF-8 codepoint.
    pub char_end: usize,
}

fn enclosing_char_span(text: &str, index: usize) -> Option<(usize, usize)> {
    if index > text.len() {
        return None;
    }
    if text.is_char_boundary(index) {
        return Some((index, index));
    }
    // A codepoint is at most 4 bytes, and offset 0 is always a boundary.
    let start = (index.saturating_sub(3)..index)
        .rev()
        .find(|&i| text.is_char_boundary(i))?;
    let end = (index + 1..=text.len().min(index + 3)).find(|&i| text.is_char_boundary(i))?;
    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::{enclosing_char_span, Error};
    use crate::{ErrorKind, MarkupType};
    use alloc::string::ToString;

    #[test]
    fn enclosing_span_of_multibyte_char() {
        // "é" is 2 bytes, "€" is 3 bytes.
        let t = "é€x";
        assert_eq!(enclosing_char_span(t, 0), Some((0, 0)));
        assert_eq!(enclosing_char_span(t, 1), Some((0, 2)));
        assert_eq!(enclosing_char_span(t, 3), Some((2, 5)));
        assert_eq!(enclosing_char_span(t, 4), Some((2, 5)));
        assert_eq!(enclosing_char_span(t, 9), None);
    }

    #[test]
    fn markup_errors_report_their_type() {
        let err = Error::unknown_type(MarkupType::new(42));
        assert_eq!(err.kind(), ErrorKind::UnknownType);
        assert_eq!(err.markup_type(), Some(MarkupType::new(42)));
        assert_eq!(err.to_string(), "markup type 42 is not registered");

        let err = Error::missing_value(MarkupType::LINK);
        assert_eq!(err.kind(), ErrorKind::MissingValue);
        assert!(err.to_string().contains("requires a value"));
    }
}
