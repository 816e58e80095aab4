// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use markup_text::MarkupId;

/// Error type for serialization.
///
/// Serialization only fails when the span transition index is inconsistent: an attachment that
/// is opened and never closed, or closed without being open. Both indicate a bug in whatever
/// maintained the index, not bad input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    spans: Vec<MarkupId>,
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The attachments that could not be matched.
    pub fn spans(&self) -> &[MarkupId] {
        &self.spans
    }

    pub(crate) fn malformed_spans(spans: Vec<MarkupId>) -> Self {
        Self {
            kind: ErrorKind::MalformedSpans,
            spans,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::MalformedSpans => {
                f.write_str("unbalanced spans in transition index:")?;
                for id in &self.spans {
                    write!(f, " {id}")?;
                }
                Ok(())
            }
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A span was opened but never closed, or closed without being open.
    MalformedSpans,
}
