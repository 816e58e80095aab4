// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Reverse;

use markup_text::{Attachment, Markup, MarkupId, MarkupText};

use crate::{Error, HtmlConverter, MarkupConverter};

/// Serializes a [`MarkupText`] with the standard [`HtmlConverter`].
///
/// Markups of types the converter has no tag for are skipped.
pub fn to_html(text: &MarkupText) -> Result<String, Error> {
    HtmlSerializer::new().serialize(text)
}

/// Serializes a [`MarkupText`] with the standard [`HtmlConverter`], passing markups it has no
/// tag for to `unknown`. See [`HtmlSerializer::serialize_with`].
pub fn to_html_with(
    text: &MarkupText,
    unknown: impl FnMut(&mut String, &Markup, bool) -> bool,
) -> Result<String, Error> {
    HtmlSerializer::new().serialize_with(text, unknown)
}

/// Walks the span transitions of a [`MarkupText`] and writes a properly nested tag stream.
///
/// At every offset where something starts or ends, spans ending there are closed first, then
/// spans starting there are opened (longest first), then the text up to the next transition is
/// written. When a span closes while spans opened after it are still open, as happens when two
/// attachments cross, those spans are closed with it and re-opened right after.
///
/// Zero-length markers carry no text and are not written.
#[derive(Clone, Debug, Default)]
pub struct HtmlSerializer<C = HtmlConverter> {
    converter: C,
}

impl HtmlSerializer {
    /// A serializer using the standard [`HtmlConverter`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: MarkupConverter> HtmlSerializer<C> {
    /// A serializer using `converter` for tags and text.
    pub fn with_converter(converter: C) -> Self {
        Self { converter }
    }

    /// The converter in use.
    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// Serializes `text`, skipping markups the converter does not claim.
    pub fn serialize(&self, text: &MarkupText) -> Result<String, Error> {
        self.serialize_with(text, |_: &mut String, _: &Markup, _: bool| false)
    }

    /// Serializes `text`, passing markups the converter does not claim to `unknown`.
    ///
    /// `unknown` receives the output buffer, the markup and whether the opening tag is wanted,
    /// and returns whether it handled the markup. Markups nobody handles are skipped.
    ///
    /// Fails with [`ErrorKind::MalformedSpans`](crate::ErrorKind::MalformedSpans) if the span
    /// transition index does not pair every start with an end.
    pub fn serialize_with(
        &self,
        text: &MarkupText,
        unknown: impl FnMut(&mut String, &Markup, bool) -> bool,
    ) -> Result<String, Error> {
        let mut stream = TagStream {
            converter: &self.converter,
            unknown,
            out: String::with_capacity(text.len()),
            open: Vec::new(),
        };
        let plain = text.plain_text();
        let transitions = text.transitions();
        let len = text.len();

        let mut at = 0;
        loop {
            stream.close(text, transitions.ending_at(at))?;
            if at >= len {
                break;
            }
            stream.open(text, transitions.starting_at(at));
            let next = transitions.next_transition(at, len);
            stream.converter.write_text(&mut stream.out, &plain[at..next]);
            at = next;
        }

        if !stream.open.is_empty() {
            let unclosed = stream.open.iter().map(|span| span.id).collect();
            return Err(Error::malformed_spans(unclosed));
        }
        Ok(stream.out)
    }
}

#[derive(Clone, Copy)]
struct OpenSpan<'a> {
    id: MarkupId,
    markup: &'a Markup,
    /// Whether a tag was written when the span opened.
    emitted: bool,
}

struct TagStream<'a, C, F> {
    converter: &'a C,
    unknown: F,
    out: String,
    open: Vec<OpenSpan<'a>>,
}

impl<'a, C, F> TagStream<'a, C, F>
where
    C: MarkupConverter,
    F: FnMut(&mut String, &Markup, bool) -> bool,
{
    fn write_tag(&mut self, markup: &Markup, opening: bool) -> bool {
        if self.converter.convert(&mut self.out, markup, opening)
            || (self.unknown)(&mut self.out, markup, opening)
        {
            return true;
        }
        if opening {
            log::warn!("no converter for markup type {}, skipped", markup.kind());
        }
        false
    }

    fn open(&mut self, text: &'a MarkupText, starting: &[MarkupId]) {
        let mut spans: Vec<&'a Attachment> = starting
            .iter()
            .filter_map(|id| text.attachment(*id))
            .filter(|attachment| !attachment.is_marker())
            .collect();
        spans.sort_by_key(|attachment| Reverse(attachment.range().end));
        for attachment in spans {
            let emitted = self.write_tag(attachment.markup(), true);
            self.open.push(OpenSpan {
                id: attachment.id(),
                markup: attachment.markup(),
                emitted,
            });
        }
    }

    fn close(&mut self, text: &MarkupText, ending: &[MarkupId]) -> Result<(), Error> {
        let unmatched: Vec<MarkupId> = ending
            .iter()
            .copied()
            .filter(|id| {
                !self.open.iter().rev().any(|span| span.id == *id)
                    && !text.attachment(*id).is_some_and(Attachment::is_marker)
            })
            .collect();
        if !unmatched.is_empty() {
            return Err(Error::malformed_spans(unmatched));
        }

        let Some(outermost) = self.open.iter().position(|span| ending.contains(&span.id)) else {
            return Ok(());
        };
        let closed = self.open.split_off(outermost);
        for span in closed.iter().rev() {
            if span.emitted {
                self.write_tag(span.markup, false);
            }
        }
        for span in closed {
            if ending.contains(&span.id) {
                continue;
            }
            log::trace!("re-open {} across a crossing close", span.id);
            let emitted = self.write_tag(span.markup, true);
            self.open.push(OpenSpan { emitted, ..span });
        }
        Ok(())
    }
}
