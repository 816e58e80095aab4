// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::borrow::Cow;
use alloc::string::String;

use hashbrown::HashMap;
use markup_text::{Markup, MarkupType};

/// Produces the tag text for a markup.
///
/// A converter is consulted once when an attachment opens and once when it closes. It returns
/// `false` for markups it does not know, which then fall through to the unknown-markup handler
/// of [`HtmlSerializer::serialize_with`](crate::HtmlSerializer::serialize_with).
pub trait MarkupConverter {
    /// Appends the opening (`opening == true`) or closing tag for `markup` to `out`.
    ///
    /// Returns whether the markup was handled. Nothing may be written when returning `false`.
    fn convert(&self, out: &mut String, markup: &Markup, opening: bool) -> bool;

    /// Appends a run of plain text to `out`.
    fn write_text(&self, out: &mut String, text: &str) {
        out.push_str(text);
    }
}

/// How [`HtmlConverter`] lays out attributes in an opening tag.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AttributeStyle {
    /// Each attribute is written as ` name= "value" `, the historical format existing documents
    /// were produced with.
    #[default]
    Padded,
    /// Each attribute is written as ` name="value"`.
    Compact,
}

/// Output options for [`HtmlConverter`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Attribute layout in opening tags.
    pub attribute_style: AttributeStyle,
    /// Escape `&`, `<` and `>` in plain text. Off by default, which writes text verbatim.
    ///
    /// Attribute values are always escaped.
    pub escape_text: bool,
}

/// The standard converter: a table from [`MarkupType`] to tag name.
///
/// | Type | Tag |
/// |------|-----|
/// | [`BOLD`](MarkupType::BOLD) | `b` |
/// | [`ITALIC`](MarkupType::ITALIC) | `i` |
/// | [`UNDERLINE`](MarkupType::UNDERLINE) | `u` |
/// | [`LINK`](MarkupType::LINK) | `a` |
/// | [`FONT`](MarkupType::FONT) | `font` |
/// | [`STRIKETHROUGH`](MarkupType::STRIKETHROUGH) | `s` |
/// | [`SUPERSCRIPT`](MarkupType::SUPERSCRIPT) | `sup` |
/// | [`SUBSCRIPT`](MarkupType::SUBSCRIPT) | `sub` |
/// | [`HEADING_1`](MarkupType::HEADING_1) .. [`HEADING_4`](MarkupType::HEADING_4) | `h1` .. `h4` |
///
/// Attributed markups write their attributes into the opening tag.
#[derive(Clone, Debug)]
pub struct HtmlConverter {
    tags: HashMap<MarkupType, Cow<'static, str>>,
    options: HtmlOptions,
}

impl Default for HtmlConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlConverter {
    /// A converter for the standard markup types with default options.
    pub fn new() -> Self {
        Self::with_options(HtmlOptions::default())
    }

    /// A converter for the standard markup types.
    pub fn with_options(options: HtmlOptions) -> Self {
        let mut converter = Self {
            tags: HashMap::new(),
            options,
        };
        for (kind, tag) in [
            (MarkupType::BOLD, "b"),
            (MarkupType::ITALIC, "i"),
            (MarkupType::UNDERLINE, "u"),
            (MarkupType::LINK, "a"),
            (MarkupType::FONT, "font"),
            (MarkupType::STRIKETHROUGH, "s"),
            (MarkupType::SUPERSCRIPT, "sup"),
            (MarkupType::SUBSCRIPT, "sub"),
            (MarkupType::HEADING_1, "h1"),
            (MarkupType::HEADING_2, "h2"),
            (MarkupType::HEADING_3, "h3"),
            (MarkupType::HEADING_4, "h4"),
        ] {
            converter.register_tag(kind, tag);
        }
        converter
    }

    /// The output options.
    pub fn options(&self) -> HtmlOptions {
        self.options
    }

    /// Maps `kind` to `tag`, replacing any previous mapping.
    pub fn register_tag(&mut self, kind: MarkupType, tag: impl Into<Cow<'static, str>>) {
        self.tags.insert(kind, tag.into());
    }

    /// The tag name for `kind`.
    pub fn tag(&self, kind: MarkupType) -> Option<&str> {
        self.tags.get(&kind).map(|tag| &**tag)
    }
}

impl MarkupConverter for HtmlConverter {
    fn convert(&self, out: &mut String, markup: &Markup, opening: bool) -> bool {
        let Some(tag) = self.tag(markup.kind()) else {
            return false;
        };
        if !opening {
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
            return true;
        }
        out.push('<');
        out.push_str(tag);
        for (name, value) in markup.attributes().into_iter().flat_map(|a| a.iter()) {
            out.push(' ');
            out.push_str(name);
            match self.options.attribute_style {
                AttributeStyle::Padded => out.push_str("= \""),
                AttributeStyle::Compact => out.push_str("=\""),
            }
            escape_attribute(out, value);
            match self.options.attribute_style {
                AttributeStyle::Padded => out.push_str("\" "),
                AttributeStyle::Compact => out.push('"'),
            }
        }
        out.push('>');
        true
    }

    fn write_text(&self, out: &mut String, text: &str) {
        if self.options.escape_text {
            escape_text(out, text);
        } else {
            out.push_str(text);
        }
    }
}

fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attribute(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
