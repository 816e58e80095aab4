// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The markup value model: types, attributes and instance identities.

use alloc::format;
use alloc::sync::Arc;
use core::fmt;

use smallvec::SmallVec;

/// Identifies a kind of markup.
///
/// The well-known constants cover the standard vocabulary registered by
/// [`MarkupRegistry::standard`](crate::MarkupRegistry::standard). Hosts may register any other
/// id for their own markups.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkupType(u16);

impl MarkupType {
    /// Bold text.
    pub const BOLD: Self = Self(1);
    /// Italic text.
    pub const ITALIC: Self = Self(2);
    /// Underlined text.
    pub const UNDERLINE: Self = Self(3);
    /// A hyperlink, carrying an `href` attribute.
    pub const LINK: Self = Self(4);
    /// A font face, size and color.
    pub const FONT: Self = Self(5);
    /// Struck-through text.
    pub const STRIKETHROUGH: Self = Self(6);
    /// Superscript; excludes [`MarkupType::SUBSCRIPT`].
    pub const SUPERSCRIPT: Self = Self(7);
    /// Subscript; excludes [`MarkupType::SUPERSCRIPT`].
    pub const SUBSCRIPT: Self = Self(8);
    /// Top level heading.
    pub const HEADING_1: Self = Self(9);
    /// Second level heading.
    pub const HEADING_2: Self = Self(10);
    /// Third level heading.
    pub const HEADING_3: Self = Self(11);
    /// Fourth level heading.
    pub const HEADING_4: Self = Self(12);

    /// All heading levels, outermost first.
    pub const HEADINGS: [Self; 4] = [
        Self::HEADING_1,
        Self::HEADING_2,
        Self::HEADING_3,
        Self::HEADING_4,
    ];

    /// Creates a markup type from a raw id.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// The raw id.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for MarkupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identity of one applied markup instance.
///
/// Ids are allocated by [`MarkupText`](crate::MarkupText) and never reused within one text.
/// When a splittable attachment is split, the left remainder keeps the original id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkupId(u32);

impl MarkupId {
    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw id.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MarkupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// An ordered list of `name = value` attribute pairs carried by an attributed markup.
///
/// Names are unique; [`Attributes::set`] replaces an existing value in place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Attributes {
    entries: SmallVec<[(Arc<str>, Arc<str>); 2]>,
}

impl Attributes {
    /// Creates an empty attribute list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Attributes::set`].
    #[must_use]
    pub fn with(mut self, name: impl Into<Arc<str>>, value: impl Into<Arc<str>>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets `name` to `value`, keeping the position of an existing entry.
    pub fn set(&mut self, name: impl Into<Arc<str>>, value: impl Into<Arc<str>>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Returns the value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| &**n == name)
            .map(|(_, v)| &**v)
    }

    /// Iterates the attributes in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(n, v)| (&**n, &**v))
    }

    /// The number of attributes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A typed formatting instruction that can be attached to a range of text.
///
/// A `Markup` is a value; its identity once applied is the [`MarkupId`] of its attachment.
/// Markups without [`Attributes`] are stateless and every application is interchangeable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Markup {
    kind: MarkupType,
    splittable: bool,
    excludes: SmallVec<[MarkupType; 4]>,
    attributes: Option<Attributes>,
}

impl Markup {
    /// A splittable, unattributed markup that only excludes its own type.
    pub fn new(kind: MarkupType) -> Self {
        Self {
            kind,
            splittable: true,
            excludes: SmallVec::new(),
            attributes: None,
        }
    }

    /// Sets whether removing part of an attachment keeps the remainders.
    #[must_use]
    pub fn splittable(mut self, splittable: bool) -> Self {
        self.splittable = splittable;
        self
    }

    /// Adds types this markup cannot coexist with, in addition to its own type.
    #[must_use]
    pub fn excluding(mut self, kinds: impl IntoIterator<Item = MarkupType>) -> Self {
        for kind in kinds {
            if kind != self.kind && !self.excludes.contains(&kind) {
                self.excludes.push(kind);
            }
        }
        self
    }

    /// Makes this an attributed markup carrying `attributes`.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub(crate) fn set_kind(&mut self, kind: MarkupType) {
        self.excludes.retain(|k| *k != kind);
        self.kind = kind;
    }

    /// The type of this markup.
    pub fn kind(&self) -> MarkupType {
        self.kind
    }

    /// Whether this markup may be split into independent remainders.
    pub fn is_splittable(&self) -> bool {
        self.splittable
    }

    /// Whether this markup carries an attribute payload.
    ///
    /// Attributed markups are always re-applied by
    /// [`MarkupText::on_markup_menu_clicked`](crate::MarkupText::on_markup_menu_clicked), since
    /// their value may have changed.
    pub fn is_attributed(&self) -> bool {
        self.attributes.is_some()
    }

    /// The attribute payload, if this is an attributed markup.
    pub fn attributes(&self) -> Option<&Attributes> {
        self.attributes.as_ref()
    }

    /// Shorthand for looking up a single attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.as_ref()?.get(name)
    }

    /// The types this markup excludes besides its own.
    pub fn excludes(&self) -> &[MarkupType] {
        &self.excludes
    }

    /// Whether an attachment of `other` may overlap this markup.
    ///
    /// A markup never coexists with its own type: applying it over an existing one of the same
    /// type replaces (or toggles off) the existing one.
    pub fn can_exist_with(&self, other: MarkupType) -> bool {
        other != self.kind && !self.excludes.contains(&other)
    }
}

/// Typed value passed when instantiating a markup type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkupValue {
    /// A single string, such as a link target.
    Text(Arc<str>),
    /// A font description.
    Font(FontSpec),
}

impl From<&str> for MarkupValue {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<FontSpec> for MarkupValue {
    fn from(value: FontSpec) -> Self {
        Self::Font(value)
    }
}

/// Font face, size and color; each part is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontSpec {
    /// Font family name.
    pub family: Option<Arc<str>>,
    /// Size in pixels.
    pub size: Option<u32>,
    /// Color as `0xRRGGBB`.
    pub color: Option<u32>,
}

impl FontSpec {
    /// Converts to `face`, `size` and `color` attributes, skipping unset parts.
    pub fn to_attributes(&self) -> Attributes {
        let mut attributes = Attributes::new();
        if let Some(family) = &self.family {
            attributes.set("face", family.clone());
        }
        if let Some(size) = self.size {
            attributes.set("size", format!("{size}"));
        }
        if let Some(color) = self.color {
            attributes.set("color", format!("#{:06x}", color & 0x00ff_ffff));
        }
        attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn markups_exclude_their_own_type() {
        let bold = Markup::new(MarkupType::BOLD);
        assert!(!bold.can_exist_with(MarkupType::BOLD));
        assert!(bold.can_exist_with(MarkupType::ITALIC));

        let sup = Markup::new(MarkupType::SUPERSCRIPT).excluding([MarkupType::SUBSCRIPT]);
        assert!(!sup.can_exist_with(MarkupType::SUBSCRIPT));
        assert!(!sup.can_exist_with(MarkupType::SUPERSCRIPT));
        assert!(sup.can_exist_with(MarkupType::BOLD));
    }

    #[test]
    fn excluding_skips_self_and_duplicates() {
        let h1 = Markup::new(MarkupType::HEADING_1).excluding(MarkupType::HEADINGS);
        assert_eq!(h1.excludes().len(), 3);
        let h1 = h1.excluding([MarkupType::HEADING_2]);
        assert_eq!(h1.excludes().len(), 3);
    }

    #[test]
    fn attributes_keep_order_and_replace_in_place() {
        let mut attrs = Attributes::new().with("href", "a").with("title", "t");
        attrs.set("href", "b");
        let pairs: Vec<_> = attrs.iter().collect();
        assert_eq!(pairs, [("href", "b"), ("title", "t")]);
        assert_eq!(attrs.get("title"), Some("t"));
        assert_eq!(attrs.get("missing"), None);
    }

    #[test]
    fn font_spec_attributes() {
        let spec = FontSpec {
            family: Some("serif".into()),
            size: None,
            color: Some(0xff8000),
        };
        let attrs = spec.to_attributes();
        let pairs: Vec<_> = attrs.iter().collect();
        assert_eq!(pairs, [("face", "serif"), ("color", "#ff8000")]);
        assert!(FontSpec::default().to_attributes().is_empty());
    }
}
