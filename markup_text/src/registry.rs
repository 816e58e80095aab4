// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use hashbrown::HashMap;

use crate::{Attributes, Error, Markup, MarkupType, MarkupValue};

/// Builds a markup instance from a registered prototype and an optional value.
///
/// Construction failures (a missing or ill-typed value) are reported here, before anything is
/// applied.
pub type MarkupFactory = fn(&Markup, Option<&MarkupValue>) -> Result<Markup, Error>;

#[derive(Clone, Debug)]
struct Registration {
    prototype: Markup,
    factory: Option<MarkupFactory>,
}

/// Maps a [`MarkupType`] to its prototype and factory.
///
/// The prototype decides exclusivity, splittability and whether the type is attributed; it is
/// also the instance used when a parameterless type is applied.
#[derive(Clone, Debug, Default)]
pub struct MarkupRegistry {
    registrations: HashMap<MarkupType, Registration>,
}

impl MarkupRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every well-known [`MarkupType`].
    ///
    /// Links and headings are not splittable: removing any part of one removes all of it.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for kind in [
            MarkupType::BOLD,
            MarkupType::ITALIC,
            MarkupType::UNDERLINE,
            MarkupType::STRIKETHROUGH,
        ] {
            registry.register(kind, Markup::new(kind));
        }
        registry.register(
            MarkupType::SUPERSCRIPT,
            Markup::new(MarkupType::SUPERSCRIPT).excluding([MarkupType::SUBSCRIPT]),
        );
        registry.register(
            MarkupType::SUBSCRIPT,
            Markup::new(MarkupType::SUBSCRIPT).excluding([MarkupType::SUPERSCRIPT]),
        );
        for kind in MarkupType::HEADINGS {
            registry.register(
                kind,
                Markup::new(kind)
                    .splittable(false)
                    .excluding(MarkupType::HEADINGS),
            );
        }
        registry.register_with_factory(
            MarkupType::LINK,
            Markup::new(MarkupType::LINK)
                .splittable(false)
                .with_attributes(Attributes::new()),
            link_factory,
        );
        registry.register_with_factory(
            MarkupType::FONT,
            Markup::new(MarkupType::FONT).with_attributes(Attributes::new()),
            font_factory,
        );
        registry
    }

    /// Registers `prototype` under `kind`, replacing any previous registration.
    ///
    /// The prototype is re-keyed to `kind`.
    pub fn register(&mut self, kind: MarkupType, prototype: Markup) {
        self.insert(kind, prototype, None);
    }

    /// Registers `prototype` under `kind` with a factory used to instantiate it.
    pub fn register_with_factory(
        &mut self,
        kind: MarkupType,
        prototype: Markup,
        factory: MarkupFactory,
    ) {
        self.insert(kind, prototype, Some(factory));
    }

    fn insert(&mut self, kind: MarkupType, mut prototype: Markup, factory: Option<MarkupFactory>) {
        prototype.set_kind(kind);
        if self
            .registrations
            .insert(kind, Registration { prototype, factory })
            .is_some()
        {
            log::debug!("markup type {kind} re-registered");
        }
    }

    /// Returns `true` if `kind` has been registered.
    pub fn is_registered(&self, kind: MarkupType) -> bool {
        self.registrations.contains_key(&kind)
    }

    /// The prototype registered for `kind`.
    pub fn prototype(&self, kind: MarkupType) -> Result<&Markup, Error> {
        self.registrations
            .get(&kind)
            .map(|r| &r.prototype)
            .ok_or_else(|| Error::unknown_type(kind))
    }

    /// Instantiates `kind` from `value`.
    ///
    /// Without a factory the prototype is cloned, and supplying a value is an error.
    pub fn create(&self, kind: MarkupType, value: Option<&MarkupValue>) -> Result<Markup, Error> {
        let registration = self
            .registrations
            .get(&kind)
            .ok_or_else(|| Error::unknown_type(kind))?;
        match (registration.factory, value) {
            (Some(factory), _) => factory(&registration.prototype, value),
            (None, None) => Ok(registration.prototype.clone()),
            (None, Some(_)) => Err(Error::unexpected_value(kind)),
        }
    }

    /// The number of registered types.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

fn link_factory(prototype: &Markup, value: Option<&MarkupValue>) -> Result<Markup, Error> {
    match value {
        Some(MarkupValue::Text(href)) => Ok(prototype
            .clone()
            .with_attributes(Attributes::new().with("href", href.clone()))),
        Some(_) => Err(Error::unexpected_value(prototype.kind())),
        None => Err(Error::missing_value(prototype.kind())),
    }
}

fn font_factory(prototype: &Markup, value: Option<&MarkupValue>) -> Result<Markup, Error> {
    match value {
        Some(MarkupValue::Font(spec)) => Ok(prototype
            .clone()
            .with_attributes(spec.to_attributes())),
        Some(_) => Err(Error::unexpected_value(prototype.kind())),
        None => Err(Error::missing_value(prototype.kind())),
    }
}
