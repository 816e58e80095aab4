// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use hashbrown::{HashMap, HashSet};

use crate::{
    Error, Markup, MarkupId, MarkupRegistry, MarkupType, MarkupValue, SpanTransitions, TextRange,
};

/// One markup instance attached to a range of the text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    id: MarkupId,
    markup: Markup,
    pub(crate) range: Range<usize>,
}

impl Attachment {
    /// The identity of this instance.
    pub fn id(&self) -> MarkupId {
        self.id
    }

    /// The attached markup.
    pub fn markup(&self) -> &Markup {
        &self.markup
    }

    /// The byte range this markup covers.
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Returns `true` for a zero-length marker waiting for typed text.
    pub fn is_marker(&self) -> bool {
        self.range.is_empty()
    }
}

/// A text buffer with markups attached to ranges of it.
///
/// `MarkupText` keeps every attachment in a [`SpanTransitions`] index, which all queries read.
/// Operations without an explicit range act on the current [selection](Self::selection).
#[derive(Clone, Debug)]
pub struct MarkupText {
    pub(crate) text: String,
    registry: MarkupRegistry,
    pub(crate) attachments: HashMap<MarkupId, Attachment>,
    pub(crate) transitions: SpanTransitions,
    pub(crate) selection: TextRange,
    next_id: u32,
}

impl MarkupText {
    /// Create a `MarkupText` with no markups, using [`MarkupRegistry::standard`].
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_registry(text, MarkupRegistry::standard())
    }

    /// Create a `MarkupText` with no markups and the given registry.
    pub fn with_registry(text: impl Into<String>, registry: MarkupRegistry) -> Self {
        Self {
            text: text.into(),
            registry,
            attachments: HashMap::new(),
            transitions: SpanTransitions::new(),
            selection: TextRange::default(),
            next_id: 0,
        }
    }

    /// The text without any markup.
    pub fn plain_text(&self) -> &str {
        &self.text
    }

    /// Returns the length of the text, in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` if the text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The registry used to instantiate markup types.
    pub fn registry(&self) -> &MarkupRegistry {
        &self.registry
    }

    /// Mutable access to the registry.
    pub fn registry_mut(&mut self) -> &mut MarkupRegistry {
        &mut self.registry
    }

    /// Registers `prototype` under `kind`. See [`MarkupRegistry::register`].
    pub fn register_markup_type(&mut self, kind: MarkupType, prototype: Markup) {
        self.registry.register(kind, prototype);
    }

    /// Validates `range` against the current text.
    pub fn range(&self, range: Range<usize>) -> Result<TextRange, Error> {
        TextRange::new(&self.text, range)
    }

    /// The current selection; a caret when empty.
    pub fn selection(&self) -> TextRange {
        self.selection
    }

    /// Sets the selection the range-less operations act on.
    pub fn set_selection(&mut self, range: impl Into<Range<usize>>) -> Result<(), Error> {
        self.selection = self.range(range.into())?;
        Ok(())
    }

    /// Applies a new markup of `kind`, built from `value`, over the selection.
    pub fn apply(
        &mut self,
        kind: MarkupType,
        value: Option<&MarkupValue>,
    ) -> Result<MarkupId, Error> {
        let markup = self.registry.create(kind, value)?;
        Ok(self.attach(markup, self.selection))
    }

    /// Attaches `markup` over `range`.
    ///
    /// An empty range creates a marker: the markup is extended over text typed at that offset.
    /// The markup's type does not need to be registered.
    pub fn apply_markup(&mut self, markup: Markup, range: Range<usize>) -> Result<MarkupId, Error> {
        let range = self.range(range)?;
        Ok(self.attach(markup, range))
    }

    fn attach(&mut self, markup: Markup, range: TextRange) -> MarkupId {
        let id = MarkupId::new(self.next_id);
        self.next_id += 1;
        self.attach_as(id, markup, range.as_range());
        id
    }

    fn attach_as(&mut self, id: MarkupId, markup: Markup, range: Range<usize>) {
        log::debug!("attach {id} (type {}) over {range:?}", markup.kind());
        self.transitions.insert(id, range.clone());
        self.attachments.insert(id, Attachment { id, markup, range });
    }

    /// Removes markups of `kind` from the selection.
    pub fn remove(&mut self, kind: MarkupType) -> Result<(), Error> {
        self.remove_in(kind, self.selection.as_range())
    }

    /// Removes markups of `kind` from `range`.
    ///
    /// Every attachment of `kind` intersecting `range` is detached; splittable ones keep the
    /// parts that lie outside `range`.
    pub fn remove_in(&mut self, kind: MarkupType, range: Range<usize>) -> Result<(), Error> {
        self.registry.prototype(kind)?;
        let range = self.range(range)?;
        for id in self.ids_where(range, intersects) {
            if self
                .attachments
                .get(&id)
                .is_some_and(|a| a.markup.kind() == kind)
            {
                self.detach(id, range);
            }
        }
        Ok(())
    }

    /// Removes every markup from the selection.
    pub fn remove_all(&mut self) {
        self.remove_all_within(self.selection);
    }

    /// Removes every markup from `range`, splitting where allowed.
    pub fn remove_all_in(&mut self, range: Range<usize>) -> Result<(), Error> {
        let range = self.range(range)?;
        self.remove_all_within(range);
        Ok(())
    }

    fn remove_all_within(&mut self, range: TextRange) {
        for id in self.ids_where(range, intersects) {
            self.detach(id, range);
        }
    }

    /// Removes the attachment `id` from `range`, keeping its outer parts if it is splittable.
    ///
    /// Returns `false` if `id` is not attached.
    pub fn remove_markup(&mut self, id: MarkupId, range: Range<usize>) -> Result<bool, Error> {
        let range = self.range(range)?;
        Ok(self.detach(id, range))
    }

    /// Removes every attachment.
    pub fn clear(&mut self) {
        self.attachments.clear();
        self.transitions.clear();
    }

    /// Detaches `id` and re-attaches the parts of it outside `removed` when splittable.
    ///
    /// The left remainder keeps `id`. The right remainder keeps `id` only when there is no left
    /// remainder, and otherwise gets a fresh id carrying the same markup value.
    fn detach(&mut self, id: MarkupId, removed: TextRange) -> bool {
        let Some(Attachment { markup, range, .. }) = self.attachments.remove(&id) else {
            return false;
        };
        self.transitions.remove(id, range.clone());
        if !markup.is_splittable() {
            log::debug!("detach {id} (type {}) from {range:?}", markup.kind());
            return true;
        }
        log::debug!(
            "split {id} (type {}) {range:?} around {:?}",
            markup.kind(),
            removed.as_range()
        );
        let mut reused = false;
        if range.start < removed.start() {
            let left = range.start..removed.start().min(range.end);
            self.attach_as(id, markup.clone(), left);
            reused = true;
        }
        if range.end > removed.end() {
            let right = removed.end().max(range.start)..range.end;
            if reused {
                self.attach(markup, TextRange::new_unchecked(right.start, right.end));
            } else {
                self.attach_as(id, markup, right);
            }
        }
        true
    }

    /// Replaces markups of `kind` on the selection with one built from `value`.
    ///
    /// The new markup is constructed first, so a construction failure changes nothing.
    pub fn update(
        &mut self,
        kind: MarkupType,
        value: Option<&MarkupValue>,
    ) -> Result<MarkupId, Error> {
        let markup = self.registry.create(kind, value)?;
        self.remove(kind)?;
        Ok(self.attach(markup, self.selection))
    }

    /// Whether any markup of `kind` intersects the selection.
    pub fn is_applied(&self, kind: MarkupType) -> Result<bool, Error> {
        self.is_applied_in(kind, self.selection.as_range())
    }

    /// Whether any markup of `kind` intersects `range`.
    ///
    /// For an empty `range` this includes attachments that start or end at that offset, so a
    /// caret just after bold text reports bold.
    pub fn is_applied_in(&self, kind: MarkupType, range: Range<usize>) -> Result<bool, Error> {
        self.registry.prototype(kind)?;
        let range = self.range(range)?;
        Ok(self.ids_where(range, intersects).iter().any(|id| {
            self.attachments
                .get(id)
                .is_some_and(|a| a.markup.kind() == kind)
        }))
    }

    /// Whether the attachment `id` exists.
    pub fn is_attached(&self, id: MarkupId) -> bool {
        self.attachments.contains_key(&id)
    }

    /// Whether the attachment `id` lies entirely within `range`.
    pub fn markup_is_applied_within(
        &self,
        id: MarkupId,
        range: Range<usize>,
    ) -> Result<bool, Error> {
        let range = self.range(range)?;
        Ok(self
            .attachments
            .get(&id)
            .is_some_and(|a| range.start() <= a.range.start && a.range.end <= range.end()))
    }

    /// Looks up one attachment.
    pub fn attachment(&self, id: MarkupId) -> Option<&Attachment> {
        self.attachments.get(&id)
    }

    /// Iterates all attachments ordered by start offset.
    pub fn attachments(&self) -> impl Iterator<Item = &Attachment> + '_ {
        self.transitions
            .iter()
            .flat_map(|(_, t)| t.starting())
            .filter_map(|id| self.attachments.get(id))
    }

    /// The number of attachments.
    pub fn attachment_count(&self) -> usize {
        self.attachments.len()
    }

    /// The markups lying entirely within the selection.
    pub fn applied_markups(&self) -> Vec<&Attachment> {
        self.lookup_all(self.contained_ids(self.selection))
    }

    /// The markups lying entirely within `range`, in the order their ends are reached.
    ///
    /// This is a containment query: attachments that merely intersect `range` are excluded.
    /// Zero-length markers inside `range`, including at either end, are included.
    pub fn applied_markups_in(&self, range: Range<usize>) -> Result<Vec<&Attachment>, Error> {
        let range = self.range(range)?;
        Ok(self.lookup_all(self.contained_ids(range)))
    }

    /// Markers anchored at `offset`.
    pub fn markers_at(&self, offset: usize) -> Vec<MarkupId> {
        let ending = self.transitions.ending_at(offset);
        self.transitions
            .starting_at(offset)
            .iter()
            .copied()
            .filter(|id| ending.contains(id))
            .collect()
    }

    /// Attachments whose range starts at `offset`.
    pub fn spans_starting_at(&self, offset: usize) -> &[MarkupId] {
        self.transitions.starting_at(offset)
    }

    /// Attachments whose range ends at `offset`.
    pub fn spans_ending_at(&self, offset: usize) -> &[MarkupId] {
        self.transitions.ending_at(offset)
    }

    /// The span transition index.
    pub fn transitions(&self) -> &SpanTransitions {
        &self.transitions
    }

    /// Toggles `kind` on the selection, as a formatting button would.
    ///
    /// Markups overlapping the selection that `kind` cannot coexist with are removed from it
    /// first, keeping the parts outside the selection when they are splittable. If that removed
    /// a markup of `kind` itself, the click turned it off and nothing is applied, unless `kind`
    /// is attributed: attributed markups are always re-applied so that a changed value (a new
    /// link target, say) takes effect.
    ///
    /// With a caret, only spans the caret lies strictly inside are affected, since text typed
    /// at either end of a span is not covered by it. Clicking inside bold text splits the bold
    /// at the caret, so the next typed text is not bold.
    pub fn on_markup_menu_clicked(
        &mut self,
        kind: MarkupType,
        value: Option<&MarkupValue>,
    ) -> Result<(), Error> {
        let prototype = self.registry.prototype(kind)?.clone();
        let markup = self.registry.create(kind, value)?;
        let selection = self.selection;

        let mut toggled = false;
        for id in self.ids_where(selection, toggles) {
            let Some(existing) = self.attachments.get(&id).map(|a| a.markup.kind()) else {
                continue;
            };
            if !prototype.can_exist_with(existing) {
                self.detach(id, selection);
                toggled |= existing == kind;
            }
        }

        if prototype.is_attributed() || !toggled {
            self.attach(markup, selection);
        } else {
            log::debug!("type {kind} toggled off over {:?}", selection.as_range());
        }
        Ok(())
    }

    fn lookup_all(&self, ids: Vec<MarkupId>) -> Vec<&Attachment> {
        ids.iter().filter_map(|id| self.attachments.get(id)).collect()
    }

    /// Scans the transitions in `range` (both ends inclusive) and yields each attachment whose
    /// start and end were both seen, in the order the ends were reached.
    pub(crate) fn contained_ids(&self, range: TextRange) -> Vec<MarkupId> {
        let mut started = HashSet::new();
        let mut contained = Vec::new();
        for (_, transition) in self.transitions.range(range.start()..=range.end()) {
            started.extend(transition.starting().iter().copied());
            for id in transition.ending() {
                if started.remove(id) {
                    contained.push(*id);
                }
            }
        }
        contained
    }

    /// Attachments starting at or before the end of `range` that `pred` selects, by start.
    fn ids_where(
        &self,
        range: TextRange,
        pred: fn(&Range<usize>, TextRange) -> bool,
    ) -> Vec<MarkupId> {
        self.transitions
            .range(..=range.end())
            .flat_map(|(_, t)| t.starting().iter().copied())
            .filter(|id| {
                self.attachments
                    .get(id)
                    .is_some_and(|a| pred(&a.range, range))
            })
            .collect()
    }
}

/// Whether an attachment over `span` intersects `range`.
///
/// When either side is empty, touching counts.
fn intersects(span: &Range<usize>, range: TextRange) -> bool {
    if span.is_empty() || range.is_empty() {
        span.start <= range.end() && range.start() <= span.end
    } else {
        span.start < range.end() && range.start() < span.end
    }
}

/// Whether a toggle over `range` affects an attachment over `span`.
///
/// Like [`intersects`], except that a caret only affects non-empty spans it lies strictly inside.
fn toggles(span: &Range<usize>, range: TextRange) -> bool {
    if range.is_empty() && !span.is_empty() {
        span.start < range.start() && range.start() < span.end
    } else {
        intersects(span, range)
    }
}
