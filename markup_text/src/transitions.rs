// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The span transition index.
//!
//! Maps byte offsets to the attachments starting and ending there. Every attachment has exactly
//! one starting entry at its start offset and one ending entry at its end offset; a zero-length
//! attachment has both at the same offset.

use alloc::collections::btree_map::{self, BTreeMap};
use core::ops::{Range, RangeBounds};

use smallvec::SmallVec;

use crate::MarkupId;

/// The attachments starting and ending at one offset, in the order they were recorded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transition {
    starting: SmallVec<[MarkupId; 2]>,
    ending: SmallVec<[MarkupId; 2]>,
}

impl Transition {
    /// Attachments whose range starts here.
    pub fn starting(&self) -> &[MarkupId] {
        &self.starting
    }

    /// Attachments whose range ends here.
    pub fn ending(&self) -> &[MarkupId] {
        &self.ending
    }

    fn is_empty(&self) -> bool {
        self.starting.is_empty() && self.ending.is_empty()
    }
}

/// Sparse, ordered index from byte offset to [`Transition`].
#[derive(Clone, Debug, Default)]
pub struct SpanTransitions {
    transitions: BTreeMap<usize, Transition>,
}

impl SpanTransitions {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, id: MarkupId, range: Range<usize>) {
        log::trace!("index insert {id} at {range:?}");
        self.transitions
            .entry(range.start)
            .or_default()
            .starting
            .push(id);
        self.transitions
            .entry(range.end)
            .or_default()
            .ending
            .push(id);
    }

    /// Removes both entries of `id`. Returns `false` if either was missing.
    pub(crate) fn remove(&mut self, id: MarkupId, range: Range<usize>) -> bool {
        log::trace!("index remove {id} at {range:?}");
        let started = self.remove_entry(range.start, id, true);
        let ended = self.remove_entry(range.end, id, false);
        started && ended
    }

    fn remove_entry(&mut self, offset: usize, id: MarkupId, starting: bool) -> bool {
        let btree_map::Entry::Occupied(mut entry) = self.transitions.entry(offset) else {
            return false;
        };
        let transition = entry.get_mut();
        let list = if starting {
            &mut transition.starting
        } else {
            &mut transition.ending
        };
        let Some(ix) = list.iter().position(|&i| i == id) else {
            return false;
        };
        list.remove(ix);
        if entry.get().is_empty() {
            entry.remove();
        }
        true
    }

    /// Rebuilds the index after the attachments moved, keeping the relative order of entries.
    ///
    /// `remap` returns the new range of an attachment, or `None` if it no longer exists.
    pub(crate) fn rebuild(&mut self, mut remap: impl FnMut(MarkupId) -> Option<Range<usize>>) {
        let old = core::mem::take(&mut self.transitions);
        for transition in old.into_values() {
            for id in transition.starting {
                if let Some(range) = remap(id) {
                    self.transitions
                        .entry(range.start)
                        .or_default()
                        .starting
                        .push(id);
                }
            }
            for id in transition.ending {
                if let Some(range) = remap(id) {
                    self.transitions
                        .entry(range.end)
                        .or_default()
                        .ending
                        .push(id);
                }
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.transitions.clear();
    }

    /// Attachments starting at `offset`; empty when nothing starts there.
    pub fn starting_at(&self, offset: usize) -> &[MarkupId] {
        match self.transitions.get(&offset) {
            Some(t) => &t.starting,
            None => &[],
        }
    }

    /// Attachments ending at `offset`; empty when nothing ends there.
    pub fn ending_at(&self, offset: usize) -> &[MarkupId] {
        match self.transitions.get(&offset) {
            Some(t) => &t.ending,
            None => &[],
        }
    }

    /// The first offset after `offset` and no greater than `limit` at which anything starts or
    /// ends, or `limit` if there is none.
    pub fn next_transition(&self, offset: usize, limit: usize) -> usize {
        if offset >= limit {
            return limit;
        }
        self.transitions
            .range(offset + 1..=limit)
            .next()
            .map_or(limit, |(&at, _)| at)
    }

    /// Iterates all transitions in increasing offset order.
    pub fn iter(&self) -> TransitionsIter<'_> {
        TransitionsIter {
            inner: self.transitions.range(..),
        }
    }

    /// Iterates the transitions whose offset lies in `offsets`, in increasing order.
    pub fn range(&self, offsets: impl RangeBounds<usize>) -> TransitionsIter<'_> {
        TransitionsIter {
            inner: self.transitions.range(offsets),
        }
    }

    /// The number of offsets with at least one transition.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Returns `true` if no attachment is indexed.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

impl<'a> IntoIterator for &'a SpanTransitions {
    type Item = (usize, &'a Transition);
    type IntoIter = TransitionsIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over `(offset, transition)` pairs in increasing offset order.
#[derive(Clone, Debug)]
pub struct TransitionsIter<'a> {
    inner: btree_map::Range<'a, usize, Transition>,
}

impl<'a> Iterator for TransitionsIter<'a> {
    type Item = (usize, &'a Transition);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(&offset, t)| (offset, t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for TransitionsIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(&offset, t)| (offset, t))
    }
}
