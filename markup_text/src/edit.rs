// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text edits and how they move attachments.
//!
//! Non-empty attachments are exclusive at both ends: text inserted at their start or end lands
//! outside them, text inserted strictly inside grows them, and an attachment whose text is
//! deleted entirely is dropped. Markers stay put when text is inserted at them, and a pure
//! insertion exactly at a marker re-anchors it over the inserted text.

use alloc::vec::Vec;
use core::ops::Range;

use crate::{Error, MarkupId, MarkupText, TextRange};

/// A replacement of `deleted` bytes at `start` with `inserted` bytes.
#[derive(Clone, Copy, Debug)]
struct TextEdit {
    start: usize,
    deleted: usize,
    inserted: usize,
}

impl TextEdit {
    fn is_pure_insertion(&self) -> bool {
        self.deleted == 0 && self.inserted > 0
    }

    /// Where `offset` lands once the deleted bytes are gone.
    fn collapse(&self, offset: usize) -> usize {
        if offset <= self.start {
            offset
        } else if offset >= self.start + self.deleted {
            offset - self.deleted
        } else {
            self.start
        }
    }

    /// Shifts a collapsed offset that text inserted at it should push right.
    fn push(&self, offset: usize) -> usize {
        if offset >= self.start {
            offset + self.inserted
        } else {
            offset
        }
    }

    /// Shifts a collapsed offset that text inserted at it should leave in place.
    fn keep(&self, offset: usize) -> usize {
        if offset > self.start {
            offset + self.inserted
        } else {
            offset
        }
    }

    /// The new range of a non-empty attachment, or `None` if its text was deleted.
    fn map_span(&self, range: &Range<usize>) -> Option<Range<usize>> {
        let start = self.collapse(range.start);
        let end = self.collapse(range.end);
        (start < end).then(|| self.push(start)..self.keep(end))
    }

    fn map_marker(&self, offset: usize) -> usize {
        self.keep(self.collapse(offset))
    }
}

impl MarkupText {
    /// Inserts `text` at `offset`.
    ///
    /// Markers at `offset` are extended over the inserted text.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), Error> {
        self.replace(offset..offset, text)
    }

    /// Deletes the text in `range`.
    pub fn delete(&mut self, range: Range<usize>) -> Result<(), Error> {
        self.replace(range, "")
    }

    /// Replaces the text in `range` with `text`, moving attachments to match.
    ///
    /// The selection endpoints move past text inserted at them, like a caret after typing.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> Result<(), Error> {
        let range = self.range(range)?;
        let edit = TextEdit {
            start: range.start(),
            deleted: range.end() - range.start(),
            inserted: text.len(),
        };
        if edit.deleted == 0 && edit.inserted == 0 {
            return Ok(());
        }
        log::debug!(
            "edit {:?}: {} bytes deleted, {} inserted",
            range.as_range(),
            edit.deleted,
            edit.inserted
        );

        let markers = self.capture_markers(&edit);
        self.text.replace_range(range.as_range(), text);
        self.remap_attachments(&edit);
        self.reanchor_markers(&edit, markers);

        self.selection = TextRange::new_unchecked(
            edit.push(edit.collapse(self.selection.start())),
            edit.push(edit.collapse(self.selection.end())),
        );
        Ok(())
    }

    fn capture_markers(&self, edit: &TextEdit) -> Vec<MarkupId> {
        if !edit.is_pure_insertion() {
            return Vec::new();
        }
        self.contained_ids(TextRange::new_unchecked(edit.start, edit.start))
    }

    fn remap_attachments(&mut self, edit: &TextEdit) {
        let mut deleted = Vec::new();
        for (&id, attachment) in &mut self.attachments {
            if attachment.range.is_empty() {
                let at = edit.map_marker(attachment.range.start);
                attachment.range = at..at;
            } else if let Some(range) = edit.map_span(&attachment.range) {
                attachment.range = range;
            } else {
                deleted.push(id);
            }
        }
        for id in deleted {
            log::debug!("attachment {id} lost all of its text");
            self.attachments.remove(&id);
        }
        let attachments = &self.attachments;
        self.transitions
            .rebuild(|id| attachments.get(&id).map(|a| a.range.clone()));
    }

    fn reanchor_markers(&mut self, edit: &TextEdit, markers: Vec<MarkupId>) {
        for id in markers {
            let Some(attachment) = self.attachments.get_mut(&id) else {
                continue;
            };
            let old = attachment.range.clone();
            let new = old.start..old.start + edit.inserted;
            log::debug!("re-anchor marker {id} from {old:?} to {new:?}");
            attachment.range = new.clone();
            self.transitions.remove(id, old);
            self.transitions.insert(id, new);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TextEdit;
    use crate::{Markup, MarkupText, MarkupType};
    use alloc::vec::Vec;
    use core::ops::Range;

    fn ranges(text: &MarkupText) -> Vec<Range<usize>> {
        text.attachments().map(|a| a.range()).collect()
    }

    #[test]
    fn edit_mapping() {
        let insert = TextEdit {
            start: 4,
            deleted: 0,
            inserted: 2,
        };
        assert_eq!(insert.map_span(&(4..8)), Some(6..10));
        assert_eq!(insert.map_span(&(0..4)), Some(0..4));
        assert_eq!(insert.map_span(&(2..6)), Some(2..8));
        assert_eq!(insert.map_marker(4), 4);
        assert_eq!(insert.map_marker(5), 7);

        let delete = TextEdit {
            start: 2,
            deleted: 4,
            inserted: 0,
        };
        assert_eq!(delete.map_span(&(3..5)), None);
        assert_eq!(delete.map_span(&(0..4)), Some(0..2));
        assert_eq!(delete.map_span(&(4..9)), Some(2..5));
        assert_eq!(delete.map_marker(4), 2);
    }

    #[test]
    fn typing_at_a_marker_extends_it() {
        let mut text = MarkupText::new("Hello ");
        let id = text
            .apply_markup(Markup::new(MarkupType::BOLD), 6..6)
            .unwrap();
        text.insert(6, "World").unwrap();
        assert_eq!(text.plain_text(), "Hello World");
        assert_eq!(text.attachment(id).unwrap().range(), 6..11);
        assert_eq!(text.spans_starting_at(6), [id]);
        assert_eq!(text.spans_ending_at(11), [id]);
        assert!(text.markers_at(6).is_empty());
    }

    #[test]
    fn typing_elsewhere_shifts_markers() {
        let mut text = MarkupText::new("abc");
        let id = text
            .apply_markup(Markup::new(MarkupType::ITALIC), 2..2)
            .unwrap();
        text.insert(0, "xy").unwrap();
        assert_eq!(text.attachment(id).unwrap().range(), 4..4);
        text.insert(5, "z").unwrap();
        assert_eq!(text.attachment(id).unwrap().range(), 4..4);
    }

    #[test]
    fn spans_are_exclusive_at_both_ends() {
        let mut text = MarkupText::new("abcdef");
        text.apply_markup(Markup::new(MarkupType::BOLD), 2..4)
            .unwrap();
        text.insert(4, "X").unwrap();
        assert_eq!(ranges(&text), [2..4]);
        text.insert(2, "Y").unwrap();
        assert_eq!(ranges(&text), [3..5]);
        text.insert(4, "Z").unwrap();
        assert_eq!(ranges(&text), [3..6]);
        assert_eq!(text.plain_text(), "abYcZdXef");
    }

    #[test]
    fn deleting_all_text_drops_span() {
        let mut text = MarkupText::new("abcdef");
        let gone = text
            .apply_markup(Markup::new(MarkupType::BOLD), 2..4)
            .unwrap();
        let kept = text
            .apply_markup(Markup::new(MarkupType::ITALIC), 1..5)
            .unwrap();
        let marker = text
            .apply_markup(Markup::new(MarkupType::UNDERLINE), 3..3)
            .unwrap();
        text.delete(2..4).unwrap();
        assert_eq!(text.plain_text(), "abef");
        assert!(!text.is_attached(gone));
        assert_eq!(text.attachment(kept).unwrap().range(), 1..3);
        assert_eq!(text.attachment(marker).unwrap().range(), 2..2);
        assert!(text.spans_starting_at(2).contains(&marker));
    }

    #[test]
    fn replacement_does_not_reanchor_markers() {
        let mut text = MarkupText::new("abcdef");
        let marker = text
            .apply_markup(Markup::new(MarkupType::BOLD), 2..2)
            .unwrap();
        text.replace(2..3, "XYZ").unwrap();
        assert_eq!(text.plain_text(), "abXYZdef");
        assert_eq!(text.attachment(marker).unwrap().range(), 2..2);
    }

    #[test]
    fn selection_follows_typing() {
        let mut text = MarkupText::new("ab");
        text.set_selection(2..2).unwrap();
        text.insert(2, "cd").unwrap();
        assert_eq!(text.selection().as_range(), 4..4);
        text.set_selection(1..3).unwrap();
        text.delete(0..2).unwrap();
        assert_eq!(text.selection().as_range(), 0..1);
    }

    #[test]
    fn edits_validate_first() {
        let mut text = MarkupText::new("é");
        assert!(text.insert(1, "x").is_err());
        assert!(text.delete(0..3).is_err());
        assert_eq!(text.plain_text(), "é");
        text.insert(2, "").unwrap();
        assert_eq!(text.plain_text(), "é");
    }
}
