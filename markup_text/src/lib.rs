// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Markup Text tracks typed, possibly overlapping formatting markups (bold, italic, links,
//! fonts, headings, …) over an editable UTF-8 text buffer.
//!
//! - [`Markup`] is the unit of formatting: a [`MarkupType`], an exclusivity rule, a
//!   splittability flag and an optional [`Attributes`] payload.
//! - [`MarkupRegistry`] maps each [`MarkupType`] to a prototype and an optional factory.
//! - [`SpanTransitions`] is the sparse offset index recording which attachments start and end
//!   at each byte offset. It is the positional source of truth for every query.
//! - [`MarkupText`] owns the text, the attachments and the index, and implements apply,
//!   split-aware removal, toggling, range queries and edit re-anchoring.
//!
//! Serialization to a tag stream lives in the `markup_html` crate, which only needs the public
//! API of this one.
//!
//! ## Indices
//!
//! All ranges are half-open **byte ranges** into UTF-8 text and must lie on character
//! boundaries. A zero-length range is a *marker*: formatting waiting for the next typed text.
//!
//! ## Example
//!
//! ```
//! use markup_text::{MarkupText, MarkupType};
//!
//! let mut text = MarkupText::new("Hello World");
//! text.set_selection(0..11).unwrap();
//! text.on_markup_menu_clicked(MarkupType::BOLD, None).unwrap();
//! assert!(text.is_applied(MarkupType::BOLD).unwrap());
//!
//! // Un-bold the middle; the bold attachment is split around the gap.
//! text.remove_in(MarkupType::BOLD, 3..8).unwrap();
//! let ranges: Vec<_> = text.attachments().map(|a| a.range()).collect();
//! assert_eq!(ranges, vec![0..3, 8..11]);
//! ```
//!
//! ## Features
//!
//! - `std` (enabled by default): This is currently unused and is provided for forward compatibility.
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

mod edit;
mod error;
mod markup;
mod markup_text;
mod registry;
mod text_range;
mod transitions;


pub use crate::error::{BoundaryInfo, Endpoint, Error, ErrorKind};
pub use crate::markup::{Attributes, FontSpec, Markup, MarkupId, MarkupType, MarkupValue};
pub use crate::markup_text::{Attachment, MarkupText};
pub use crate::registry::{MarkupFactory, MarkupRegistry};
pub use crate::text_range::TextRange;
pub use crate::transitions::{SpanTransitions, Transition, TransitionsIter};
