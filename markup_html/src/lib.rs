// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Markup HTML serializes a [`MarkupText`](markup_text::MarkupText) into a well-formed tag stream.
//!
//! - [`HtmlSerializer`] walks the span transitions in offset order and emits properly nested
//!   tags, closing and re-opening spans where two attachments cross.
//! - [`MarkupConverter`] turns one markup into its opening or closing tag. [`HtmlConverter`] is
//!   the standard converter, with a tag table keyed by [`MarkupType`](markup_text::MarkupType).
//! - Markups no converter claims are handed to an optional unknown-markup handler, or skipped.
//!
//! The plain text of the output (everything outside tags) is always the buffer's plain text,
//! and every opening tag has exactly one matching closing tag.
//!
//! ## Example
//!
//! ```
//! use markup_text::{Markup, MarkupText, MarkupType};
//!
//! let mut text = MarkupText::new("Hello World");
//! text.apply_markup(Markup::new(MarkupType::BOLD), 0..5).unwrap();
//! text.apply_markup(Markup::new(MarkupType::ITALIC), 6..11).unwrap();
//! assert_eq!(markup_html::to_html(&text).unwrap(), "<b>Hello</b> <i>World</i>");
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

mod converter;
mod error;
mod serialize;

#[cfg(test)]
mod tests;

pub use crate::converter::{AttributeStyle, HtmlConverter, HtmlOptions, MarkupConverter};
pub use crate::error::{Error, ErrorKind};
pub use crate::serialize::{to_html, to_html_with, HtmlSerializer};
