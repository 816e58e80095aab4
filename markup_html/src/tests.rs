// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serialization of engine states built through the public editing API.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use proptest::prelude::*;

use markup_text::{FontSpec, Markup, MarkupText, MarkupType, MarkupValue};

use crate::{to_html, to_html_with, AttributeStyle, HtmlConverter, HtmlOptions, HtmlSerializer};

/// Checks that every tag is closed in nesting order and returns the text outside tags.
fn assert_well_formed(html: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    let mut plain = String::new();
    let mut rest = html;
    while let Some(lt) = rest.find('<') {
        plain.push_str(&rest[..lt]);
        let gt = lt + rest[lt..].find('>').expect("tag is terminated");
        let tag = &rest[lt + 1..gt];
        if let Some(name) = tag.strip_prefix('/') {
            assert_eq!(stack.pop(), Some(name), "misnested close in {html}");
        } else {
            stack.push(tag.split(' ').next().unwrap_or(tag));
        }
        rest = &rest[gt + 1..];
    }
    plain.push_str(rest);
    assert!(stack.is_empty(), "unclosed {stack:?} in {html}");
    plain
}

#[test]
fn adjacent_spans() {
    let mut text = MarkupText::new("Hello World");
    text.set_selection(0..5).unwrap();
    text.on_markup_menu_clicked(MarkupType::BOLD, None).unwrap();
    text.set_selection(6..11).unwrap();
    text.on_markup_menu_clicked(MarkupType::ITALIC, None)
        .unwrap();
    assert_eq!(to_html(&text).unwrap(), "<b>Hello</b> <i>World</i>");
}

#[test]
fn split_span() {
    let mut text = MarkupText::new("Hello World");
    text.apply_markup(Markup::new(MarkupType::BOLD), 0..11)
        .unwrap();
    text.remove_in(MarkupType::BOLD, 3..8).unwrap();
    assert_eq!(to_html(&text).unwrap(), "<b>Hel</b>lo Wo<b>rld</b>");
}

#[test]
fn bold_click_inside_bold_splits_it() {
    let mut text = MarkupText::new("Hello World");
    text.apply_markup(Markup::new(MarkupType::BOLD), 0..11)
        .unwrap();
    text.set_selection(3..8).unwrap();
    text.on_markup_menu_clicked(MarkupType::BOLD, None).unwrap();
    assert_eq!(to_html(&text).unwrap(), "<b>Hel</b>lo Wo<b>rld</b>");
}

#[test]
fn plain_text_has_no_tags() {
    assert_eq!(to_html(&MarkupText::new("just text")).unwrap(), "just text");
    assert_eq!(to_html(&MarkupText::new("")).unwrap(), "");
}

#[test]
fn link_uses_padded_attributes() {
    let mut text = MarkupText::new("Home");
    text.set_selection(0..4).unwrap();
    text.on_markup_menu_clicked(MarkupType::LINK, Some(&"http://x".into()))
        .unwrap();
    text.on_markup_menu_clicked(MarkupType::LINK, Some(&"http://y".into()))
        .unwrap();
    assert_eq!(to_html(&text).unwrap(), r#"<a href= "http://y" >Home</a>"#);
}

#[test]
fn compact_attributes_and_escaped_text() {
    let mut text = MarkupText::new("a<b");
    text.set_selection(0..3).unwrap();
    text.apply(MarkupType::LINK, Some(&MarkupValue::from("/x")))
        .unwrap();
    let serializer = HtmlSerializer::with_converter(HtmlConverter::with_options(HtmlOptions {
        attribute_style: AttributeStyle::Compact,
        escape_text: true,
    }));
    assert_eq!(
        serializer.serialize(&text).unwrap(),
        r#"<a href="/x">a&lt;b</a>"#
    );
}

#[test]
fn nested_spans_open_longest_first() {
    let mut text = MarkupText::new("abcdef");
    text.apply_markup(Markup::new(MarkupType::ITALIC), 0..2)
        .unwrap();
    text.apply_markup(Markup::new(MarkupType::BOLD), 0..6)
        .unwrap();
    assert_eq!(to_html(&text).unwrap(), "<b><i>ab</i>cdef</b>");
}

#[test]
fn crossing_spans_are_reopened() {
    let mut text = MarkupText::new("abcdef");
    text.apply_markup(Markup::new(MarkupType::BOLD), 0..4)
        .unwrap();
    text.apply_markup(Markup::new(MarkupType::ITALIC), 2..6)
        .unwrap();
    let html = to_html(&text).unwrap();
    assert_eq!(html, "<b>ab<i>cd</i></b><i>ef</i>");
    assert_eq!(assert_well_formed(&html), "abcdef");
}

#[test]
fn shared_end_closes_innermost_first() {
    let mut text = MarkupText::new("abcd");
    text.apply_markup(Markup::new(MarkupType::BOLD), 0..4)
        .unwrap();
    text.apply_markup(Markup::new(MarkupType::UNDERLINE), 2..4)
        .unwrap();
    assert_eq!(to_html(&text).unwrap(), "<b>ab<u>cd</u></b>");
}

#[test]
fn markers_are_not_written() {
    let mut text = MarkupText::new("Hello ");
    text.set_selection(6..6).unwrap();
    text.on_markup_menu_clicked(MarkupType::BOLD, None).unwrap();
    assert_eq!(to_html(&text).unwrap(), "Hello ");

    text.insert(6, "World").unwrap();
    assert_eq!(to_html(&text).unwrap(), "Hello <b>World</b>");
}

#[test]
fn unknown_markups_go_to_the_handler() {
    let code = MarkupType::new(400);
    let mut text = MarkupText::new("let x");
    text.register_markup_type(code, Markup::new(code));
    text.set_selection(0..3).unwrap();
    text.apply(code, None).unwrap();

    assert_eq!(to_html(&text).unwrap(), "let x");

    let mut calls = 0;
    let html = to_html_with(&text, |out, markup, opening| {
        calls += 1;
        if markup.kind() != code {
            return false;
        }
        out.push_str(if opening { "<code>" } else { "</code>" });
        true
    })
    .unwrap();
    assert_eq!(html, "<code>let</code> x");
    assert_eq!(calls, 2);
}

#[test]
fn font_markup() {
    let mut text = MarkupText::new("big");
    text.set_selection(0..3).unwrap();
    let font = FontSpec {
        family: Some("serif".into()),
        size: Some(20),
        color: Some(0x00ff00),
    };
    text.apply(MarkupType::FONT, Some(&font.into())).unwrap();
    assert_eq!(
        to_html(&text).unwrap(),
        r##"<font face= "serif"  size= "20"  color= "#00ff00" >big</font>"##
    );
}

static KINDS: [MarkupType; 6] = [
    MarkupType::BOLD,
    MarkupType::ITALIC,
    MarkupType::UNDERLINE,
    MarkupType::STRIKETHROUGH,
    MarkupType::SUPERSCRIPT,
    MarkupType::SUBSCRIPT,
];

/// One editing step, with offsets reduced modulo the text length when run.
#[derive(Clone, Debug)]
enum Step {
    Apply(MarkupType, usize, usize),
    Click(MarkupType, usize, usize),
    Remove(MarkupType, usize, usize),
    Insert(usize, String),
    Delete(usize, usize),
}

fn span(a: usize, b: usize, len: usize) -> Range<usize> {
    let (a, b) = (a % (len + 1), b % (len + 1));
    a.min(b)..a.max(b)
}

impl Step {
    fn run(self, text: &mut MarkupText) {
        let len = text.len();
        match self {
            Self::Apply(kind, a, b) => {
                text.apply_markup(Markup::new(kind), span(a, b, len))
                    .unwrap();
            }
            Self::Click(kind, a, b) => {
                text.set_selection(span(a, b, len)).unwrap();
                text.on_markup_menu_clicked(kind, None).unwrap();
            }
            Self::Remove(kind, a, b) => text.remove_in(kind, span(a, b, len)).unwrap(),
            Self::Insert(at, inserted) => text.insert(at % (len + 1), &inserted).unwrap(),
            Self::Delete(a, b) => text.delete(span(a, b, len)).unwrap(),
        }
    }
}

fn step() -> impl Strategy<Value = Step> {
    let kind = || prop::sample::select(&KINDS[..]);
    prop_oneof![
        (kind(), any::<usize>(), any::<usize>()).prop_map(|(k, a, b)| Step::Apply(k, a, b)),
        (kind(), any::<usize>(), any::<usize>()).prop_map(|(k, a, b)| Step::Click(k, a, b)),
        (kind(), any::<usize>(), any::<usize>()).prop_map(|(k, a, b)| Step::Remove(k, a, b)),
        (any::<usize>(), "[a-z ]{1,4}").prop_map(|(at, s)| Step::Insert(at, s)),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Step::Delete(a, b)),
    ]
}

proptest! {
    #[test]
    fn edits_always_serialize_well_formed(
        plain in "[a-z ]{0,32}",
        steps in prop::collection::vec(step(), 0..32),
    ) {
        let mut text = MarkupText::new(plain);
        for step in steps {
            step.run(&mut text);
            let html = to_html(&text).unwrap();
            assert_eq!(assert_well_formed(&html), text.plain_text());
        }
    }
}
