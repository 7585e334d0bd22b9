// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cut, copy and paste.

use crate::test_name;
use crate::util::samples::TWO_LINES;
use crate::util::{assert_consistent, caret_text};
use flowtree::{Engine, EngineOptions, Fragment, TextStyle};
use flowtree_dev::paragraphs;

fn engine(text: &str) -> Engine {
    Engine::new(paragraphs(text), EngineOptions::default())
}

fn select(engine: &mut Engine, from: usize, to: usize) {
    engine.jump_to_position(from);
    engine.set_mark();
    engine.jump_to_position(to);
}

#[test]
fn copying_leaves_the_document_alone() {
    let mut engine = engine(TWO_LINES);
    select(&mut engine, 3, 8);
    assert!(engine.copy());
    let fragment = engine.clipboard().unwrap();
    assert_eq!(fragment.plain_text(), "lo\nwo");
    assert_eq!(fragment.paragraphs().len(), 2);
    assert_eq!(fragment.len(), 5);
    assert_eq!(engine.document().plain_text(), TWO_LINES);
    assert!(engine.mark().is_some());
}

#[test]
fn nothing_to_copy_without_a_selection() {
    let mut engine = engine(TWO_LINES);
    assert!(!engine.copy());
    assert!(!engine.cut());
    assert!(engine.clipboard().is_none());
}

#[test]
fn cut_and_paste_elsewhere() {
    let mut engine = engine(TWO_LINES);
    select(&mut engine, 0, 2);
    assert!(engine.cut());
    assert_eq!(caret_text(&engine), "|llo\nworld");
    engine.cursor_to_document_end();
    assert!(engine.paste());
    assert_eq!(caret_text(&engine), "llo\nworldhe|");
    // The clipboard survives pasting.
    assert!(engine.paste());
    assert_eq!(caret_text(&engine), "llo\nworldhehe|");
    assert_consistent(&engine, test_name!());
}

#[test]
fn pasting_text_over_everything() {
    let mut engine = engine(TWO_LINES);
    engine.select_all();
    assert!(engine.paste_text("one\ntwo"));
    assert_eq!(caret_text(&engine), "one\ntwo|");
    assert_eq!(engine.document().flows().len(), 2);
    assert_consistent(&engine, test_name!());
}

#[test]
fn fragments_move_between_engines() {
    let mut source = engine(TWO_LINES);
    source.select_all();
    assert!(source.copy());
    let mut target = engine("[]");
    target.jump_to_position(1);
    assert!(target.paste_fragment(source.clipboard().unwrap()));
    assert_eq!(caret_text(&target), "[hello\nworld|]");
    assert_consistent(&target, test_name!());
}

#[test]
fn fragments_from_text() {
    let fragment = Fragment::from_text("a\n\nb", TextStyle::default());
    assert_eq!(fragment.paragraphs().len(), 3);
    assert_eq!(fragment.plain_text(), "a\n\nb");
    assert_eq!(fragment.len(), 4);
    assert!(Fragment::from_text("", TextStyle::default()).is_empty());

    let mut engine = engine("xy");
    engine.jump_to_position(1);
    engine.set_clipboard(fragment);
    assert!(engine.paste());
    assert_eq!(caret_text(&engine), "xa\n\nb|y");
    assert_consistent(&engine, test_name!());
}
