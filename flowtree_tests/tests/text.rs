// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Styles, links and spell-check marks as text is edited.

use crate::util::samples::{DICTIONARY, MISSPELLED, PANGRAM};
use flowtree::style::{FontFlags, StyleAttr};
use flowtree::tree::DocumentBuilder;
use flowtree::{Engine, EngineOptions, TextRun, TextStyle};
use flowtree_dev::{WordList, paragraphs};

fn engine(text: &str) -> Engine {
    Engine::new(paragraphs(text), EngineOptions::default())
}

fn run_at_cursor(engine: &Engine) -> &TextRun {
    engine.document().text(engine.cursor().object()).unwrap()
}

fn bold() -> TextStyle {
    TextStyle {
        flags: FontFlags::BOLD,
        ..TextStyle::default()
    }
}

#[test]
fn attributes_cover_the_selection() {
    let mut engine = engine(PANGRAM);
    assert_eq!(engine.apply_attribute(StyleAttr::Bold(true)), Ok(false));
    engine.jump_to_position(4);
    engine.set_mark();
    engine.jump_to_position(9);
    assert_eq!(engine.apply_attribute(StyleAttr::Bold(true)), Ok(true));
    let run = run_at_cursor(&engine);
    assert!(run.style_at(5).flags.contains(FontFlags::BOLD));
    assert!(!run.style_at(1).flags.contains(FontFlags::BOLD));
    assert!(!run.style_at(12).flags.contains(FontFlags::BOLD));
}

#[test]
fn insertion_style_lasts_until_the_cursor_moves() {
    let mut engine = engine("ac");
    engine.jump_to_position(1);
    engine.set_insertion_style(bold());
    assert_eq!(engine.insertion_style(), bold());
    engine.insert_text("b");
    assert_eq!(run_at_cursor(&engine).style(), &bold());
    assert_eq!(engine.document().plain_text(), "abc");

    engine.backward();
    engine.backward();
    assert_eq!(engine.insertion_style(), TextStyle::default());
    engine.insert_text("!");
    assert_eq!(engine.document().plain_text(), "!abc");
    assert_eq!(run_at_cursor(&engine).style(), &TextStyle::default());
}

#[test]
fn links_grow_when_typed_into() {
    let mut builder = DocumentBuilder::new();
    builder.text("see ").link("docs", "https://example.com/docs");
    let mut engine = Engine::new(builder.build(), EngineOptions::default());
    engine.jump_to_position(6);
    engine.insert_text("o");
    let run = run_at_cursor(&engine);
    assert_eq!(run.text(), "doocs");
    let link = run.link_at(4).unwrap();
    assert_eq!(link.chars, 0..5);
    assert_eq!(&*link.url, "https://example.com/docs");
}

#[test]
fn spelling_marks_follow_edits() {
    let mut engine = engine(MISSPELLED);
    let mut words = WordList::new(DICTIONARY);
    assert_eq!(engine.check_spelling(&mut words), 2);
    assert_eq!(words.checked, 4);

    engine.insert_text("so ");
    let marks: Vec<_> = run_at_cursor(&engine).spell_errors().iter().cloned().collect();
    assert_eq!(marks, [7..11, 18..21]);

    // Deleting into a mark shortens it; a mark cut below two characters goes away.
    engine.cursor_to_document_end();
    engine.delete_backward(2);
    let marks: Vec<_> = run_at_cursor(&engine).spell_errors().iter().cloned().collect();
    assert_eq!(marks, [7..11]);
}
