// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Regression tests for specific bugs.

use crate::test_name;
use crate::util::{assert_consistent, caret_text};
use flowtree::style::{Alignment, FlowStyle};
use flowtree::tree::DocumentBuilder;
use flowtree::{Engine, EngineOptions};
use flowtree_dev::paragraphs;

/// Pasting a single run into the middle of a run merged the pasted copy into the left half,
/// then tried to merge the freed copy with the right half.
#[test]
fn paste_merges_both_seams_of_a_split_run() {
    let mut engine = Engine::new(paragraphs("abcd"), EngineOptions::default());
    engine.jump_to_position(2);
    assert!(engine.paste_text("XY"));
    assert_eq!(caret_text(&engine), "abXY|cd");
    let doc = engine.document();
    assert_eq!(doc.leaves(doc.root()).len(), 1);
    assert_consistent(&engine, test_name!());
}

/// Deleting across a paragraph boundary kept the style of the second paragraph.
#[test]
fn joined_paragraphs_keep_the_first_style() {
    let mut builder = DocumentBuilder::new();
    builder.set_flow_style(FlowStyle {
        alignment: Alignment::Center,
        ..FlowStyle::default()
    });
    builder.text("ab\n");
    builder.set_flow_style(FlowStyle::default());
    builder.text("cd");
    let mut engine = Engine::new(builder.build(), EngineOptions::default());
    engine.jump_to_position(2);
    assert!(engine.delete(1));
    let doc = engine.document();
    assert_eq!(doc.plain_text(), "abcd");
    let flow = doc.flows()[0];
    assert_eq!(doc.flow_style(flow).unwrap().alignment, Alignment::Center);
}

/// Breaking a paragraph right at its start left the cursor in the new empty paragraph.
#[test]
fn breaking_at_the_start_moves_the_text_down() {
    let mut engine = Engine::new(paragraphs("ab"), EngineOptions::default());
    assert!(engine.insert_paragraph());
    assert_eq!(caret_text(&engine), "\n|ab");
    assert_consistent(&engine, test_name!());
}
