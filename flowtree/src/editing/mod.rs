// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cursors and the editing engine.
//!
//! The structural edits in here work on "units": the leaves of the isolating container the
//! edit happens in, except that a table or frame nested below it counts as a single unit.
//! Deleting, copying and pasting never reach into such a unit; they take it or leave it whole.

mod clipboard;
mod cursor;
mod delete;
mod engine;
mod insert;
mod observer;
mod options;
mod paste;
mod selection;

pub use clipboard::Fragment;
pub use cursor::Cursor;
pub use engine::{Engine, FreezeGuard};
pub use observer::{EditKind, EditObserver};
pub use options::EngineOptions;
pub use selection::Interval;

use crate::tree::{Document, NodeId, NodeType};

/// The unit of `iso` holding `leaf`: its outermost table or frame below `iso`, or the leaf.
pub(crate) fn unit_of(doc: &Document, iso: NodeId, leaf: NodeId) -> NodeId {
    let mut unit = leaf;
    for ancestor in doc.ancestors(leaf) {
        if ancestor == iso {
            break;
        }
        if matches!(doc.node_type(ancestor), NodeType::Table | NodeType::Frame) {
            unit = ancestor;
        }
    }
    unit
}

/// The unit following `unit` inside `iso`.
pub(crate) fn next_unit(doc: &Document, iso: NodeId, unit: NodeId) -> Option<NodeId> {
    doc.next_leaf(unit)
        .filter(|&leaf| doc.is_ancestor(iso, leaf))
        .map(|leaf| unit_of(doc, iso, leaf))
}

/// The unit preceding `unit` inside `iso`.
pub(crate) fn prev_unit(doc: &Document, iso: NodeId, unit: NodeId) -> Option<NodeId> {
    doc.prev_leaf(unit)
        .filter(|&leaf| doc.is_ancestor(iso, leaf))
        .map(|leaf| unit_of(doc, iso, leaf))
}
