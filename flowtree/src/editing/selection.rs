// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use crate::editing::{Cursor, Fragment};
use crate::tree::{Document, NodeId};

/// The span between two cursors, in document order.
///
/// An interval never leaves the cell or frame its start lies in; the end is pulled back to
/// the last location inside it.
#[derive(Copy, Clone, Debug)]
pub struct Interval {
    start: Cursor,
    end: Cursor,
}

impl Interval {
    /// The interval between `a` and `b`, whichever comes first.
    pub fn new(doc: &Document, a: Cursor, b: Cursor) -> Self {
        let (mut start, end) = if b.precedes(&a) { (b, a) } else { (a, b) };
        start.normalize(doc);
        let iso = doc.isolating_ancestor(start.object());
        let mut clipped = start;
        while clipped.position() < end.position() {
            let saved = clipped;
            if !clipped.step_forward(doc, true) {
                break;
            }
            if !doc.is_ancestor(iso, clipped.object()) {
                clipped = saved;
                break;
            }
        }
        Self {
            start,
            end: clipped,
        }
    }

    /// The earlier end.
    pub fn start(&self) -> &Cursor {
        &self.start
    }

    /// The later end.
    pub fn end(&self) -> &Cursor {
        &self.end
    }

    /// Number of steps between the ends.
    pub fn len(&self) -> usize {
        self.end.position() - self.start.position()
    }

    /// Returns `true` if both ends are at the same location.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every leaf the interval touches, with the range of its offsets covered.
    pub fn leaves(&self, doc: &Document) -> Vec<(NodeId, Range<usize>)> {
        let mut out = Vec::new();
        if self.is_empty() {
            return out;
        }
        let mut leaf = self.start.object();
        loop {
            let from = if leaf == self.start.object() {
                self.start.offset()
            } else {
                0
            };
            let to = if leaf == self.end.object() {
                self.end.offset()
            } else {
                doc.length(leaf)
            };
            if from < to {
                out.push((leaf, from..to));
            }
            if leaf == self.end.object() {
                break;
            }
            match doc.next_leaf(leaf) {
                Some(next) => leaf = next,
                None => break,
            }
        }
        out
    }

    /// The selected text, paragraphs separated by newlines.
    pub fn text(&self, doc: &Document) -> String {
        Fragment::copy(doc, self).plain_text()
    }
}

impl Document {
    /// Flag exactly the leaves touched by `interval` as selected.
    pub(crate) fn set_selection(&mut self, interval: Option<&Interval>) {
        let ids: Vec<NodeId> = self.arena.ids().collect();
        for id in ids {
            self.node_mut(id).selected = false;
        }
        if let Some(interval) = interval {
            for (leaf, _) in interval.leaves(self) {
                self.node_mut(leaf).selected = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::editing::{Cursor, Interval};
    use crate::tree::{CellSpan, DocumentBuilder, Table};

    #[test]
    fn ends_are_ordered() {
        let mut b = DocumentBuilder::new();
        b.text("hello\nworld");
        let doc = b.build();
        let mut a = Cursor::document_start(&doc);
        a.jump_to_position(&doc, 8);
        let mut b = Cursor::document_start(&doc);
        b.jump_to_position(&doc, 2);
        let interval = Interval::new(&doc, a, b);
        assert_eq!(interval.start().position(), 2);
        assert_eq!(interval.len(), 6);
        assert_eq!(interval.text(&doc), "llo\nwo");
    }

    #[test]
    fn intervals_stay_in_their_cell() {
        let mut b = DocumentBuilder::new();
        b.begin_table(Table::new(1, 2));
        b.begin_cell(CellSpan::at(0, 0)).text("ab").end_cell();
        b.begin_cell(CellSpan::at(0, 1)).text("cd").end_cell();
        b.end_table();
        let doc = b.build();
        let start = Cursor::document_start(&doc);
        let end = Cursor::document_end(&doc);
        let interval = Interval::new(&doc, start, end);
        assert_eq!(interval.len(), 2);
        assert_eq!(interval.text(&doc), "ab");
    }
}
