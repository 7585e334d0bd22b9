// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use crate::editing::{EditKind, Engine, Fragment};
use crate::tree::{Document, NodeId};

type Location = (NodeId, usize);

impl Document {
    /// Detached copies of the children of the paragraph `flow` of `src`, without placeholders.
    fn copy_paragraph(&mut self, src: &Self, flow: NodeId) -> Vec<NodeId> {
        src.children(flow)
            .filter(|&child| !src.text(child).is_some_and(|run| run.is_empty()))
            .map(|child| src.copy_subtree_into(child, self))
            .collect()
    }

    /// The location right after the pasted node `last`. A container at the end of its
    /// paragraph gets a placeholder after it to hold that location.
    fn location_after(&mut self, last: NodeId) -> Location {
        if !self.is_container(last) {
            return (last, self.length(last));
        }
        if let Some(next) = self.next(last).filter(|&n| !self.is_container(n)) {
            return (next, 0);
        }
        let style = self.text_style_near(last);
        let placeholder = self.new_text("", style);
        self.insert_after(last, placeholder);
        (placeholder, 0)
    }

    fn merge_leaves(&mut self, left: Option<NodeId>, right: Option<NodeId>) {
        if let (Some(l), Some(r)) = (left, right) {
            if !self.is_container(l) && !self.is_container(r) {
                self.merge(l, r);
            }
        }
    }

    /// Insert the content of `src`, a fragment document, at `(object, offset)`.
    ///
    /// Returns the location right after the pasted content.
    pub(crate) fn paste_at(&mut self, object: NodeId, offset: usize, src: &Self) -> Location {
        let paragraphs: Vec<NodeId> = src.children(src.root()).collect();
        match paragraphs.as_slice() {
            [] => (object, offset),
            [only] => self.paste_inline(object, offset, src, *only),
            [first, middle @ .., last] => {
                self.paste_paragraphs(object, offset, src, *first, middle, *last)
            }
        }
    }

    fn paste_inline(&mut self, object: NodeId, offset: usize, src: &Self, flow: NodeId) -> Location {
        let copies = self.copy_paragraph(src, flow);
        let (Some(&first), Some(&last)) = (copies.first(), copies.last()) else {
            return (object, offset);
        };
        let target = self.enclosing_flow(object).expect("leaves live in flows");
        let (before, after) = if offset == 0 {
            (None, Some(object))
        } else if offset >= self.length(object) {
            (Some(object), self.next(object))
        } else {
            (Some(object), Some(self.split_text(object, offset)))
        };
        match (before, after) {
            (_, Some(after)) => {
                for &copy in &copies {
                    self.insert_before(after, copy);
                }
            }
            (Some(mut anchor), None) => {
                for &copy in &copies {
                    self.insert_after(anchor, copy);
                    anchor = copy;
                }
            }
            (None, None) => unreachable!("offset 0 always has a node after it"),
        }
        let end = self.location_after(last);
        let mark = self.journal.len();
        self.merge_leaves(before, Some(first));
        if let Some(after) = after {
            self.merge_leaves(self.prev(after), Some(after));
        }
        self.drop_redundant_placeholders(target);
        self.relocate_through(end, mark)
    }

    fn paste_paragraphs(
        &mut self,
        object: NodeId,
        offset: usize,
        src: &Self,
        first: NodeId,
        middle: &[NodeId],
        last: NodeId,
    ) -> Location {
        let (left, right) = self
            .split(object, offset, 1)
            .expect("a leaf's paragraph can always be split");
        let left_tail = self.tail(left);
        let right_head = self.head(right).expect("split paragraphs are never empty");
        let is_placeholder_only = |doc: &Self, flow: NodeId| {
            doc.head(flow) == doc.tail(flow)
                && doc
                    .head(flow)
                    .and_then(|h| doc.text(h))
                    .is_some_and(|run| run.is_empty())
        };
        let left_bare = is_placeholder_only(self, left);
        let right_bare = is_placeholder_only(self, right);

        let head_copies = self.copy_paragraph(src, first);
        for &copy in &head_copies {
            self.append_child(left, copy);
        }
        if left_bare {
            if let Some(style) = src.flow_style(first).cloned() {
                self.set_flow_style(left, style);
            }
        }

        let mut flows = alloc::vec![left];
        for &paragraph in middle {
            let style = src.flow_style(paragraph).cloned().unwrap_or_default();
            let flow = self.new_flow(style);
            self.insert_before(right, flow);
            for copy in self.copy_paragraph(src, paragraph) {
                self.append_child(flow, copy);
            }
            let near = self.text_style_near(right_head);
            self.ensure_placeholder(flow, &near);
            flows.push(flow);
        }
        flows.push(right);

        let tail_copies = self.copy_paragraph(src, last);
        for &copy in &tail_copies {
            self.insert_before(right_head, copy);
        }
        if right_bare {
            if let Some(style) = src.flow_style(last).cloned() {
                self.set_flow_style(right, style);
            }
        }
        let end = match tail_copies.last() {
            Some(&copy) => self.location_after(copy),
            None => {
                let leaf = self
                    .first_leaf(right)
                    .expect("split paragraphs are never empty");
                (leaf, 0)
            }
        };

        let mark = self.journal.len();
        self.merge_leaves(left_tail, head_copies.first().copied());
        self.merge_leaves(self.prev(right_head), Some(right_head));
        for flow in flows {
            if self.contains(flow) {
                self.drop_redundant_placeholders(flow);
            }
        }
        log::debug!(
            "pasted {} paragraphs at {object:?}:{offset}",
            middle.len() + 2
        );
        self.relocate_through(end, mark)
    }

    fn relocate_through(&self, (mut object, mut offset): Location, from: usize) -> Location {
        for change in &self.journal[from..] {
            (object, offset) = change.apply(object, offset);
        }
        (object, offset)
    }
}

impl Engine {
    /// Paste the clipboard at the cursor. Returns `false` if the clipboard is empty.
    pub fn paste(&mut self) -> bool {
        let Some(fragment) = self.clipboard.take() else {
            return false;
        };
        let pasted = self.paste_fragment(&fragment);
        self.clipboard = Some(fragment);
        pasted
    }

    /// Paste plain text at the cursor, one paragraph per line, in the insertion style.
    pub fn paste_text(&mut self, text: &str) -> bool {
        let fragment = Fragment::from_text(text, self.insertion_style());
        self.paste_fragment(&fragment)
    }

    /// Paste `fragment` at the cursor, replacing the selection. The cursor ends up after the
    /// pasted content.
    pub fn paste_fragment(&mut self, fragment: &Fragment) -> bool {
        if fragment.is_empty() {
            return false;
        }
        let mut guard = self.freeze();
        let engine = &mut *guard;
        engine.delete_selection();
        engine.begin_edit(EditKind::Paste);
        engine.cursor.normalize(&engine.doc);
        let anchor = engine.anchor_before();
        let (object, offset) = engine.cursor.location();
        let (end, end_offset) = engine.doc.paste_at(object, offset, fragment.document());
        engine.reposition(anchor, end, end_offset);
        engine.finish_edit(EditKind::Paste);
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::editing::{Engine, EngineOptions, Fragment};
    use crate::style::{FontFlags, TextStyle};
    use crate::tree::{CellSpan, DocumentBuilder, NodeType, Table};

    fn engine(text: &str) -> Engine {
        let mut b = DocumentBuilder::new();
        b.text(text);
        Engine::new(b.build(), EngineOptions::default())
    }

    #[test]
    fn inline_paste_merges_both_seams() {
        let mut engine = engine("ad");
        engine.jump_to_position(1);
        assert!(engine.paste_text("bc"));
        let doc = engine.document();
        assert_eq!(doc.plain_text(), "abcd");
        assert_eq!(doc.leaves(doc.root()).len(), 1);
        assert_eq!(engine.cursor().position(), 3);
    }

    #[test]
    fn multi_paragraph_paste() {
        let mut engine = engine("ad");
        engine.jump_to_position(1);
        assert!(engine.paste_text("b\nmid\nc"));
        let doc = engine.document();
        assert_eq!(doc.plain_text(), "ab\nmid\ncd");
        assert_eq!(doc.flows().len(), 3);
        assert_eq!(engine.cursor().position(), 8);
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn pasting_a_trailing_newline() {
        let mut engine = engine("ab");
        engine.cursor_to_document_end();
        assert!(engine.paste_text("x\n"));
        let doc = engine.document();
        assert_eq!(doc.plain_text(), "abx\n");
        assert_eq!(engine.cursor().position(), 4);
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn styled_fragments_keep_their_runs() {
        let bold = TextStyle {
            flags: FontFlags::BOLD,
            ..TextStyle::default()
        };
        let mut engine = engine("ac");
        engine.jump_to_position(1);
        assert!(engine.paste_fragment(&Fragment::from_text("b", bold.clone())));
        let doc = engine.document();
        let leaves = doc.leaves(doc.root());
        assert_eq!(leaves.len(), 3);
        assert_eq!(doc.text(leaves[1]).unwrap().style(), &bold);
        assert_eq!(engine.cursor().location(), (leaves[1], 1));
    }

    #[test]
    fn copy_then_paste_duplicates_tables() {
        let mut b = DocumentBuilder::new();
        b.text("x\n");
        b.begin_table(Table::new(1, 1));
        b.begin_cell(CellSpan::at(0, 0)).text("in").end_cell();
        b.end_table();
        b.text("y");
        let mut engine = Engine::new(b.build(), EngineOptions::default());
        engine.set_mark();
        engine.cursor_to_document_end();
        assert!(engine.copy());
        engine.clear_mark();
        assert!(engine.paste());
        let doc = engine.document();
        let tables = doc
            .descendants(doc.root())
            .into_iter()
            .filter(|&id| doc.node_type(id) == NodeType::Table)
            .count();
        assert_eq!(tables, 2);
        assert_eq!(doc.plain_text(), "x\n\nin\nyx\n\nin\ny");
        assert!(doc.check_invariants().is_ok());
        assert!(engine.clipboard().is_some());
    }

    #[test]
    fn empty_fragments_change_nothing() {
        let mut engine = engine("ab");
        assert!(!engine.paste());
        assert!(!engine.paste_text(""));
        assert_eq!(engine.document().plain_text(), "ab");
    }
}
