// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::editing::{EditKind, Engine};
use crate::style::TextStyle;
use crate::tree::{Document, NodeId, NodeType};

impl Document {
    /// Insert `s` in `style` at the cursor location `(object, offset)`, returning the location
    /// right after the inserted text.
    ///
    /// Text goes into the run at the location when the styles agree, and into a new run
    /// otherwise; a new run is merged with its neighbours where possible. An empty run adopts
    /// the style of whatever is typed into it.
    pub(crate) fn insert_styled(
        &mut self,
        object: NodeId,
        offset: usize,
        s: &str,
        style: &TextStyle,
    ) -> (NodeId, usize) {
        let len = s.chars().count();
        if let Some(run) = self.text_mut(object) {
            if run.is_empty() && run.style() != style {
                run.set_style(style.clone());
            }
            if run.style() == style {
                self.insert_text_at(object, offset, s);
                return (object, offset + len);
            }
        }
        let node = self.new_text(s, style.clone());
        if offset == 0 {
            self.insert_before(object, node);
        } else if offset >= self.length(object) {
            self.insert_after(object, node);
        } else {
            let right = self.split_text(object, offset);
            self.insert_before(right, node);
        }
        let mut end = (node, len);
        if let Some(next) = self.next(node).filter(|&n| self.node_type(n) == NodeType::Text) {
            self.merge(node, next);
        }
        if let Some(prev) = self.prev(node).filter(|&p| self.node_type(p) == NodeType::Text) {
            let shift = self.length(prev);
            if self.merge(prev, node) {
                end = (prev, shift + len);
            }
        }
        end
    }
}

impl Engine {
    /// Type `text` at the cursor. Newlines start new paragraphs.
    ///
    /// The text gets the insertion style if one is set, and the style at the cursor
    /// otherwise. A selection is replaced.
    pub fn insert_text(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let mut engine = self.freeze();
        engine.delete_selection();
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                engine.insert_paragraph();
            }
            if !line.is_empty() {
                engine.insert_line(line);
            }
        }
        true
    }

    fn insert_line(&mut self, line: &str) {
        self.begin_edit(EditKind::Insert);
        self.cursor.normalize(&self.doc);
        let style = self.insertion_style();
        let (object, offset) = self.cursor.location();
        let (end, end_offset) = self.doc.insert_styled(object, offset, line, &style);
        let position = self.cursor.position() + line.chars().count();
        self.cursor.set(end, end_offset, position);
        self.finish_edit(EditKind::Insert);
    }

    /// Break the paragraph at the cursor. The cursor moves to the start of the new paragraph.
    pub fn insert_paragraph(&mut self) -> bool {
        self.split_at_cursor(1)
    }

    /// Split the containers around the cursor, `levels` deep: the paragraph, then the block
    /// or cell holding it, and so on. Splitting never goes past a table or the root.
    ///
    /// The cursor moves to the start of the right part.
    pub fn split_at_cursor(&mut self, levels: usize) -> bool {
        if levels == 0 {
            return false;
        }
        let kind = EditKind::Split { levels };
        self.begin_edit(kind);
        self.cursor.normalize(&self.doc);
        let anchor = self.anchor_before();
        let (object, offset) = self.cursor.location();
        let split = self.doc.split(object, offset, levels);
        if let Some((_, right)) = split {
            let first = self
                .doc
                .first_leaf(right)
                .expect("split containers are never empty");
            self.reposition(anchor, first, 0);
        }
        self.finish_edit(kind);
        split.is_some()
    }

    /// Merge the paragraph holding the cursor with the paragraph right after it.
    ///
    /// Returns `false` if the next sibling is not a paragraph.
    pub fn merge_down(&mut self) -> bool {
        let Some(flow) = self.doc.enclosing_flow(self.cursor.object()) else {
            return false;
        };
        let Some(next) = self
            .doc
            .next(flow)
            .filter(|&n| self.doc.node_type(n) == NodeType::Flow)
        else {
            return false;
        };
        self.begin_edit(EditKind::MergeDown);
        let merged = self.doc.merge(flow, next);
        let position = self.cursor.position();
        self.cursor.relocate(&self.doc, self.doc.journal());
        let (object, offset) = self.cursor.location();
        self.cursor.set(object, offset, position);
        self.finish_edit(EditKind::MergeDown);
        merged
    }
}

#[cfg(test)]
mod tests {
    use crate::editing::{Engine, EngineOptions};
    use crate::style::{FontFlags, TextStyle};
    use crate::tree::{CellSpan, Document, DocumentBuilder, NodeType, Table};

    fn engine(text: &str) -> Engine {
        let mut b = DocumentBuilder::new();
        b.text(text);
        Engine::new(b.build(), EngineOptions::default())
    }

    fn bold() -> TextStyle {
        TextStyle {
            flags: FontFlags::BOLD,
            ..TextStyle::default()
        }
    }

    #[test]
    fn typing_into_an_empty_document() {
        let mut engine = Engine::new(Document::new(), EngineOptions::default());
        assert!(engine.insert_text("Hello world"));
        let doc = engine.document();
        assert_eq!(doc.plain_text(), "Hello world");
        assert_eq!(doc.leaves(doc.root()).len(), 1);
        assert_eq!(engine.cursor().position(), 11);
    }

    #[test]
    fn newlines_open_paragraphs() {
        let mut engine = engine("ad");
        engine.jump_to_position(1);
        engine.insert_text("b\nc");
        let doc = engine.document();
        assert_eq!(doc.plain_text(), "ab\ncd");
        assert_eq!(doc.flows().len(), 2);
        assert_eq!(engine.cursor().position(), 4);
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn other_styles_get_their_own_run() {
        let mut engine = engine("ac");
        engine.jump_to_position(1);
        engine.set_insertion_style(bold());
        engine.insert_text("b");
        let doc = engine.document();
        let leaves = doc.leaves(doc.root());
        assert_eq!(leaves.len(), 3);
        assert_eq!(doc.text(leaves[1]).unwrap().style(), &bold());
        assert_eq!(engine.cursor().location(), (leaves[1], 1));
        // Typing on continues the bold run.
        engine.insert_text("b");
        assert_eq!(engine.document().plain_text(), "abbc");
        assert_eq!(engine.document().leaves(engine.document().root()).len(), 3);
    }

    #[test]
    fn breaking_at_the_start_keeps_the_cursor_on_the_text() {
        let mut engine = engine("ab");
        assert!(engine.insert_paragraph());
        let doc = engine.document();
        assert_eq!(doc.plain_text(), "\nab");
        assert_eq!(engine.cursor().position(), 1);
        let first = doc.first_leaf(doc.flows()[1]).unwrap();
        assert_eq!(engine.cursor().location(), (first, 0));
    }

    #[test]
    fn splitting_a_cell_adds_a_column() {
        let mut b = DocumentBuilder::new();
        b.begin_table(Table::new(2, 1));
        b.begin_cell(CellSpan::at(0, 0)).text("ab").end_cell();
        b.begin_cell(CellSpan::at(1, 0)).text("cd").end_cell();
        b.end_table();
        let mut engine = Engine::new(b.build(), EngineOptions::default());
        engine.jump_to_position(1);
        assert!(engine.split_at_cursor(2));
        let doc = engine.document();
        let table = doc
            .descendants(doc.root())
            .into_iter()
            .find(|&id| doc.node_type(id) == NodeType::Table)
            .unwrap();
        let grid = doc.kind(table).as_table().unwrap();
        assert_eq!((grid.rows(), grid.cols()), (2, 2));
        assert!(doc.check_invariants().is_ok());
        assert_eq!(doc.text(engine.cursor().object()).unwrap().text(), "b");
    }

    #[test]
    fn merge_down_joins_paragraphs() {
        let mut engine = engine("ab\ncd");
        assert!(engine.merge_down());
        assert_eq!(engine.document().plain_text(), "abcd");
        assert!(!engine.merge_down());
    }
}
