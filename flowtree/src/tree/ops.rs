// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural operations: splitting, merging, placeholders, tables and subtree copies.

use alloc::vec::Vec;
use core::ops::Range;

use hashbrown::HashMap;

use crate::style::{FlowStyle, StyleAttr, TextStyle};
use crate::tree::{Cell, CellSpan, Document, NodeId, NodeKind, NodeType, Relocation, Table};

impl Document {
    /// Style of the text at or next to `id`, for placeholders created near it.
    pub(crate) fn text_style_near(&self, id: NodeId) -> TextStyle {
        let candidates = [Some(id), self.prev_leaf(id), self.next_leaf(id)];
        candidates
            .into_iter()
            .flatten()
            .find_map(|id| self.text(id).map(|run| run.style().clone()))
            .unwrap_or_default()
    }

    // --- MARK: Placeholders ---

    /// Give the childless container `id` the minimal content that keeps it well-formed:
    /// a zero-length run for a flow, an empty paragraph for any other container.
    ///
    /// Returns the new leaf, if one was added.
    pub(crate) fn ensure_placeholder(&mut self, id: NodeId, style: &TextStyle) -> Option<NodeId> {
        if self.head(id).is_some() {
            return None;
        }
        let target = match self.node_type(id) {
            NodeType::Flow => id,
            NodeType::Table => return None,
            _ => {
                let flow = self.new_flow(FlowStyle::default());
                self.append_child(id, flow);
                flow
            }
        };
        let placeholder = self.new_text("", style.clone());
        self.append_child(target, placeholder);
        Some(placeholder)
    }

    /// Remove zero-length runs of `flow` that sit next to another leaf.
    pub(crate) fn drop_redundant_placeholders(&mut self, flow: NodeId) {
        let children: Vec<NodeId> = self.children(flow).collect();
        for id in children {
            if !self.text(id).is_some_and(|run| run.is_empty()) {
                continue;
            }
            let prev = self.prev(id).filter(|&p| !self.is_container(p));
            let next = self.next(id).filter(|&n| !self.is_container(n));
            let replacement = match (prev, next) {
                (Some(p), _) => (p, self.length(p)),
                (None, Some(n)) => (n, 0),
                (None, None) => continue,
            };
            self.destroy_with(id, Some(replacement));
        }
    }

    /// Remove the attached node `id` and its subtree.
    ///
    /// If `id` is the only child of a flow, a zero-length run takes its place and references
    /// to removed leaves are redirected to it. Otherwise they are redirected to the nearest
    /// surviving leaf.
    ///
    /// Returns the location references were redirected to.
    pub(crate) fn remove_subtree(&mut self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id).expect("only attached nodes are removed");
        let only_child = self.head(parent) == Some(id) && self.tail(parent) == Some(id);
        let replacement = if only_child && self.node_type(parent) == NodeType::Flow {
            let style = self.text_style_near(id);
            let placeholder = self.new_text("", style);
            self.insert_before(id, placeholder);
            Some((placeholder, 0))
        } else {
            match (self.prev_leaf(id), self.next_leaf(id)) {
                (Some(p), _) => Some((p, self.length(p))),
                (None, Some(n)) => Some((n, 0)),
                (None, None) => None,
            }
        };
        self.destroy_with(id, replacement);
        replacement
    }

    // --- MARK: Split ---

    /// Split the text node `id` at character `at`.
    ///
    /// The left part keeps the id; the right part is a new node inserted after it.
    pub fn split_text(&mut self, id: NodeId, at: usize) -> NodeId {
        let ty = self.node_type(id);
        let right = match &mut self.node_mut(id).kind {
            NodeKind::Text(run) => run.split_off(at),
            _ => panic!("split_text called on a {ty:?}"),
        };
        let right = self.new_node(NodeKind::Text(right));
        self.insert_after(id, right);
        self.mark_dirty(id);
        self.record(Relocation::Split {
            from: id,
            at,
            into: right,
        });
        right
    }

    /// Split the ancestors of the cursor location `(leaf, offset)`, `levels` deep.
    ///
    /// At each level the container is duplicated and everything after the split point moves
    /// into the copy, which is inserted right after the original. A split of a cell creates a
    /// new cell next to it in the grid. Splitting stops at tables and at the root.
    ///
    /// Returns the original and the copy at the outermost level split.
    pub fn split(&mut self, leaf: NodeId, offset: usize, levels: usize) -> Option<(NodeId, NodeId)> {
        let mut container = self.parent(leaf)?;
        let style = self.text_style_near(leaf);
        let len = self.length(leaf);
        let mut moving = if offset == 0 {
            Some(leaf)
        } else if offset >= len {
            self.next(leaf)
        } else {
            Some(self.split_text(leaf, offset))
        };
        let mut outermost = None;
        for _ in 0..levels {
            if container == self.root() || self.node_type(container) == NodeType::Table {
                log::debug!("split stops at {:?}", self.node_type(container));
                break;
            }
            let right = self.split_container(container, moving, &style);
            outermost = Some((container, right));
            moving = Some(right);
            match self.parent(container) {
                Some(parent) => container = parent,
                None => break,
            }
        }
        if let Some((left, right)) = outermost {
            log::debug!("split {left:?} into {right:?} at {offset} of {leaf:?}");
        }
        outermost
    }

    /// Duplicate `container` and move `first` with every following sibling into the copy.
    pub(crate) fn split_container(
        &mut self,
        container: NodeId,
        first: Option<NodeId>,
        style: &TextStyle,
    ) -> NodeId {
        let right = self.new_node(self.kind(container).duplicate());
        if self.node_type(container) == NodeType::Cell {
            self.place_split_cell(container, right);
        } else {
            self.insert_after(container, right);
        }
        if let Some(first) = first {
            self.move_tail(first, right);
        }
        self.ensure_placeholder(container, style);
        self.ensure_placeholder(right, style);
        right
    }

    fn cell_span(&self, cell: NodeId) -> CellSpan {
        self.kind(cell)
            .as_cell()
            .map(|c| c.span)
            .expect("node is a cell")
    }

    fn set_cell_span(&mut self, cell: NodeId, span: CellSpan) {
        if let NodeKind::Cell(c) = &mut self.node_mut(cell).kind {
            c.span = span;
        }
    }

    fn table_mut(&mut self, table: NodeId) -> &mut Table {
        match &mut self.node_mut(table).kind {
            NodeKind::Table(t) => t,
            _ => panic!("{table:?} is not a table"),
        }
    }

    /// Give the new cell `right` a column of its own right after `cell`.
    ///
    /// The new cell spans the same rows as `cell`. In every other row, the cell left of the
    /// new column widens to cover it, so the grid stays filled.
    fn place_split_cell(&mut self, cell: NodeId, right: NodeId) {
        let table = self.parent(cell).expect("cells live in tables");
        let span = self.cell_span(cell);
        let at = span.col + span.cspan;
        self.table_mut(table).insert_column(at);
        let cells: Vec<NodeId> = self.children(table).collect();
        for &other in &cells {
            let mut s = self.cell_span(other);
            if s.col >= at {
                s.col += 1;
                self.set_cell_span(other, s);
            }
        }
        let right_span = CellSpan {
            row: span.row,
            col: at,
            rspan: span.rspan,
            cspan: 1,
        };
        self.set_cell_span(right, right_span);
        self.table_mut(table).place(right, right_span);
        let rows = self.kind(table).as_table().map_or(0, Table::rows);
        let mut widened: Vec<NodeId> = Vec::new();
        for row in (0..rows).filter(|r| !(span.row..span.row + span.rspan).contains(r)) {
            let Some(left) = self.kind(table).as_table().and_then(|t| t.cell_at(row, at - 1))
            else {
                continue;
            };
            if !widened.contains(&left) {
                widened.push(left);
                let mut s = self.cell_span(left);
                s.cspan += 1;
                self.set_cell_span(left, s);
                self.table_mut(table).place(left, s);
            }
        }
        self.append_child(table, right);
        self.relink_table(table);
    }

    // --- MARK: Merge ---

    /// Merge the adjacent siblings `left` and `right` into `left`.
    ///
    /// Text runs merge when their styles agree. Flows, and block clues of equal kind, merge by
    /// adopting the children of `right`, after which the children meeting at the seam are
    /// merged in turn. Returns `false` when the pair cannot merge.
    pub fn merge(&mut self, left: NodeId, right: NodeId) -> bool {
        if self.next(left) != Some(right) {
            return false;
        }
        let mergeable = match (self.kind(left), self.kind(right)) {
            (NodeKind::Text(a), NodeKind::Text(b)) => a.can_merge(b),
            (NodeKind::Flow(_), NodeKind::Flow(_)) => true,
            (NodeKind::Clue(a), NodeKind::Clue(b)) => a == b,
            _ => false,
        };
        if !mergeable {
            return false;
        }
        if self.node_type(left) == NodeType::Text {
            self.merge_text(left, right);
        } else {
            let seam_left = self.tail(left);
            let seam_right = self.head(right);
            self.move_children(right, left);
            self.destroy(right);
            if let (Some(a), Some(b)) = (seam_left, seam_right) {
                self.merge(a, b);
            }
            if self.node_type(left) == NodeType::Flow {
                self.drop_redundant_placeholders(left);
            }
            log::debug!("merged {right:?} into {left:?}");
        }
        true
    }

    fn merge_text(&mut self, left: NodeId, right: NodeId) {
        let shift = self.length(left);
        self.detach(right);
        let node = self.arena.remove(right);
        let NodeKind::Text(run) = node.kind else {
            unreachable!("checked by merge");
        };
        if let NodeKind::Text(own) = &mut self.node_mut(left).kind {
            own.append(run);
        }
        self.mark_dirty(left);
        self.record(Relocation::Merged {
            from: right,
            into: left,
            shift,
        });
    }

    // --- MARK: Text content ---

    /// Insert `s` into the text node `id` before character `at`.
    pub fn insert_text_at(&mut self, id: NodeId, at: usize, s: &str) {
        let len = s.chars().count();
        if let Some(run) = self.text_mut(id) {
            run.insert(at, s);
            self.record(Relocation::Inserted { node: id, at, len });
        }
    }

    /// Remove characters `range` from the text node `id`.
    pub fn remove_text(&mut self, id: NodeId, range: Range<usize>) {
        if let Some(run) = self.text_mut(id) {
            run.remove(range.clone());
            self.record(Relocation::Deleted {
                node: id,
                start: range.start,
                end: range.end,
            });
        }
    }

    /// Apply `attr` over characters `range` of the text node `id`.
    pub fn apply_attribute(
        &mut self,
        id: NodeId,
        range: Range<usize>,
        attr: StyleAttr,
    ) -> Result<(), run_spans::Error> {
        match self.text_mut(id) {
            Some(run) => run.apply_attribute(range, attr),
            None => Ok(()),
        }
    }

    // --- MARK: Tables ---

    /// Allocate a detached table of `rows` by `cols` cells, each holding an empty paragraph.
    pub fn new_table(&mut self, rows: usize, cols: usize, style: &TextStyle) -> NodeId {
        let table = self.new_node(NodeKind::Table(Table::new(rows, cols)));
        self.fill_table(table, style);
        table
    }

    /// Add an empty cell to `table` at `cell.span`.
    ///
    /// Panics if a covered slot is already occupied.
    pub fn add_cell(&mut self, table: NodeId, cell: Cell) -> NodeId {
        let span = cell.span;
        let id = self.new_node(NodeKind::Cell(cell));
        self.table_mut(table).place(id, span);
        self.append_child(table, id);
        self.relink_table(table);
        id
    }

    /// Fill every unoccupied slot of `table` with a cell, and every empty cell with a
    /// paragraph.
    pub(crate) fn fill_table(&mut self, table: NodeId, style: &TextStyle) {
        let (rows, cols) = self
            .kind(table)
            .as_table()
            .map_or((0, 0), |t| (t.rows(), t.cols()));
        for row in 0..rows {
            for col in 0..cols {
                let free = self
                    .kind(table)
                    .as_table()
                    .is_some_and(|t| t.cell_at(row, col).is_none());
                if free {
                    self.add_cell(
                        table,
                        Cell {
                            span: CellSpan::at(row, col),
                            heading: false,
                            dir: crate::style::Direction::Inherit,
                        },
                    );
                }
            }
        }
        let cells: Vec<NodeId> = self.children(table).collect();
        for cell in cells {
            self.ensure_placeholder(cell, style);
        }
    }

    /// Order the children of `table` like its grid, row-major by anchor slot.
    pub(crate) fn relink_table(&mut self, table: NodeId) {
        let order = self.kind(table).as_table().map(Table::cells).unwrap_or_default();
        for cell in order {
            if self.parent(cell) == Some(table) {
                self.detach(cell);
                self.append_child(table, cell);
            }
        }
    }

    // --- MARK: Copies ---

    /// Copy the subtree of `id` into `dest`, returning the detached copy.
    pub fn copy_subtree_into(&self, id: NodeId, dest: &mut Self) -> NodeId {
        let mut map = HashMap::new();
        self.copy_rec(id, dest, &mut map)
    }

    fn copy_rec(&self, id: NodeId, dest: &mut Self, map: &mut HashMap<NodeId, NodeId>) -> NodeId {
        let copy = dest.new_node(self.kind(id).duplicate());
        map.insert(id, copy);
        for child in self.children(id) {
            let child_copy = self.copy_rec(child, dest, map);
            dest.append_child(copy, child_copy);
        }
        if let NodeKind::Table(table) = self.kind(id) {
            let mut grid = table.clone();
            grid.remap(|cell| map.get(&cell).copied());
            *dest.table_mut(copy) = grid;
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use crate::style::{FontFlags, TextStyle};
    use crate::tree::{CellSpan, Document, DocumentBuilder, NodeType, Relocation, Table};

    fn bold() -> TextStyle {
        TextStyle {
            flags: FontFlags::BOLD,
            ..TextStyle::default()
        }
    }

    #[test]
    fn split_text_journals_the_move() {
        let mut b = DocumentBuilder::new();
        b.text("hello");
        let mut doc = b.build();
        let leaf = doc.first_leaf(doc.root()).unwrap();
        let right = doc.split_text(leaf, 2);
        assert_eq!(doc.text(leaf).unwrap().text(), "he");
        assert_eq!(doc.text(right).unwrap().text(), "llo");
        assert_eq!(
            doc.journal(),
            [Relocation::Split {
                from: leaf,
                at: 2,
                into: right
            }]
        );
    }

    #[test]
    fn paragraph_split_and_merge_restore_text() {
        let mut b = DocumentBuilder::new();
        b.text("hello world");
        let mut doc = b.build();
        let leaf = doc.first_leaf(doc.root()).unwrap();
        let (left, right) = doc.split(leaf, 5, 1).unwrap();
        assert_eq!(doc.plain_text(), "hello\n world");
        assert!(doc.check_invariants().is_ok());
        assert!(doc.merge(left, right));
        assert_eq!(doc.plain_text(), "hello world");
        assert_eq!(doc.leaves(doc.root()).len(), 1);
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn split_at_end_leaves_placeholder() {
        let mut b = DocumentBuilder::new();
        b.text("abc");
        let mut doc = b.build();
        let leaf = doc.first_leaf(doc.root()).unwrap();
        let (_, right) = doc.split(leaf, 3, 1).unwrap();
        let placeholder = doc.head(right).unwrap();
        assert_eq!(doc.length(placeholder), 0);
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn runs_of_different_style_do_not_merge() {
        let mut b = DocumentBuilder::new();
        b.text("ab").text_styled("cd", bold());
        let mut doc = b.build();
        let leaves = doc.leaves(doc.root());
        assert!(!doc.merge(leaves[0], leaves[1]));
        assert_eq!(doc.leaves(doc.root()).len(), 2);
    }

    #[test]
    fn merging_flows_drops_seam_placeholder() {
        let mut b = DocumentBuilder::new();
        b.text("ab").paragraph_break().paragraph_break().text_styled("cd", bold());
        let mut doc = b.build();
        let flows = doc.flows();
        assert_eq!(flows.len(), 3);
        assert!(doc.merge(flows[1], flows[2]));
        let leaves = doc.leaves(flows[1]);
        assert_eq!(leaves.len(), 1);
        assert_eq!(doc.text(leaves[0]).unwrap().text(), "cd");
    }

    #[test]
    fn cell_split_keeps_grid_filled() {
        let mut b = DocumentBuilder::new();
        b.begin_table(Table::default());
        b.begin_cell(CellSpan::at(0, 0)).text("hello world").end_cell();
        b.begin_cell(CellSpan::at(0, 1)).text("x").end_cell();
        b.begin_cell(CellSpan::at(1, 0)).text("y").end_cell();
        b.begin_cell(CellSpan::at(1, 1)).text("z").end_cell();
        b.end_table();
        let mut doc = b.build();
        let leaf = doc.first_leaf(doc.root()).unwrap();
        let cell = doc.enclosing(leaf, NodeType::Cell).unwrap();
        let (left, right) = doc.split(leaf, 5, 2).unwrap();
        assert_eq!(left, cell);
        assert_eq!(doc.node_type(right), NodeType::Cell);
        assert_eq!(doc.next(cell), Some(right));
        let table = doc.parent(cell).unwrap();
        let grid = doc.kind(table).as_table().unwrap();
        assert_eq!((grid.rows(), grid.cols()), (2, 3));
        assert!(grid.is_filled());
        // The cell below the split one widened over the new column.
        let below = grid.cell_at(1, 0).unwrap();
        assert_eq!(grid.cell_at(1, 1), Some(below));
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn subtree_copies_remap_grids() {
        let mut doc = Document::new();
        let table = doc.new_table(2, 2, &TextStyle::default());
        let mut other = Document::new_empty();
        let copy = doc.copy_subtree_into(table, &mut other);
        let grid = other.kind(copy).as_table().unwrap();
        assert!(grid.is_filled());
        for cell in grid.cells() {
            assert_eq!(other.parent(cell), Some(copy));
        }
    }
}
