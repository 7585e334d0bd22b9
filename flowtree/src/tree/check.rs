// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use run_spans::MIN_SPELL_ERROR_LEN;

use crate::tree::{Document, NodeId, NodeKind, NodeType};

/// A structural invariant found broken by [`Document::check_invariants`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeError {
    node: NodeId,
    problem: &'static str,
}

impl TreeError {
    fn new(node: NodeId, problem: &'static str) -> Self {
        Self { node, problem }
    }

    /// The offending node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// What is wrong with it.
    pub fn problem(&self) -> &'static str {
        self.problem
    }
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {:?}: {}", self.node, self.problem)
    }
}

impl core::error::Error for TreeError {}

fn ensure(ok: bool, node: NodeId, problem: &'static str) -> Result<(), TreeError> {
    if ok {
        Ok(())
    } else {
        Err(TreeError::new(node, problem))
    }
}

impl Document {
    /// Verify the structural invariants of the whole document.
    ///
    /// Checks link symmetry, the allowed parent of every variant, non-empty flows, filled
    /// table grids, and the bounds and ordering of every run's range lists.
    pub fn check_invariants(&self) -> Result<(), TreeError> {
        let root = self.root();
        ensure(self.parent(root).is_none(), root, "root has a parent")?;
        ensure(
            self.node_type(root) == NodeType::Clue,
            root,
            "root is not a clue",
        )?;
        for id in self.descendants(root) {
            self.check_links(id)?;
            self.check_placement(id)?;
            self.check_payload(id)?;
        }
        Ok(())
    }

    fn check_links(&self, id: NodeId) -> Result<(), TreeError> {
        let node = self.node(id);
        if !node.kind().is_container() {
            ensure(
                node.head().is_none() && node.tail().is_none(),
                id,
                "leaf has children",
            )?;
        }
        let mut prev = None;
        for child in self.children(id) {
            ensure(self.parent(child) == Some(id), child, "parent link mismatch")?;
            ensure(self.prev(child) == prev, child, "prev link mismatch")?;
            prev = Some(child);
        }
        ensure(node.tail() == prev, id, "tail link mismatch")
    }

    fn check_placement(&self, id: NodeId) -> Result<(), TreeError> {
        let Some(parent) = self.parent(id) else {
            return ensure(id == self.root(), id, "detached node reachable from root");
        };
        let parent_ty = self.node_type(parent);
        let ok = match self.node_type(id) {
            NodeType::Text
            | NodeType::Rule
            | NodeType::Image
            | NodeType::Embedded
            | NodeType::Table
            | NodeType::Frame => parent_ty == NodeType::Flow,
            NodeType::Flow | NodeType::Clue => {
                matches!(parent_ty, NodeType::Clue | NodeType::Cell | NodeType::Frame)
            }
            NodeType::Cell => parent_ty == NodeType::Table,
        };
        ensure(ok, id, "node is not allowed in its parent")
    }

    fn check_payload(&self, id: NodeId) -> Result<(), TreeError> {
        match self.kind(id) {
            NodeKind::Flow(_) => ensure(self.head(id).is_some(), id, "empty flow"),
            NodeKind::Table(table) => {
                ensure(table.is_filled(), id, "table grid has holes")?;
                for cell in table.cells() {
                    ensure(self.parent(cell) == Some(id), cell, "grid cell is not a child")?;
                    let span = self
                        .kind(cell)
                        .as_cell()
                        .map(|c| c.span)
                        .ok_or_else(|| TreeError::new(cell, "grid refers to a non-cell"))?;
                    for row in 0..table.rows() {
                        for col in 0..table.cols() {
                            let covered = table.cell_at(row, col) == Some(cell);
                            ensure(
                                covered == span.covers(row, col),
                                cell,
                                "cell span disagrees with grid",
                            )?;
                        }
                    }
                }
                let children = self.children(id).count();
                ensure(
                    children == table.cells().len(),
                    id,
                    "table has cells outside its grid",
                )
            }
            NodeKind::Text(run) => {
                let bytes = run.text().len();
                ensure(
                    run.text().chars().count() == run.len_chars(),
                    id,
                    "cached character count is wrong",
                )?;
                for (range, _) in run.attrs().iter() {
                    ensure(
                        range.start < range.end && range.end <= bytes,
                        id,
                        "attribute span out of bounds",
                    )?;
                }
                let mut last_end = 0;
                for link in run.links().iter() {
                    ensure(
                        link.chars.start >= last_end
                            && link.chars.start < link.chars.end
                            && link.bytes.end <= bytes
                            && link.chars.end <= run.len_chars(),
                        id,
                        "links overlap or exceed the run",
                    )?;
                    last_end = link.chars.end;
                }
                let mut last_end = 0;
                for mark in run.spell_errors().iter() {
                    ensure(
                        mark.start >= last_end
                            && mark.len() >= MIN_SPELL_ERROR_LEN
                            && mark.end <= run.len_chars(),
                        id,
                        "spell errors overlap, are too short or exceed the run",
                    )?;
                    last_end = mark.end;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::style::TextStyle;
    use crate::tree::{Document, NodeType};

    #[test]
    fn empty_flow_is_reported() {
        let mut doc = Document::new();
        let flow = doc.head(doc.root()).unwrap();
        let leaf = doc.head(flow).unwrap();
        doc.remove_child(flow, leaf);
        let err = doc.check_invariants().unwrap_err();
        assert_eq!(err.node(), flow);
        assert_eq!(err.problem(), "empty flow");
    }

    #[test]
    fn misplaced_leaf_is_reported() {
        let mut doc = Document::new();
        let stray = doc.new_text("x", TextStyle::default());
        doc.append_child(doc.root(), stray);
        let err = doc.check_invariants().unwrap_err();
        assert_eq!(err.node(), stray);
        assert_eq!(doc.node_type(err.node()), NodeType::Text);
    }
}
