// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traversal in document order.

use alloc::vec::Vec;

use smallvec::SmallVec;

use crate::tree::{Document, NodeId, NodeType};

/// Iterator over the children of a node.
#[derive(Clone, Debug)]
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.doc.next(id);
        Some(id)
    }
}

/// Iterator over the ancestors of a node, nearest first.
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.doc.parent(id);
        Some(id)
    }
}

pub(crate) type Chain = SmallVec<[NodeId; 8]>;

impl Document {
    /// The children of `id`, first to last.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.head(id),
        }
    }

    /// The ancestors of `id`, starting with its parent.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    /// Number of ancestors of `id`.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// Returns `true` if `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// The nearest ancestor of `id` of type `ty`.
    pub fn enclosing(&self, id: NodeId, ty: NodeType) -> Option<NodeId> {
        self.ancestors(id).find(|&a| self.node_type(a) == ty)
    }

    /// The paragraph holding `id`.
    pub fn enclosing_flow(&self, id: NodeId) -> Option<NodeId> {
        self.enclosing(id, NodeType::Flow)
    }

    /// The nearest cell or frame around `id`, or the root.
    ///
    /// Edits never cross the boundary of this container.
    pub fn isolating_ancestor(&self, id: NodeId) -> NodeId {
        self.ancestors(id)
            .find(|&a| self.kind(a).is_isolating())
            .unwrap_or(self.root())
    }

    /// `id` followed by its ancestors, nearest first.
    pub(crate) fn chain(&self, id: NodeId) -> Chain {
        let mut chain = Chain::new();
        chain.push(id);
        chain.extend(self.ancestors(id));
        chain
    }

    /// The deepest node that is `a` or `b` or an ancestor of both.
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> NodeId {
        let chain = self.chain(a);
        let mut cur = b;
        loop {
            if chain.contains(&cur) {
                return cur;
            }
            cur = self.parent(cur).expect("nodes of one document share the root");
        }
    }

    /// Returns `true` if `a` comes strictly before `b` in document order.
    ///
    /// An ancestor precedes its descendants.
    pub fn precedes(&self, a: NodeId, b: NodeId) -> bool {
        if a == b || self.is_ancestor(b, a) {
            return false;
        }
        if self.is_ancestor(a, b) {
            return true;
        }
        let common = self.common_ancestor(a, b);
        let below = |id: NodeId| {
            let chain = self.chain(id);
            let ix = chain
                .iter()
                .position(|&n| n == common)
                .expect("common ancestor is on the chain");
            chain[ix - 1]
        };
        let (sa, sb) = (below(a), below(b));
        let mut cur = self.next(sa);
        while let Some(id) = cur {
            if id == sb {
                return true;
            }
            cur = self.next(id);
        }
        false
    }

    /// The first leaf of the subtree of `id`, or `id` itself if it is a leaf.
    pub fn first_leaf(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_container(id) {
            return Some(id);
        }
        self.children(id).find_map(|child| self.first_leaf(child))
    }

    /// The last leaf of the subtree of `id`, or `id` itself if it is a leaf.
    pub fn last_leaf(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_container(id) {
            return Some(id);
        }
        let mut cur = self.tail(id);
        while let Some(child) = cur {
            if let Some(leaf) = self.last_leaf(child) {
                return Some(leaf);
            }
            cur = self.prev(child);
        }
        None
    }

    /// The first leaf after the subtree of `id` in document order.
    pub fn next_leaf(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = id;
        loop {
            let sibling = loop {
                if let Some(next) = self.next(cur) {
                    break next;
                }
                cur = self.parent(cur)?;
            };
            if let Some(leaf) = self.first_leaf(sibling) {
                return Some(leaf);
            }
            cur = sibling;
        }
    }

    /// The last leaf before the subtree of `id` in document order.
    pub fn prev_leaf(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = id;
        loop {
            let sibling = loop {
                if let Some(prev) = self.prev(cur) {
                    break prev;
                }
                cur = self.parent(cur)?;
            };
            if let Some(leaf) = self.last_leaf(sibling) {
                return Some(leaf);
            }
            cur = sibling;
        }
    }

    /// Every leaf of the subtree of `id`, in document order.
    pub fn leaves(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let Some(mut leaf) = self.first_leaf(id) else {
            return out;
        };
        loop {
            out.push(leaf);
            match self.next_leaf(leaf) {
                Some(next) if self.is_ancestor(id, next) => leaf = next,
                _ => return out,
            }
        }
    }

    /// Every node of the subtree of `id` in pre-order, `id` first.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = alloc::vec![id];
        while let Some(id) = stack.pop() {
            out.push(id);
            let mut child = self.tail(id);
            while let Some(c) = child {
                stack.push(c);
                child = self.prev(c);
            }
        }
        out
    }

    /// Every flow of the document in document order.
    pub fn flows(&self) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|&id| self.node_type(id) == NodeType::Flow)
            .collect()
    }
}
