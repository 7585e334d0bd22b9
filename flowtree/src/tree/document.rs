// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::analysis::{self, LogAttr};
use crate::layout::LayoutOptions;
use crate::measure::Painter;
use crate::style::{Direction, FlowStyle, TextStyle};
use crate::text::TextRun;
use crate::tree::{Arena, Clue, Dirty, Node, NodeId, NodeKind, NodeType, Relocation};

/// An editable rich-text document.
///
/// The document owns every node. Nodes are addressed by [`NodeId`]; accessors taking an id
/// panic when the id is stale, while the `get`-style accessors return `None`.
pub struct Document {
    pub(crate) arena: Arena,
    root: NodeId,
    pub(crate) painter: Option<Box<dyn Painter>>,
    pub(crate) journal: Vec<Relocation>,
    pub(crate) layout_clean: bool,
    pub(crate) layout: LayoutOptions,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("arena", &self.arena)
            .field("root", &self.root)
            .field("has_painter", &self.painter.is_some())
            .field("journal", &self.journal.len())
            .field("layout_clean", &self.layout_clean)
            .field("layout", &self.layout)
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a document holding one empty paragraph.
    pub fn new() -> Self {
        let mut doc = Self::new_empty();
        let flow = doc.new_flow(FlowStyle::default());
        let text = doc.new_text("", TextStyle::default());
        doc.append_child(flow, text);
        doc.append_child(doc.root, flow);
        doc
    }

    /// Creates a document whose root has no children, for builders.
    ///
    /// Such a document is not well-formed until content is added.
    pub fn new_empty() -> Self {
        let mut arena = Arena::default();
        let root = arena.insert(Node::new(NodeKind::Clue(Clue::default())));
        Self {
            arena,
            root,
            painter: None,
            journal: Vec::new(),
            layout_clean: false,
            layout: LayoutOptions::default(),
        }
    }

    /// The root container.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Returns `true` if the root has no children.
    pub fn is_empty(&self) -> bool {
        self.head(self.root).is_none()
    }

    /// Returns `true` if `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id)
    }

    /// The node `id`, or `None` if it has been destroyed.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    /// The node `id`.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.arena[id]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.arena[id]
    }

    /// The payload of `id`.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.arena[id].kind
    }

    /// The variant of `id`.
    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.kind(id).node_type()
    }

    /// Returns `true` if `id` holds children.
    pub fn is_container(&self, id: NodeId) -> bool {
        self.kind(id).is_container()
    }

    /// Cursor units of `id`.
    pub fn length(&self, id: NodeId) -> usize {
        self.kind(id).length()
    }

    /// The text run of `id`, if it is a text node.
    pub fn text(&self, id: NodeId) -> Option<&TextRun> {
        self.get(id).and_then(|node| node.kind.as_text())
    }

    /// Mutable access to the text run of `id`. Marks the node for relayout.
    pub fn text_mut(&mut self, id: NodeId) -> Option<&mut TextRun> {
        if self.text(id).is_none() {
            return None;
        }
        self.mark_dirty(id);
        match &mut self.arena[id].kind {
            NodeKind::Text(run) => Some(run),
            _ => None,
        }
    }

    /// Paragraph style of the flow `id`.
    pub fn flow_style(&self, id: NodeId) -> Option<&FlowStyle> {
        self.get(id).and_then(|node| node.kind.as_flow())
    }

    /// Replace the paragraph style of the flow `id`.
    pub fn set_flow_style(&mut self, id: NodeId, style: FlowStyle) {
        if let NodeKind::Flow(own) = &mut self.arena[id].kind {
            *own = style;
            self.mark_dirty(id);
        }
    }

    /// Parent of `id`.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].parent
    }

    /// Previous sibling of `id`.
    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].prev
    }

    /// Next sibling of `id`.
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].next
    }

    /// First child of `id`.
    pub fn head(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].head
    }

    /// Last child of `id`.
    pub fn tail(&self, id: NodeId) -> Option<NodeId> {
        self.arena[id].tail
    }

    // --- MARK: Construction ---

    /// Allocate a detached node.
    pub fn new_node(&mut self, kind: NodeKind) -> NodeId {
        self.arena.insert(Node::new(kind))
    }

    /// Allocate a detached text node.
    pub fn new_text(&mut self, text: impl Into<String>, style: TextStyle) -> NodeId {
        self.new_node(NodeKind::Text(TextRun::new(text, style)))
    }

    /// Allocate a detached, empty flow.
    pub fn new_flow(&mut self, style: FlowStyle) -> NodeId {
        self.new_node(NodeKind::Flow(style))
    }

    fn assert_attachable(&self, parent: NodeId, child: NodeId) {
        assert!(
            self.is_container(parent),
            "{:?} is a leaf and cannot hold children",
            self.node_type(parent)
        );
        let node = &self.arena[child];
        assert!(
            node.parent.is_none() && node.prev.is_none() && node.next.is_none(),
            "node {child:?} is still attached"
        );
        assert_ne!(parent, child, "a node cannot contain itself");
    }

    /// Append the detached node `child` to the children of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.assert_attachable(parent, child);
        let tail = self.arena[parent].tail;
        {
            let node = &mut self.arena[child];
            node.parent = Some(parent);
            node.prev = tail;
        }
        match tail {
            Some(tail) => self.arena[tail].next = Some(child),
            None => self.arena[parent].head = Some(child),
        }
        self.arena[parent].tail = Some(child);
        self.mark_dirty(parent);
    }

    /// Prepend the detached node `child` to the children of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        match self.arena[parent].head {
            Some(head) => self.insert_before(head, child),
            None => self.append_child(parent, child),
        }
    }

    /// Insert the detached node `node` right before `anchor`.
    pub fn insert_before(&mut self, anchor: NodeId, node: NodeId) {
        let parent = self.parent(anchor).expect("anchor must be attached");
        self.assert_attachable(parent, node);
        let prev = self.arena[anchor].prev;
        {
            let n = &mut self.arena[node];
            n.parent = Some(parent);
            n.prev = prev;
            n.next = Some(anchor);
        }
        self.arena[anchor].prev = Some(node);
        match prev {
            Some(prev) => self.arena[prev].next = Some(node),
            None => self.arena[parent].head = Some(node),
        }
        self.mark_dirty(parent);
    }

    /// Insert the detached node `node` right after `anchor`.
    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) {
        match self.arena[anchor].next {
            Some(next) => self.insert_before(next, node),
            None => {
                let parent = self.parent(anchor).expect("anchor must be attached");
                self.append_child(parent, node);
            }
        }
    }

    /// Unlink `child` from `parent` without destroying it.
    ///
    /// Panics if `parent` is a leaf or `child` is not one of its children.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        assert!(
            self.is_container(parent),
            "remove_child called on a {:?} leaf",
            self.node_type(parent)
        );
        assert_eq!(
            self.parent(child),
            Some(parent),
            "{child:?} is not a child of {parent:?}"
        );
        self.detach(child);
    }

    /// Unlink `id` from its parent and siblings.
    pub(crate) fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = &mut self.arena[id];
            let links = (node.parent, node.prev, node.next);
            node.parent = None;
            node.prev = None;
            node.next = None;
            links
        };
        let Some(parent) = parent else {
            return;
        };
        match prev {
            Some(prev) => self.arena[prev].next = next,
            None => self.arena[parent].head = next,
        }
        match next {
            Some(next) => self.arena[next].prev = prev,
            None => self.arena[parent].tail = prev,
        }
        self.mark_dirty(parent);
    }

    /// Destroy `id` and its subtree.
    ///
    /// The node is unlinked first if it is still attached. Every destroyed leaf is journaled
    /// as removed without replacement.
    pub fn destroy(&mut self, id: NodeId) {
        self.destroy_with(id, None);
    }

    pub(crate) fn destroy_with(&mut self, id: NodeId, replacement: Option<(NodeId, usize)>) {
        self.detach(id);
        let mut stack = alloc::vec![id];
        while let Some(id) = stack.pop() {
            let node = self.arena.remove(id);
            let mut child = node.head;
            while let Some(c) = child {
                child = self.arena[c].next;
                stack.push(c);
            }
            if node.kind.accepts_cursor() {
                self.journal.push(Relocation::Removed {
                    node: id,
                    replacement,
                });
            }
        }
    }

    /// Move every child of `from` to the end of `to`.
    pub(crate) fn move_children(&mut self, from: NodeId, to: NodeId) {
        while let Some(child) = self.head(from) {
            self.detach(child);
            self.append_child(to, child);
        }
    }

    /// Move `first` and every following sibling to the end of `to`.
    pub(crate) fn move_tail(&mut self, first: NodeId, to: NodeId) {
        let mut cur = Some(first);
        while let Some(id) = cur {
            cur = self.next(id);
            self.detach(id);
            self.append_child(to, id);
        }
    }

    // --- MARK: Side data ---

    /// Attach a key/value pair to `id`.
    pub fn set_data(&mut self, id: NodeId, key: impl Into<String>, value: impl Into<String>) {
        self.arena[id].data.insert(key.into(), value.into());
    }

    /// Remove the value of `key` from `id`.
    pub fn remove_data(&mut self, id: NodeId, key: &str) -> Option<String> {
        self.arena[id].data.remove(key)
    }

    // --- MARK: Layout state ---

    /// Mark `id` and its ancestors for relayout.
    pub fn mark_dirty(&mut self, id: NodeId) {
        self.layout_clean = false;
        let mut cur = Some(id);
        while let Some(id) = cur {
            let node = &mut self.arena[id];
            node.dirty.insert(Dirty::ALL);
            cur = node.parent;
        }
    }

    /// Returns `true` if the cached geometry reflects the current tree.
    pub fn is_layout_clean(&self) -> bool {
        self.layout_clean
    }

    /// Attach the painter used for measurement.
    pub fn set_painter(&mut self, painter: impl Painter + 'static) {
        self.painter = Some(Box::new(painter));
        self.layout_clean = false;
    }

    /// Detach the painter.
    pub fn take_painter(&mut self) -> Option<Box<dyn Painter>> {
        self.layout_clean = false;
        self.painter.take()
    }

    /// Returns `true` if a painter is attached.
    pub fn has_painter(&self) -> bool {
        self.painter.is_some()
    }

    /// Layout parameters.
    pub fn layout_options(&self) -> &LayoutOptions {
        &self.layout
    }

    /// Replace the layout parameters.
    pub fn set_layout_options(&mut self, options: LayoutOptions) {
        self.layout = options;
        self.mark_dirty(self.root);
    }

    /// Boundary attributes of `text`, from the painter when one is attached.
    pub fn log_attrs(&self, text: &str) -> Vec<LogAttr> {
        match &self.painter {
            Some(painter) => painter.cursor_position_attrs(text),
            None => analysis::log_attrs(text),
        }
    }

    /// Direction of the first strong character of `text`.
    pub fn base_direction(&self, text: &str) -> Direction {
        match &self.painter {
            Some(painter) => painter.base_direction(text),
            None => analysis::base_direction(text),
        }
    }

    // --- MARK: Journal ---

    /// Changes recorded since the journal was last cleared.
    pub fn journal(&self) -> &[Relocation] {
        &self.journal
    }

    /// Forget the recorded changes.
    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    pub(crate) fn record(&mut self, change: Relocation) {
        self.journal.push(change);
    }
}

#[cfg(test)]
mod tests {
    use crate::style::{FlowStyle, TextStyle};
    use crate::tree::{Document, NodeType};

    #[test]
    fn new_document_has_one_empty_paragraph() {
        let doc = Document::new();
        let flow = doc.head(doc.root()).unwrap();
        assert_eq!(doc.node_type(flow), NodeType::Flow);
        let text = doc.head(flow).unwrap();
        assert_eq!(doc.text(text).unwrap().len_chars(), 0);
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn sibling_links_stay_symmetric() {
        let mut doc = Document::new_empty();
        let flow = doc.new_flow(FlowStyle::default());
        doc.append_child(doc.root(), flow);
        let a = doc.new_text("a", TextStyle::default());
        let b = doc.new_text("b", TextStyle::default());
        let c = doc.new_text("c", TextStyle::default());
        doc.append_child(flow, b);
        doc.prepend_child(flow, a);
        doc.insert_after(b, c);
        assert_eq!(doc.children(flow).collect::<alloc::vec::Vec<_>>(), [a, b, c]);
        doc.remove_child(flow, b);
        assert_eq!(doc.next(a), Some(c));
        assert_eq!(doc.prev(c), Some(a));
        doc.destroy(b);
        assert!(!doc.contains(b));
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    #[should_panic(expected = "cannot hold children")]
    fn leaves_reject_children() {
        let mut doc = Document::new();
        let leaf = doc.first_leaf(doc.root()).unwrap();
        let other = doc.new_text("x", TextStyle::default());
        doc.append_child(leaf, other);
    }

    #[test]
    #[should_panic(expected = "remove_child called on a")]
    fn remove_child_on_leaf_is_fatal() {
        let mut doc = Document::new();
        let leaf = doc.first_leaf(doc.root()).unwrap();
        doc.remove_child(leaf, leaf);
    }

    #[test]
    fn side_data_round_trips() {
        let mut doc = Document::new();
        let root = doc.root();
        doc.set_data(root, "lang", "fr");
        assert_eq!(doc.node(root).data("lang"), Some("fr"));
        assert_eq!(doc.remove_data(root, "lang").as_deref(), Some("fr"));
        assert_eq!(doc.node(root).data("lang"), None);
    }
}
