// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::style::{Direction, FlowStyle, TextStyle};
use crate::tree::{
    Cell, CellSpan, Clue, ClueKind, Document, Embedded, Frame, Image, NodeId, NodeKind, Rule,
    Table,
};

/// Builds a well-formed [`Document`] from a stream of content.
///
/// Text is appended to the current paragraph, which is opened on demand. Paragraph breaks,
/// blocks, tables and frames structure the content around it.
///
/// ```
/// use flowtree::tree::DocumentBuilder;
///
/// let mut builder = DocumentBuilder::new();
/// builder.text("first").paragraph_break().text("second");
/// let doc = builder.build();
/// assert_eq!(doc.plain_text(), "first\nsecond");
/// ```
#[derive(Debug)]
pub struct DocumentBuilder {
    doc: Document,
    containers: Vec<NodeId>,
    tables: Vec<NodeId>,
    flow: Option<NodeId>,
    text_style: TextStyle,
    flow_style: FlowStyle,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    /// Creates a builder for an empty document.
    pub fn new() -> Self {
        let doc = Document::new_empty();
        let root = doc.root();
        Self {
            doc,
            containers: alloc::vec![root],
            tables: Vec::new(),
            flow: None,
            text_style: TextStyle::default(),
            flow_style: FlowStyle::default(),
        }
    }

    /// Style of the text appended from now on.
    pub fn set_text_style(&mut self, style: TextStyle) -> &mut Self {
        self.text_style = style;
        self
    }

    /// Style of the paragraphs opened from now on.
    pub fn set_flow_style(&mut self, style: FlowStyle) -> &mut Self {
        self.flow_style = style;
        self
    }

    fn container(&self) -> NodeId {
        *self.containers.last().expect("the root is never popped")
    }

    fn current_flow(&mut self) -> NodeId {
        if let Some(flow) = self.flow {
            return flow;
        }
        let flow = self.doc.new_flow(self.flow_style.clone());
        let container = self.container();
        self.doc.append_child(container, flow);
        self.flow = Some(flow);
        flow
    }

    fn push_leaf(&mut self, kind: NodeKind) -> NodeId {
        let flow = self.current_flow();
        let id = self.doc.new_node(kind);
        self.doc.append_child(flow, id);
        id
    }

    /// Append `text` in the current text style. Newlines break paragraphs.
    pub fn text(&mut self, text: &str) -> &mut Self {
        let style = self.text_style.clone();
        self.text_styled(text, style)
    }

    /// Append `text` in `style`. Newlines break paragraphs.
    pub fn text_styled(&mut self, text: &str, style: TextStyle) -> &mut Self {
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.paragraph_break();
            }
            if !line.is_empty() {
                let run = crate::text::TextRun::new(line, style.clone());
                self.push_leaf(NodeKind::Text(run));
            }
        }
        self
    }

    /// Append `text` linked to `url`.
    pub fn link(&mut self, text: &str, url: &str) -> &mut Self {
        let mut run = crate::text::TextRun::new(text, self.text_style.clone());
        let len = run.len_chars();
        let url: Arc<str> = url.into();
        if run.add_link(0..len, url).is_err() {
            log::warn!("could not link {text:?}");
        }
        self.push_leaf(NodeKind::Text(run));
        self
    }

    /// End the current paragraph. Consecutive breaks produce empty paragraphs.
    pub fn paragraph_break(&mut self) -> &mut Self {
        self.current_flow();
        self.flow = None;
        self
    }

    /// Append a horizontal rule.
    pub fn rule(&mut self, rule: Rule) -> &mut Self {
        self.push_leaf(NodeKind::Rule(rule));
        self
    }

    /// Append an image.
    pub fn image(&mut self, image: Image) -> &mut Self {
        self.push_leaf(NodeKind::Image(image));
        self
    }

    /// Append an embedded widget.
    pub fn embedded(&mut self, embedded: Embedded) -> &mut Self {
        self.push_leaf(NodeKind::Embedded(embedded));
        self
    }

    /// Open an indented block; content goes inside until [`end_block`](Self::end_block).
    pub fn begin_block(&mut self, indent: u8) -> &mut Self {
        self.flow = None;
        let block = self.doc.new_node(NodeKind::Clue(Clue {
            kind: ClueKind::Block,
            dir: Direction::Inherit,
            indent,
        }));
        let container = self.container();
        self.doc.append_child(container, block);
        self.containers.push(block);
        self
    }

    /// Close the innermost block.
    pub fn end_block(&mut self) -> &mut Self {
        self.close_container();
        self
    }

    /// Open a table in the current paragraph.
    pub fn begin_table(&mut self, table: Table) -> &mut Self {
        let table = self.push_leaf(NodeKind::Table(table));
        self.tables.push(table);
        self
    }

    /// Open a cell of the innermost table at `span`.
    pub fn begin_cell(&mut self, span: CellSpan) -> &mut Self {
        let table = *self.tables.last().expect("begin_cell outside of a table");
        self.flow = None;
        let cell = self.doc.add_cell(
            table,
            Cell {
                span,
                heading: false,
                dir: Direction::Inherit,
            },
        );
        self.containers.push(cell);
        self
    }

    /// Close the innermost cell.
    pub fn end_cell(&mut self) -> &mut Self {
        self.close_container();
        self
    }

    /// Close the innermost table, filling unoccupied slots with empty cells.
    pub fn end_table(&mut self) -> &mut Self {
        let table = self.tables.pop().expect("end_table without begin_table");
        let style = self.text_style.clone();
        self.doc.fill_table(table, &style);
        self.flow = None;
        self
    }

    /// Open a frame in its own paragraph.
    pub fn begin_frame(&mut self, frame: Frame) -> &mut Self {
        let frame = self.push_leaf(NodeKind::Frame(frame));
        self.flow = None;
        self.containers.push(frame);
        self
    }

    /// Close the innermost frame.
    pub fn end_frame(&mut self) -> &mut Self {
        self.close_container();
        self
    }

    fn close_container(&mut self) {
        let container = self.container();
        assert_ne!(container, self.doc.root(), "no container to close");
        if self.doc.head(container).is_none() {
            self.current_flow();
        }
        self.containers.pop();
        self.flow = None;
    }

    /// Finish the document.
    ///
    /// Every paragraph left empty receives a placeholder run, so the result is well-formed.
    pub fn build(mut self) -> Document {
        while self.containers.len() > 1 {
            self.close_container();
        }
        if self.doc.head(self.doc.root()).is_none() {
            self.current_flow();
        }
        let style = self.text_style.clone();
        for flow in self.doc.flows() {
            self.doc.ensure_placeholder(flow, &style);
        }
        let doc = self.doc;
        debug_assert!(
            doc.check_invariants().is_ok(),
            "builder produced a malformed tree: {:?}",
            doc.check_invariants()
        );
        doc
    }
}
