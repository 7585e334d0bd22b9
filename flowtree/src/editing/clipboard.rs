// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;

use crate::editing::{Cursor, Interval, unit_of};
use crate::style::{FlowStyle, TextStyle};
use crate::tree::{Document, NodeId, NodeKind};

/// Detached document content, as produced by copy and consumed by paste.
///
/// A fragment is a document whose root holds nothing but paragraphs. Tables and frames copied
/// into it are always whole.
#[derive(Debug)]
pub struct Fragment {
    doc: Document,
}

impl Fragment {
    /// Copy the content of `interval`.
    pub fn copy(doc: &Document, interval: &Interval) -> Self {
        let (start_object, start_offset) = interval.start().location();
        let (end_object, end_offset) = interval.end().location();
        let iso = doc.isolating_ancestor(start_object);
        let mut out = Document::new_empty();
        let root = out.root();
        let mut source_flow = None;
        let mut flow = None;
        let mut last_unit = None;
        let mut leaf = Some(start_object);
        while let Some(l) = leaf {
            if interval.is_empty() || !doc.is_ancestor(iso, l) {
                break;
            }
            let unit = unit_of(doc, iso, l);
            let Some(src) = doc.enclosing_flow(unit) else {
                break;
            };
            let dst = match flow {
                Some(dst) if source_flow == Some(src) => dst,
                _ => {
                    let style = doc.flow_style(src).cloned().unwrap_or_default();
                    let dst = out.new_flow(style);
                    out.append_child(root, dst);
                    source_flow = Some(src);
                    flow = Some(dst);
                    dst
                }
            };
            if unit != l {
                if last_unit != Some(unit) {
                    last_unit = Some(unit);
                    let copy = doc.copy_subtree_into(unit, &mut out);
                    out.append_child(dst, copy);
                }
                if doc.is_ancestor(unit, end_object) {
                    break;
                }
            } else {
                let from = if l == start_object { start_offset } else { 0 };
                let to = if l == end_object {
                    end_offset
                } else {
                    doc.length(l)
                };
                if from < to {
                    let kind = match doc.kind(l) {
                        NodeKind::Text(run) => NodeKind::Text(run.copy_range(from..to)),
                        other => other.duplicate(),
                    };
                    let copy = out.new_node(kind);
                    out.append_child(dst, copy);
                }
                if l == end_object {
                    break;
                }
            }
            leaf = doc.next_leaf(l);
        }
        let style = doc.text_style_near(start_object);
        Self::finish(out, &style)
    }

    /// A fragment holding `text` in `style`, one paragraph per line.
    pub fn from_text(text: &str, style: TextStyle) -> Self {
        let mut out = Document::new_empty();
        let root = out.root();
        for line in text.split('\n') {
            let flow = out.new_flow(FlowStyle::default());
            out.append_child(root, flow);
            if !line.is_empty() {
                let run = out.new_text(line, style.clone());
                out.append_child(flow, run);
            }
        }
        Self::finish(out, &style)
    }

    fn finish(mut doc: Document, style: &TextStyle) -> Self {
        let root = doc.root();
        if doc.head(root).is_none() {
            let flow = doc.new_flow(FlowStyle::default());
            doc.append_child(root, flow);
        }
        let flows: Vec<NodeId> = doc.children(root).collect();
        for flow in flows {
            doc.ensure_placeholder(flow, style);
        }
        debug_assert!(doc.check_invariants().is_ok(), "fragments are well-formed");
        Self { doc }
    }

    /// The content, as a document.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// The paragraphs of the fragment.
    pub fn paragraphs(&self) -> Vec<NodeId> {
        self.doc.children(self.doc.root()).collect()
    }

    /// Number of cursor steps the fragment spans.
    pub fn len(&self) -> usize {
        Cursor::document_end(&self.doc).position()
    }

    /// Returns `true` if pasting the fragment would change nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The text of the fragment, paragraphs separated by newlines.
    pub fn plain_text(&self) -> String {
        self.doc.plain_text()
    }
}

#[cfg(test)]
mod tests {
    use crate::editing::{Cursor, Fragment, Interval};
    use crate::style::TextStyle;
    use crate::tree::{CellSpan, DocumentBuilder, NodeType, Table};

    #[test]
    fn copies_keep_paragraphs_and_links() {
        let mut b = DocumentBuilder::new();
        b.text("see ").link("here", "https://example.org").text("\nnext");
        let doc = b.build();
        let mut start = Cursor::document_start(&doc);
        start.jump_to_position(&doc, 4);
        let end = Cursor::document_end(&doc);
        let fragment = Fragment::copy(&doc, &Interval::new(&doc, start, end));
        assert_eq!(fragment.plain_text(), "here\nnext");
        assert_eq!(fragment.paragraphs().len(), 2);
        let first = fragment.document().first_leaf(fragment.document().root()).unwrap();
        let run = fragment.document().text(first).unwrap();
        assert_eq!(run.link_at(0).unwrap().url.as_ref(), "https://example.org");
    }

    #[test]
    fn tables_are_copied_whole() {
        let mut b = DocumentBuilder::new();
        b.text("x\n");
        b.begin_table(Table::new(1, 2));
        b.begin_cell(CellSpan::at(0, 0)).text("ab").end_cell();
        b.begin_cell(CellSpan::at(0, 1)).text("cd").end_cell();
        b.end_table();
        let doc = b.build();
        let start = Cursor::document_start(&doc);
        let mut end = start;
        // Into the first cell only.
        end.jump_to_position(&doc, 3);
        let fragment = Fragment::copy(&doc, &Interval::new(&doc, start, end));
        let copy = fragment.document();
        let tables: alloc::vec::Vec<_> = copy
            .descendants(copy.root())
            .into_iter()
            .filter(|&id| copy.node_type(id) == NodeType::Table)
            .collect();
        assert_eq!(tables.len(), 1);
        assert_eq!(copy.plain_text(), "x\n\nab\ncd");
        assert!(copy.check_invariants().is_ok());
    }

    #[test]
    fn empty_fragments_are_recognized() {
        assert!(Fragment::from_text("", TextStyle::default()).is_empty());
        let two = Fragment::from_text("a\n", TextStyle::default());
        assert_eq!(two.len(), 2);
        assert_eq!(two.paragraphs().len(), 2);
    }
}
