// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use crate::tree::{Document, NodeId, NodeKind};

/// An event of a depth-first walk, as consumed by serializers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WalkEvent {
    /// The walk reaches a node, before its children.
    Enter(NodeId),
    /// The walk leaves a node, after its children.
    Leave(NodeId),
}

impl Document {
    /// Walk the subtree of `id` depth first, reporting every node on entry and exit.
    pub fn walk(&self, id: NodeId, mut visit: impl FnMut(WalkEvent)) {
        let mut stack = alloc::vec![(id, false)];
        while let Some((id, done)) = stack.pop() {
            if done {
                visit(WalkEvent::Leave(id));
                continue;
            }
            visit(WalkEvent::Enter(id));
            stack.push((id, true));
            let mut child = self.tail(id);
            while let Some(c) = child {
                stack.push((c, false));
                child = self.prev(c);
            }
        }
    }

    /// The text of the document with paragraphs separated by newlines.
    ///
    /// Images contribute their replacement text; other non-text leaves contribute nothing.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        let mut first = true;
        self.walk(self.root(), |event| {
            let WalkEvent::Enter(id) = event else {
                return;
            };
            match self.kind(id) {
                NodeKind::Flow(_) => {
                    if !first {
                        out.push('\n');
                    }
                    first = false;
                }
                NodeKind::Text(run) => out.push_str(run.text()),
                NodeKind::Image(image) => {
                    if let Some(alt) = &image.alt {
                        out.push_str(alt);
                    }
                }
                _ => {}
            }
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::{DocumentBuilder, WalkEvent};
    use alloc::vec::Vec;

    #[test]
    fn walk_is_balanced() {
        let mut b = DocumentBuilder::new();
        b.text("a").paragraph_break().text("b");
        let doc = b.build();
        let mut events = Vec::new();
        doc.walk(doc.root(), |e| events.push(e));
        assert_eq!(events.first(), Some(&WalkEvent::Enter(doc.root())));
        assert_eq!(events.last(), Some(&WalkEvent::Leave(doc.root())));
        assert_eq!(events.len(), 2 * doc.len());
        assert_eq!(doc.plain_text(), "a\nb");
    }
}
