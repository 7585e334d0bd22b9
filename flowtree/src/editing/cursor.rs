// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::layout::{CursorGeometry, LayoutError};
use crate::tree::{Document, NodeId, Relocation};

/// A location in a document together with its ordinal.
///
/// The location is a leaf and an offset into it: characters for text, `0` or `1` for any other
/// leaf. The ordinal, [`position`](Self::position), counts the forward steps from the start of
/// the document to the location.
///
/// Offset `0` of a leaf that follows another leaf of the same paragraph denotes the same place
/// as the end of that leaf. Navigation never produces it, and [`normalize`](Self::normalize)
/// rewrites it to the end of the preceding leaf.
#[derive(Copy, Clone, Debug)]
pub struct Cursor {
    object: NodeId,
    offset: usize,
    position: usize,
    target_x: Option<f32>,
}

fn offset0_valid(doc: &Document, id: NodeId) -> bool {
    doc.prev(id).is_none_or(|prev| doc.is_container(prev))
}

/// Returns `true` if the cursor can rest somewhere in `id`.
fn is_stop(doc: &Document, id: NodeId) -> bool {
    doc.length(id) > 0 || offset0_valid(doc, id)
}

fn next_stop(doc: &Document, id: NodeId) -> Option<NodeId> {
    let mut cur = id;
    loop {
        let next = doc.next_leaf(cur)?;
        if is_stop(doc, next) {
            return Some(next);
        }
        cur = next;
    }
}

fn prev_stop(doc: &Document, id: NodeId) -> Option<NodeId> {
    let mut cur = id;
    loop {
        let prev = doc.prev_leaf(cur)?;
        if is_stop(doc, prev) {
            return Some(prev);
        }
        cur = prev;
    }
}

/// The next cluster boundary of `id` after `offset`.
fn next_boundary(doc: &Document, id: NodeId, offset: usize) -> usize {
    let Some(run) = doc.text(id) else {
        return offset + 1;
    };
    let attrs = doc.log_attrs(run.text());
    (offset + 1..run.len_chars())
        .find(|&i| attrs.get(i).is_some_and(|a| a.is_cursor_position()))
        .unwrap_or(run.len_chars())
}

/// The last cluster boundary of `id` before `offset`.
fn prev_boundary(doc: &Document, id: NodeId, offset: usize) -> usize {
    let Some(run) = doc.text(id) else {
        return offset - 1;
    };
    let attrs = doc.log_attrs(run.text());
    (1..offset)
        .rev()
        .find(|&i| attrs.get(i).is_some_and(|a| a.is_cursor_position()))
        .unwrap_or(0)
}

/// The canonical form of the location `(object, offset)`.
pub(crate) fn canonical(doc: &Document, object: NodeId, offset: usize) -> (NodeId, usize) {
    let offset = offset.min(doc.length(object));
    if offset == 0 && !offset0_valid(doc, object) {
        if let Some(prev) = prev_stop(doc, object) {
            return (prev, doc.length(prev));
        }
    }
    (object, offset)
}

impl Cursor {
    /// A cursor at the start of `doc`.
    pub fn document_start(doc: &Document) -> Self {
        let object = doc
            .first_leaf(doc.root())
            .expect("a well-formed document has a leaf");
        Self {
            object,
            offset: 0,
            position: 0,
            target_x: None,
        }
    }

    /// A cursor at the end of `doc`.
    pub fn document_end(doc: &Document) -> Self {
        let mut cursor = Self::document_start(doc);
        while cursor.step_forward(doc, true) {}
        cursor
    }

    /// A cursor at `(object, offset)`, with its position computed by walking from the start
    /// of the document. Returns `None` if the location cannot be reached.
    pub fn at(doc: &Document, object: NodeId, offset: usize) -> Option<Self> {
        if !doc.contains(object) {
            return None;
        }
        let mut cursor = Self::document_start(doc);
        cursor.advance_to(doc, object, offset).then_some(cursor)
    }

    /// The leaf holding the cursor.
    pub fn object(&self) -> NodeId {
        self.object
    }

    /// Offset into [`object`](Self::object).
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// `(object, offset)`.
    pub fn location(&self) -> (NodeId, usize) {
        (self.object, self.offset)
    }

    /// Number of forward steps from the start of the document.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The column kept by vertical motion.
    pub fn target_x(&self) -> Option<f32> {
        self.target_x
    }

    pub(crate) fn set(&mut self, object: NodeId, offset: usize, position: usize) {
        self.object = object;
        self.offset = offset;
        self.position = position;
        self.target_x = None;
    }

    /// Returns `true` if the cursor refers to a live leaf of `doc` within its bounds.
    pub fn is_valid(&self, doc: &Document) -> bool {
        doc.get(self.object).is_some_and(|node| {
            node.kind().accepts_cursor() && self.offset <= node.kind().length()
        })
    }

    /// Returns `true` if both cursors denote the same location.
    pub fn equal(&self, other: &Self) -> bool {
        self.object == other.object && self.offset == other.offset
    }

    /// Returns `true` if this cursor comes before `other`.
    pub fn precedes(&self, other: &Self) -> bool {
        self.position < other.position
    }

    /// Returns `true` if this cursor comes after `other`.
    pub fn follows(&self, other: &Self) -> bool {
        self.position > other.position
    }

    /// Rewrite the location into its canonical form. The position does not change.
    pub fn normalize(&mut self, doc: &Document) {
        (self.object, self.offset) = canonical(doc, self.object, self.offset);
    }

    /// Follow `changes` so the cursor keeps pointing at the same content.
    ///
    /// The position is left alone; edits that move content before the cursor update it
    /// themselves.
    pub fn relocate(&mut self, doc: &Document, changes: &[Relocation]) {
        for change in changes {
            (self.object, self.offset) = change.apply(self.object, self.offset);
        }
        if self.is_valid(doc) {
            self.normalize(doc);
        }
    }

    /// Recompute the position by walking from the start of the document.
    pub fn compute_position(&self, doc: &Document) -> Option<usize> {
        Self::at(doc, self.object, self.offset).map(|c| c.position)
    }

    /// Where to draw the cursor.
    pub fn geometry(&self, doc: &Document) -> Result<CursorGeometry, LayoutError> {
        doc.cursor_geometry(self.object, self.offset)
    }

    // --- MARK: Logical motion ---

    pub(crate) fn step_forward(&mut self, doc: &Document, exact: bool) -> bool {
        if self.offset < doc.length(self.object) {
            let next = if exact {
                self.offset + 1
            } else {
                next_boundary(doc, self.object, self.offset)
            };
            self.position += next - self.offset;
            self.offset = next;
            return true;
        }
        let Some(next) = next_stop(doc, self.object) else {
            return false;
        };
        let offset = if offset0_valid(doc, next) {
            self.position += 1;
            0
        } else {
            let offset = if exact { 1 } else { next_boundary(doc, next, 0) };
            self.position += offset;
            offset
        };
        self.object = next;
        self.offset = offset;
        true
    }

    pub(crate) fn step_backward(&mut self, doc: &Document, exact: bool) -> bool {
        if self.offset > 0 {
            let target = if exact {
                self.offset - 1
            } else {
                prev_boundary(doc, self.object, self.offset)
            };
            if target > 0 || offset0_valid(doc, self.object) {
                self.position -= self.offset - target;
                self.offset = target;
                return true;
            }
        }
        let Some(prev) = prev_stop(doc, self.object) else {
            return false;
        };
        self.position -= self.offset.max(1);
        self.object = prev;
        self.offset = doc.length(prev);
        true
    }

    /// Move one step towards the end of the document. With `exact`, the step is a single
    /// character; otherwise a whole cluster.
    ///
    /// Returns `false` at the end of the document.
    pub fn forward(&mut self, doc: &Document, exact: bool) -> bool {
        self.target_x = None;
        self.step_forward(doc, exact)
    }

    /// Move one step towards the start of the document.
    ///
    /// Returns `false` at the start of the document.
    pub fn backward(&mut self, doc: &Document, exact: bool) -> bool {
        self.target_x = None;
        self.step_backward(doc, exact)
    }

    /// Move one cluster to the right on screen.
    pub fn right(&mut self, doc: &Document) -> bool {
        if doc.resolved_direction(self.object).is_rtl() {
            self.backward(doc, false)
        } else {
            self.forward(doc, false)
        }
    }

    /// Move one cluster to the left on screen.
    pub fn left(&mut self, doc: &Document) -> bool {
        if doc.resolved_direction(self.object).is_rtl() {
            self.forward(doc, false)
        } else {
            self.backward(doc, false)
        }
    }

    fn char_after(&self, doc: &Document) -> Option<char> {
        if let Some(run) = doc.text(self.object) {
            if self.offset < run.len_chars() {
                return run.text().chars().nth(self.offset);
            }
        } else if self.offset == 0 {
            return None;
        }
        let mut next = doc.next(self.object);
        while let Some(id) = next {
            match doc.text(id) {
                Some(run) if run.is_empty() => next = doc.next(id),
                Some(run) => return run.text().chars().next(),
                None => return None,
            }
        }
        None
    }

    fn char_before(&self, doc: &Document) -> Option<char> {
        if self.offset > 0 {
            return doc
                .text(self.object)
                .and_then(|run| run.text().chars().nth(self.offset - 1));
        }
        let mut prev = doc.prev(self.object);
        while let Some(id) = prev {
            match doc.text(id) {
                Some(run) if run.is_empty() => prev = doc.prev(id),
                Some(run) => return run.text().chars().last(),
                None => return None,
            }
        }
        None
    }

    /// Move to the end of the current or next word.
    pub fn forward_word(&mut self, doc: &Document) -> bool {
        self.target_x = None;
        let mut moved = false;
        while !self.char_after(doc).is_some_and(char::is_alphanumeric) {
            if !self.step_forward(doc, false) {
                return moved;
            }
            moved = true;
        }
        while self.char_after(doc).is_some_and(char::is_alphanumeric) {
            if !self.step_forward(doc, false) {
                break;
            }
            moved = true;
        }
        moved
    }

    /// Move to the start of the current or previous word.
    pub fn backward_word(&mut self, doc: &Document) -> bool {
        self.target_x = None;
        let mut moved = false;
        while !self.char_before(doc).is_some_and(char::is_alphanumeric) {
            if !self.step_backward(doc, false) {
                return moved;
            }
            moved = true;
        }
        while self.char_before(doc).is_some_and(char::is_alphanumeric) {
            if !self.step_backward(doc, false) {
                break;
            }
            moved = true;
        }
        moved
    }

    /// Move to the start of the paragraph.
    pub fn beginning_of_paragraph(&mut self, doc: &Document) -> bool {
        self.target_x = None;
        let flow = doc.enclosing_flow(self.object);
        let depth = doc.depth(self.object);
        let mut moved = false;
        loop {
            let saved = *self;
            if !self.step_backward(doc, false) {
                break;
            }
            if doc.enclosing_flow(self.object) != flow || doc.depth(self.object) != depth {
                *self = saved;
                break;
            }
            moved = true;
        }
        moved
    }

    /// Move to the end of the paragraph.
    pub fn end_of_paragraph(&mut self, doc: &Document) -> bool {
        self.target_x = None;
        let flow = doc.enclosing_flow(self.object);
        let depth = doc.depth(self.object);
        let mut moved = false;
        loop {
            let saved = *self;
            if !self.step_forward(doc, false) {
                break;
            }
            if doc.enclosing_flow(self.object) != flow || doc.depth(self.object) != depth {
                *self = saved;
                break;
            }
            moved = true;
        }
        moved
    }

    /// Move to the start of the document.
    pub fn beginning_of_document(&mut self, doc: &Document) -> bool {
        let moved = self.position > 0;
        *self = Self::document_start(doc);
        moved
    }

    /// Move to the end of the document.
    pub fn end_of_document(&mut self, doc: &Document) -> bool {
        self.target_x = None;
        let mut moved = false;
        while self.step_forward(doc, true) {
            moved = true;
        }
        moved
    }

    /// Step forward until the cursor reaches `(object, offset)`. Returns `false`, with the
    /// cursor at the end of the document, if the location is not ahead.
    pub(crate) fn advance_to(&mut self, doc: &Document, object: NodeId, offset: usize) -> bool {
        let target = canonical(doc, object, offset);
        loop {
            if self.location() == target {
                return true;
            }
            if !self.step_forward(doc, true) {
                return false;
            }
        }
    }

    /// Move to `(object, offset)`, scanning forward and then backward.
    ///
    /// Both the cursor and the target are normalized first. Returns `false`, leaving the
    /// cursor unchanged, if the target is not reachable.
    pub fn jump_to(&mut self, doc: &Document, object: NodeId, offset: usize, exact: bool) -> bool {
        if !doc.contains(object) || !doc.kind(object).accepts_cursor() {
            return false;
        }
        let target = canonical(doc, object, offset);
        self.normalize(doc);
        self.target_x = None;
        if self.location() == target {
            return true;
        }
        let origin = *self;
        while self.step_forward(doc, exact) {
            if self.location() == target {
                return true;
            }
        }
        *self = origin;
        while self.step_backward(doc, exact) {
            if self.location() == target {
                return true;
            }
        }
        *self = origin;
        log::warn!("jump target {:?}:{} is unreachable", target.0, target.1);
        false
    }

    /// Move until [`position`](Self::position) equals `position`.
    pub fn jump_to_position(&mut self, doc: &Document, position: usize) -> bool {
        self.target_x = None;
        while self.position < position {
            if !self.step_forward(doc, true) {
                return false;
            }
        }
        while self.position > position {
            if !self.step_backward(doc, true) {
                return false;
            }
        }
        true
    }

    // --- MARK: Visual motion ---

    fn step(&mut self, doc: &Document, down: bool) -> bool {
        if down {
            self.step_forward(doc, false)
        } else {
            self.step_backward(doc, false)
        }
    }

    fn vertical(&mut self, doc: &Document, down: bool) -> Result<bool, LayoutError> {
        let here = self.geometry(doc)?;
        let target_x = self.target_x.unwrap_or(here.x);
        let line = loop {
            if !self.step(doc, down) {
                return Ok(false);
            }
            let g = self.geometry(doc)?;
            let beyond = if down { g.y > here.y } else { g.y < here.y };
            if beyond && !here.same_line(&g) {
                break g;
            }
        };
        let mut best = *self;
        let mut best_distance = (line.x - target_x).abs();
        while self.step(doc, down) {
            let g = self.geometry(doc)?;
            if !line.same_line(&g) {
                break;
            }
            let distance = (g.x - target_x).abs();
            if distance <= best_distance {
                best = *self;
                best_distance = distance;
            }
        }
        *self = best;
        self.target_x = Some(target_x);
        Ok(true)
    }

    fn vertical_or_restore(&mut self, doc: &Document, down: bool) -> Result<bool, LayoutError> {
        let origin = *self;
        let result = self.vertical(doc, down);
        if !matches!(result, Ok(true)) {
            *self = origin;
        }
        result
    }

    /// Move to the closest location on the line above, keeping the column across repeated
    /// vertical moves.
    ///
    /// Returns `Ok(false)`, leaving the cursor unchanged, on the first line.
    pub fn up(&mut self, doc: &Document) -> Result<bool, LayoutError> {
        self.vertical_or_restore(doc, false)
    }

    /// Move to the closest location on the line below.
    ///
    /// Returns `Ok(false)`, leaving the cursor unchanged, on the last line.
    pub fn down(&mut self, doc: &Document) -> Result<bool, LayoutError> {
        self.vertical_or_restore(doc, true)
    }

    fn along_line(&mut self, doc: &Document, forward: bool) -> Result<bool, LayoutError> {
        let here = self.geometry(doc)?;
        let iso = doc.isolating_ancestor(self.object);
        let mut moved = false;
        loop {
            let saved = *self;
            let stepped = if forward {
                self.step_forward(doc, false)
            } else {
                self.step_backward(doc, false)
            };
            if !stepped {
                break;
            }
            let g = match self.geometry(doc) {
                Ok(g) => g,
                Err(err) => {
                    *self = saved;
                    return Err(err);
                }
            };
            if !here.same_line(&g) || doc.isolating_ancestor(self.object) != iso {
                *self = saved;
                break;
            }
            moved = true;
        }
        self.target_x = None;
        Ok(moved)
    }

    /// Move to the start of the visual line.
    pub fn beginning_of_line(&mut self, doc: &Document) -> Result<bool, LayoutError> {
        self.along_line(doc, false)
    }

    /// Move to the end of the visual line.
    pub fn end_of_line(&mut self, doc: &Document) -> Result<bool, LayoutError> {
        self.along_line(doc, true)
    }
}

#[cfg(test)]
mod tests {
    use super::Cursor;
    use crate::measure::FixedPainter;
    use crate::style::{FontFlags, TextStyle};
    use crate::tree::{Document, DocumentBuilder};

    fn styled() -> Document {
        let bold = TextStyle {
            flags: FontFlags::BOLD,
            ..TextStyle::default()
        };
        let mut b = DocumentBuilder::new();
        b.text("ab").text_styled("cde", bold).text("ef");
        b.build()
    }

    #[test]
    fn positions_count_steps() {
        let doc = styled();
        let start = Cursor::document_start(&doc);
        let mut cursor = start;
        for _ in 0..5 {
            assert!(cursor.forward(&doc, true));
        }
        assert_eq!(cursor.position(), 5);
        for _ in 0..5 {
            assert!(cursor.backward(&doc, true));
        }
        assert_eq!(cursor.position(), 0);
        assert!(cursor.equal(&start));
    }

    #[test]
    fn run_seams_are_a_single_location() {
        let doc = styled();
        let leaves = doc.leaves(doc.root());
        let mut cursor = Cursor::document_start(&doc);
        cursor.jump_to_position(&doc, 2);
        assert_eq!(cursor.location(), (leaves[0], 2));
        cursor.forward(&doc, true);
        assert_eq!(cursor.location(), (leaves[1], 1));
        let mut other = Cursor::at(&doc, leaves[1], 0).unwrap();
        assert_eq!(other.location(), (leaves[0], 2));
        other.normalize(&doc);
        assert_eq!(other.position(), 2);
    }

    #[test]
    fn paragraph_boundaries_cost_one_step() {
        let mut b = DocumentBuilder::new();
        b.text("ab\ncd");
        let doc = b.build();
        let end = Cursor::document_end(&doc);
        assert_eq!(end.position(), 5);
        let mut cursor = end;
        assert!(cursor.beginning_of_paragraph(&doc));
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.offset(), 0);
    }

    #[test]
    fn jump_to_scans_both_ways() {
        let doc = styled();
        let leaves = doc.leaves(doc.root());
        let mut cursor = Cursor::document_end(&doc);
        assert!(cursor.jump_to(&doc, leaves[1], 2, true));
        assert_eq!(cursor.position(), 4);
        assert!(cursor.jump_to(&doc, leaves[2], 2, true));
        assert_eq!(cursor.position(), 7);
    }

    #[test]
    fn words_are_skipped_whole() {
        let mut b = DocumentBuilder::new();
        b.text("one two  three");
        let doc = b.build();
        let mut cursor = Cursor::document_start(&doc);
        assert!(cursor.forward_word(&doc));
        assert_eq!(cursor.offset(), 3);
        assert!(cursor.forward_word(&doc));
        assert_eq!(cursor.offset(), 7);
        assert!(cursor.backward_word(&doc));
        assert_eq!(cursor.offset(), 4);
    }

    #[test]
    fn up_on_first_line_fails() {
        let mut b = DocumentBuilder::new();
        b.text("hello");
        let mut doc = b.build();
        doc.set_painter(FixedPainter::default());
        doc.relayout().unwrap();
        let mut cursor = Cursor::document_start(&doc);
        cursor.forward(&doc, true);
        let before = cursor;
        assert_eq!(cursor.up(&doc), Ok(false));
        assert!(cursor.equal(&before));
        assert_eq!(cursor.position(), before.position());
    }
}
