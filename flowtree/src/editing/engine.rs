// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::ops::{Deref, DerefMut};

use crate::editing::{Cursor, EditKind, EditObserver, EngineOptions, Fragment, Interval};
use crate::layout::LayoutError;
use crate::measure::Painter;
use crate::style::{StyleAttr, TextStyle};
use crate::tree::{Document, NodeId, SpellChecker};

/// A document being edited.
///
/// The engine owns the document together with the cursor, an optional mark (the other end of
/// the selection), the clipboard and the insertion style. Every mutating operation notifies
/// the registered [`EditObserver`]s and, unless the engine is frozen, relayouts the document
/// when a painter is attached.
pub struct Engine {
    pub(crate) doc: Document,
    pub(crate) cursor: Cursor,
    pub(crate) mark: Option<Cursor>,
    pub(crate) options: EngineOptions,
    pub(crate) insertion_style: Option<TextStyle>,
    pub(crate) clipboard: Option<Fragment>,
    frozen: usize,
    showing_selection: bool,
    observers: Vec<Box<dyn EditObserver>>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("doc", &self.doc)
            .field("cursor", &self.cursor)
            .field("mark", &self.mark)
            .field("options", &self.options)
            .field("insertion_style", &self.insertion_style)
            .field("frozen", &self.frozen)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

/// Defers relayout while alive. Obtained from [`Engine::freeze`].
///
/// Guards nest; the document is laid out again when the outermost one is dropped.
pub struct FreezeGuard<'a> {
    engine: &'a mut Engine,
}

impl fmt::Debug for FreezeGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FreezeGuard")
            .field("depth", &self.engine.frozen)
            .finish_non_exhaustive()
    }
}

impl Deref for FreezeGuard<'_> {
    type Target = Engine;

    fn deref(&self) -> &Engine {
        self.engine
    }
}

impl DerefMut for FreezeGuard<'_> {
    fn deref_mut(&mut self) -> &mut Engine {
        self.engine
    }
}

impl Drop for FreezeGuard<'_> {
    fn drop(&mut self) {
        self.engine.thaw();
    }
}

impl Engine {
    /// Start editing `doc`, with the cursor at its start.
    pub fn new(mut doc: Document, options: EngineOptions) -> Self {
        doc.set_layout_options(options.layout.clone());
        doc.clear_journal();
        let cursor = Cursor::document_start(&doc);
        let mut engine = Self {
            doc,
            cursor,
            mark: None,
            options,
            insertion_style: None,
            clipboard: None,
            frozen: 0,
            showing_selection: false,
            observers: Vec::new(),
        };
        engine.relayout_if_needed();
        engine
    }

    /// The document.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Stop editing, returning the document.
    pub fn into_document(self) -> Document {
        self.doc
    }

    /// The cursor.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// The other end of the selection, if one is being made.
    pub fn mark(&self) -> Option<&Cursor> {
        self.mark.as_ref()
    }

    /// The configuration.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Attach the painter used for layout, and lay the document out with it.
    pub fn set_painter(&mut self, painter: impl Painter + 'static) {
        self.doc.set_painter(painter);
        self.relayout_if_needed();
    }

    /// Register a hook run around every edit.
    pub fn add_observer(&mut self, observer: impl EditObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    // --- MARK: Freezing ---

    /// Defer relayout until the returned guard, and any guard taken through it, is dropped.
    pub fn freeze(&mut self) -> FreezeGuard<'_> {
        self.frozen += 1;
        FreezeGuard { engine: self }
    }

    /// Returns `true` while a [`FreezeGuard`] is alive.
    pub fn is_frozen(&self) -> bool {
        self.frozen > 0
    }

    fn thaw(&mut self) {
        self.frozen -= 1;
        if self.frozen == 0 {
            self.relayout_if_needed();
        }
    }

    fn relayout_if_needed(&mut self) {
        if self.frozen > 0 || !self.doc.has_painter() || self.doc.is_layout_clean() {
            return;
        }
        if let Err(err) = self.doc.relayout() {
            log::warn!("relayout failed: {err}");
        }
    }

    /// Bring the geometry up to date, even while frozen.
    pub fn ensure_layout(&mut self) -> Result<(), LayoutError> {
        if self.doc.is_layout_clean() {
            return Ok(());
        }
        self.doc.relayout()
    }

    // --- MARK: Edit bookkeeping ---

    pub(crate) fn begin_edit(&mut self, kind: EditKind) {
        for observer in &mut self.observers {
            observer.before_edit(&self.doc, &self.cursor, kind);
        }
        self.doc.clear_journal();
    }

    pub(crate) fn finish_edit(&mut self, kind: EditKind) {
        debug_assert_eq!(
            self.cursor.compute_position(&self.doc),
            Some(self.cursor.position()),
            "cursor position drifted during {kind:?}"
        );
        if let Some(mut mark) = self.mark.take() {
            mark.relocate(&self.doc, self.doc.journal());
            self.mark = match mark.compute_position(&self.doc) {
                Some(position) => {
                    let (object, offset) = mark.location();
                    mark.set(object, offset, position);
                    Some(mark)
                }
                None => Some(self.cursor),
            };
        }
        self.sync_selection();
        for observer in &mut self.observers {
            observer.after_edit(&self.doc, &self.cursor, kind);
        }
        self.relayout_if_needed();
    }

    /// A cursor one step before the edit point, or `None` at the start of the document.
    ///
    /// Structural edits leave everything before the edit point where it was, so
    /// [`reposition`](Self::reposition) can walk from here to the new cursor location.
    pub(crate) fn anchor_before(&self) -> Option<Cursor> {
        let mut anchor = self.cursor;
        anchor.step_backward(&self.doc, true).then_some(anchor)
    }

    pub(crate) fn reposition(&mut self, anchor: Option<Cursor>, object: NodeId, offset: usize) {
        let mut cursor = match anchor {
            Some(mut anchor) => {
                anchor.relocate(&self.doc, self.doc.journal());
                anchor
            }
            None => Cursor::document_start(&self.doc),
        };
        if !cursor.advance_to(&self.doc, object, offset) {
            log::warn!("cursor target {object:?}:{offset} lies behind the edit point");
            cursor = Cursor::at(&self.doc, object, offset)
                .unwrap_or_else(|| Cursor::document_start(&self.doc));
        }
        self.cursor = cursor;
    }

    fn sync_selection(&mut self) {
        match self.selection() {
            Some(interval) => {
                self.doc.set_selection(Some(&interval));
                self.showing_selection = true;
            }
            None if self.showing_selection => {
                self.doc.set_selection(None);
                self.showing_selection = false;
            }
            None => {}
        }
    }

    // --- MARK: Motion ---

    fn motion(&mut self, f: impl FnOnce(&mut Cursor, &Document, bool) -> bool) -> bool {
        self.insertion_style = None;
        let moved = f(&mut self.cursor, &self.doc, self.options.exact_navigation);
        if moved {
            self.sync_selection();
        }
        moved
    }

    fn line_motion(
        &mut self,
        f: impl FnOnce(&mut Cursor, &Document) -> Result<bool, LayoutError>,
    ) -> Result<bool, LayoutError> {
        self.ensure_layout()?;
        self.insertion_style = None;
        let moved = f(&mut self.cursor, &self.doc)?;
        if moved {
            self.sync_selection();
        }
        Ok(moved)
    }

    /// Move one step forward. See [`Cursor::forward`].
    pub fn forward(&mut self) -> bool {
        self.motion(|c, doc, exact| c.forward(doc, exact))
    }

    /// Move one step backward.
    pub fn backward(&mut self) -> bool {
        self.motion(|c, doc, exact| c.backward(doc, exact))
    }

    /// Move one cluster right on screen.
    pub fn right(&mut self) -> bool {
        self.motion(|c, doc, _| c.right(doc))
    }

    /// Move one cluster left on screen.
    pub fn left(&mut self) -> bool {
        self.motion(|c, doc, _| c.left(doc))
    }

    /// Move past the next word.
    pub fn forward_word(&mut self) -> bool {
        self.motion(|c, doc, _| c.forward_word(doc))
    }

    /// Move to the start of the previous word.
    pub fn backward_word(&mut self) -> bool {
        self.motion(|c, doc, _| c.backward_word(doc))
    }

    /// Move to the start of the paragraph.
    pub fn beginning_of_paragraph(&mut self) -> bool {
        self.motion(|c, doc, _| c.beginning_of_paragraph(doc))
    }

    /// Move to the end of the paragraph.
    pub fn end_of_paragraph(&mut self) -> bool {
        self.motion(|c, doc, _| c.end_of_paragraph(doc))
    }

    /// Move to the start of the document.
    pub fn cursor_to_document_start(&mut self) -> bool {
        self.motion(|c, doc, _| c.beginning_of_document(doc))
    }

    /// Move to the end of the document.
    pub fn cursor_to_document_end(&mut self) -> bool {
        self.motion(|c, doc, _| c.end_of_document(doc))
    }

    /// Move to `(object, offset)`.
    pub fn jump_to(&mut self, object: NodeId, offset: usize) -> bool {
        self.motion(|c, doc, exact| c.jump_to(doc, object, offset, exact))
    }

    /// Move to the location `position` steps from the start.
    pub fn jump_to_position(&mut self, position: usize) -> bool {
        self.motion(|c, doc, _| c.jump_to_position(doc, position))
    }

    /// Move to the line above, laying the document out first if needed.
    pub fn up(&mut self) -> Result<bool, LayoutError> {
        self.line_motion(|c, doc| c.up(doc))
    }

    /// Move to the line below.
    pub fn down(&mut self) -> Result<bool, LayoutError> {
        self.line_motion(|c, doc| c.down(doc))
    }

    /// Move to the start of the visual line.
    pub fn beginning_of_line(&mut self) -> Result<bool, LayoutError> {
        self.line_motion(|c, doc| c.beginning_of_line(doc))
    }

    /// Move to the end of the visual line.
    pub fn end_of_line(&mut self) -> Result<bool, LayoutError> {
        self.line_motion(|c, doc| c.end_of_line(doc))
    }

    // --- MARK: Selection ---

    /// Start a selection at the cursor.
    pub fn set_mark(&mut self) {
        self.mark = Some(self.cursor);
        self.sync_selection();
    }

    /// Drop the selection.
    pub fn clear_mark(&mut self) {
        self.mark = None;
        self.sync_selection();
    }

    /// The span between the mark and the cursor, if it is not empty.
    pub fn selection(&self) -> Option<Interval> {
        let mark = self.mark?;
        Some(Interval::new(&self.doc, mark, self.cursor)).filter(|i| !i.is_empty())
    }

    /// Select the whole document.
    pub fn select_all(&mut self) {
        self.mark = Some(Cursor::document_start(&self.doc));
        self.cursor = Cursor::document_end(&self.doc);
        self.sync_selection();
    }

    // --- MARK: Clipboard ---

    /// Copy the selection to the clipboard. Returns `false` if nothing is selected.
    pub fn copy(&mut self) -> bool {
        let Some(interval) = self.selection() else {
            return false;
        };
        self.clipboard = Some(Fragment::copy(&self.doc, &interval));
        true
    }

    /// The clipboard content.
    pub fn clipboard(&self) -> Option<&Fragment> {
        self.clipboard.as_ref()
    }

    /// Replace the clipboard content.
    pub fn set_clipboard(&mut self, fragment: Fragment) {
        self.clipboard = Some(fragment);
    }

    // --- MARK: Style ---

    /// Style of the next typed text, overriding the style at the cursor until it moves.
    pub fn set_insertion_style(&mut self, style: TextStyle) {
        self.insertion_style = Some(style);
    }

    /// The style typed text will get.
    pub fn insertion_style(&self) -> TextStyle {
        match &self.insertion_style {
            Some(style) => style.clone(),
            None => self.doc.text_style_near(self.cursor.object()),
        }
    }

    /// Apply `attr` to the selected text. Returns `Ok(false)` if nothing is selected.
    pub fn apply_attribute(&mut self, attr: StyleAttr) -> Result<bool, run_spans::Error> {
        let Some(interval) = self.selection() else {
            return Ok(false);
        };
        self.begin_edit(EditKind::Style);
        let mut result = Ok(true);
        for (leaf, range) in interval.leaves(&self.doc) {
            if let Err(err) = self.doc.apply_attribute(leaf, range, attr.clone()) {
                result = Err(err);
                break;
            }
        }
        self.finish_edit(EditKind::Style);
        result
    }

    /// Re-check the spelling of every run. Returns the number of misspelled words.
    pub fn check_spelling(&mut self, checker: &mut impl SpellChecker) -> usize {
        let runs: Vec<NodeId> = self
            .doc
            .leaves(self.doc.root())
            .into_iter()
            .filter(|&id| self.doc.text(id).is_some())
            .collect();
        runs.into_iter()
            .map(|id| self.doc.check_spelling(id, checker))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use crate::editing::{Cursor, EditKind, EditObserver, Engine, EngineOptions};
    use crate::measure::FixedPainter;
    use crate::style::StyleAttr;
    use crate::tree::{Document, DocumentBuilder};

    fn engine(text: &str) -> Engine {
        let mut b = DocumentBuilder::new();
        b.text(text);
        Engine::new(b.build(), EngineOptions::default())
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<(bool, EditKind)>>>);

    impl EditObserver for Recorder {
        fn before_edit(&mut self, _: &Document, _: &Cursor, kind: EditKind) {
            self.0.borrow_mut().push((false, kind));
        }

        fn after_edit(&mut self, _: &Document, _: &Cursor, kind: EditKind) {
            self.0.borrow_mut().push((true, kind));
        }
    }

    #[test]
    fn observers_bracket_edits() {
        let mut engine = engine("abc");
        let recorder = Recorder::default();
        engine.add_observer(recorder.clone());
        engine.delete(1);
        assert_eq!(
            *recorder.0.borrow(),
            [
                (false, EditKind::Delete { count: 1 }),
                (true, EditKind::Delete { count: 1 })
            ]
        );
    }

    #[test]
    fn freezing_defers_relayout() {
        let mut engine = engine("abc");
        engine.set_painter(FixedPainter::default());
        assert!(engine.document().is_layout_clean());
        {
            let mut frozen = engine.freeze();
            frozen.insert_text("x");
            {
                let mut inner = frozen.freeze();
                inner.insert_text("y");
            }
            assert!(frozen.is_frozen());
            assert!(!frozen.document().is_layout_clean());
        }
        assert!(!engine.is_frozen());
        assert!(engine.document().is_layout_clean());
        assert_eq!(engine.document().plain_text(), "xyabc");
    }

    #[test]
    fn freeze_guards_report_their_depth() {
        let mut engine = engine("abc");
        let mut outer = engine.freeze();
        assert_eq!(format!("{outer:?}"), "FreezeGuard { depth: 1, .. }");
        let inner = outer.freeze();
        assert_eq!(format!("{inner:?}"), "FreezeGuard { depth: 2, .. }");
    }

    #[test]
    fn selection_flags_follow_the_mark() {
        let mut engine = engine("hello\nworld");
        engine.set_mark();
        engine.jump_to_position(3);
        let first = engine.document().first_leaf(engine.document().root()).unwrap();
        assert!(engine.document().node(first).is_selected());
        engine.clear_mark();
        assert!(!engine.document().node(first).is_selected());
    }

    #[test]
    fn attributes_apply_to_the_selection() {
        let mut engine = engine("hello");
        engine.jump_to_position(1);
        engine.set_mark();
        engine.jump_to_position(3);
        assert_eq!(engine.apply_attribute(StyleAttr::Bold(true)), Ok(true));
        let run = engine.document().first_leaf(engine.document().root()).unwrap();
        let run = engine.document().text(run).unwrap();
        assert!(run.style_at(1).flags.contains(crate::style::FontFlags::BOLD));
        assert!(!run.style_at(3).flags.contains(crate::style::FontFlags::BOLD));
    }

    #[test]
    fn motion_clears_the_insertion_style() {
        let mut engine = engine("ab");
        let mut style = engine.insertion_style();
        style.flags = crate::style::FontFlags::ITALIC;
        engine.set_insertion_style(style.clone());
        assert_eq!(engine.insertion_style(), style);
        engine.forward();
        assert_ne!(engine.insertion_style(), style);
    }
}
