// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::editing::Cursor;
use crate::tree::Document;

/// The edit an [`EditObserver`] is told about.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EditKind {
    /// Characters are deleted at the cursor.
    Delete {
        /// Number of steps requested.
        count: usize,
    },
    /// Text is typed at the cursor.
    Insert,
    /// Containers around the cursor are split.
    Split {
        /// Number of container levels.
        levels: usize,
    },
    /// The paragraph holding the cursor is merged with the next one.
    MergeDown,
    /// The selection is cut.
    Cut,
    /// A fragment is pasted at the cursor.
    Paste,
    /// A style attribute is applied to the selection.
    Style,
}

/// Hook run around every mutating engine operation, as an undo stack would use it.
///
/// Both methods see the document and the cursor as they are at that moment. The default
/// implementations do nothing.
pub trait EditObserver {
    /// Called before the document changes.
    fn before_edit(&mut self, doc: &Document, cursor: &Cursor, kind: EditKind) {
        let _ = (doc, cursor, kind);
    }

    /// Called once the edit is complete.
    fn after_edit(&mut self, doc: &Document, cursor: &Cursor, kind: EditKind) {
        let _ = (doc, cursor, kind);
    }
}
