// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Editable rich-text documents.
//!
//! A [`Document`] is a tree of typed nodes: vertical and block containers, paragraphs
//! ("flows"), text runs, rules, images, embedded widgets, tables with their cells, and frames.
//! Leaves hold content; containers arrange their children. Each text run carries style
//! attribute spans, hyperlinks and spell-check marks (see [`run_spans`]).
//!
//! An [`Engine`] owns a document together with a [`Cursor`], an optional mark, a clipboard and
//! an insertion style, and implements the editing operations: deleting, inserting text and
//! paragraphs, cutting, copying, pasting, splitting containers and merging siblings. Bursts of
//! mutation are bracketed by [`Engine::freeze`], which defers relayout until the outermost
//! guard is dropped.
//!
//! Geometry is produced by [`Document::relayout`] with the help of a [`Painter`], the seam to
//! whatever measures text. [`FixedPainter`] is a headless measurer with constant advances.
//!
//! ## Example
//!
//! ```
//! use flowtree::{Document, Engine, EngineOptions};
//!
//! let mut engine = Engine::new(Document::new(), EngineOptions::default());
//! engine.insert_text("Hello world");
//! engine.cursor_to_document_start();
//! engine.delete(6);
//! assert_eq!(engine.document().plain_text(), "world");
//! ```
//!
//! ## Features
//!
//! - `std` (enabled by default): Enables `std` support in the dependencies.

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

extern crate alloc;

pub use run_spans;

mod util;

pub mod analysis;
pub mod editing;
pub mod layout;
pub mod measure;
pub mod style;
pub mod text;
pub mod tree;

pub use editing::{
    Cursor, EditKind, EditObserver, Engine, EngineOptions, Fragment, FreezeGuard, Interval,
};
pub use layout::{CursorGeometry, LayoutError, LayoutOptions};
pub use measure::{FixedPainter, MeasureError, Painter, TextMetrics};
pub use style::{Direction, FlowStyle, StyleAttr, TextStyle};
pub use text::{Slave, TextRun};
pub use tree::{Document, Node, NodeId, NodeKind, NodeType, Relocation};
