// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The document tree.
//!
//! Nodes live in an arena owned by the [`Document`] and link to each other through
//! [`NodeId`]s: a parent, the previous and next siblings, and the first and last children.
//!
//! The shape of a well-formed document:
//!
//! - the root is a vertical [`Clue`];
//! - clues, cells and frames hold flows and block clues;
//! - flows hold leaves and tables, and always at least one child;
//! - tables hold cells, and every slot of a table's grid refers to one of its cells.
//!
//! [`Document::check_invariants`] verifies all of this.

mod arena;
mod builder;
mod check;
mod document;
mod geometry;
mod node;
mod ops;
mod relocation;
mod serialize;
mod spell;
mod table;
mod walk;

pub use arena::NodeId;
pub use builder::DocumentBuilder;
pub use check::TreeError;
pub use document::Document;
pub use geometry::{Dirty, Geometry};
pub use node::{Cell, Clue, ClueKind, Embedded, Frame, Image, Node, NodeKind, NodeType, Rule};
pub use relocation::Relocation;
pub use serialize::WalkEvent;
pub use spell::SpellChecker;
pub use table::{CellSpan, Table};
pub use walk::{Ancestors, Children};

pub(crate) use arena::Arena;
