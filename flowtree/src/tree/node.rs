// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::sync::Arc;

use hashbrown::HashMap;

use crate::style::{Direction, FlowStyle};
use crate::text::TextRun;
use crate::tree::{CellSpan, Dirty, Geometry, NodeId, Table};

/// The variant of a node, without its payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// A styled text run.
    Text,
    /// A horizontal rule.
    Rule,
    /// An image.
    Image,
    /// An embedded widget.
    Embedded,
    /// A generic container.
    Clue,
    /// A paragraph.
    Flow,
    /// A table.
    Table,
    /// A table cell.
    Cell,
    /// A frame around a nested document.
    Frame,
}

/// A horizontal rule.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Rule {
    /// Fixed length, or `None` to span the line.
    pub length: Option<f32>,
    /// Thickness.
    pub size: u8,
    /// Drawn with a shaded bevel.
    pub shade: bool,
}

/// An image.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Image {
    /// Source location.
    pub src: Arc<str>,
    /// Requested width.
    pub width: Option<f32>,
    /// Requested height.
    pub height: Option<f32>,
    /// Replacement text.
    pub alt: Option<Arc<str>>,
}

/// A widget embedded in the text, such as a form control.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Embedded {
    /// Widget class.
    pub class_id: Arc<str>,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

/// How a generic container arranges its children.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClueKind {
    /// Stacks children top to bottom.
    #[default]
    Vertical,
    /// An indented block, such as a quotation.
    Block,
}

/// A generic container.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Clue {
    /// Arrangement.
    pub kind: ClueKind,
    /// Direction inherited by the children.
    pub dir: Direction,
    /// Indentation level of a block.
    pub indent: u8,
}

/// A table cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Placement in the table grid.
    pub span: CellSpan,
    /// A header cell.
    pub heading: bool,
    /// Direction of the cell's content.
    pub dir: Direction,
}

/// A frame holding a nested document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    /// Source of the nested document.
    pub src: Arc<str>,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

/// The variant-specific part of a node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// A styled text run.
    Text(TextRun),
    /// A horizontal rule.
    Rule(Rule),
    /// An image.
    Image(Image),
    /// An embedded widget.
    Embedded(Embedded),
    /// A generic container.
    Clue(Clue),
    /// A paragraph.
    Flow(FlowStyle),
    /// A table.
    Table(Table),
    /// A table cell.
    Cell(Cell),
    /// A frame.
    Frame(Frame),
}

impl NodeKind {
    /// The variant.
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Text(_) => NodeType::Text,
            Self::Rule(_) => NodeType::Rule,
            Self::Image(_) => NodeType::Image,
            Self::Embedded(_) => NodeType::Embedded,
            Self::Clue(_) => NodeType::Clue,
            Self::Flow(_) => NodeType::Flow,
            Self::Table(_) => NodeType::Table,
            Self::Cell(_) => NodeType::Cell,
            Self::Frame(_) => NodeType::Frame,
        }
    }

    /// Returns `true` for variants that hold children.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Self::Clue(_) | Self::Flow(_) | Self::Table(_) | Self::Cell(_) | Self::Frame(_)
        )
    }

    /// Returns `true` for containers that editing never crosses.
    pub fn is_isolating(&self) -> bool {
        matches!(self, Self::Cell(_) | Self::Frame(_))
    }

    /// Number of cursor units the node contributes: characters for text, one for every other
    /// leaf and zero for containers.
    pub fn length(&self) -> usize {
        match self {
            Self::Text(run) => run.len_chars(),
            _ if self.is_container() => 0,
            _ => 1,
        }
    }

    /// Returns `true` if the cursor may rest inside the node.
    pub fn accepts_cursor(&self) -> bool {
        !self.is_container()
    }

    /// The direction the node sets for its content.
    pub fn direction(&self) -> Direction {
        match self {
            Self::Clue(clue) => clue.dir,
            Self::Flow(style) => style.dir,
            Self::Cell(cell) => cell.dir,
            _ => Direction::Inherit,
        }
    }

    /// A copy of the node's own state.
    ///
    /// Children are not part of the payload; a duplicated table starts with an empty grid.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        match self {
            Self::Text(run) => {
                let mut copy = run.clone();
                copy.clear_slaves();
                Self::Text(copy)
            }
            Self::Table(table) => Self::Table(table.duplicate()),
            other => other.clone(),
        }
    }

    /// The text run, for text nodes.
    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            Self::Text(run) => Some(run),
            _ => None,
        }
    }

    /// The paragraph style, for flows.
    pub fn as_flow(&self) -> Option<&FlowStyle> {
        match self {
            Self::Flow(style) => Some(style),
            _ => None,
        }
    }

    /// The grid, for tables.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    /// The cell payload, for cells.
    pub fn as_cell(&self) -> Option<&Cell> {
        match self {
            Self::Cell(cell) => Some(cell),
            _ => None,
        }
    }
}

/// A node of a [`Document`](crate::Document).
///
/// Structural links are ids into the owning document's arena, so parent back-references never
/// own anything.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) head: Option<NodeId>,
    pub(crate) tail: Option<NodeId>,
    pub(crate) kind: NodeKind,
    pub(crate) geometry: Geometry,
    pub(crate) dirty: Dirty,
    pub(crate) selected: bool,
    pub(crate) data: HashMap<String, String>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            parent: None,
            prev: None,
            next: None,
            head: None,
            tail: None,
            kind,
            geometry: Geometry::default(),
            dirty: Dirty::ALL,
            selected: false,
            data: HashMap::new(),
        }
    }

    /// The enclosing container.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Previous sibling.
    pub fn prev(&self) -> Option<NodeId> {
        self.prev
    }

    /// Next sibling.
    pub fn next(&self) -> Option<NodeId> {
        self.next
    }

    /// First child.
    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    /// Last child.
    pub fn tail(&self) -> Option<NodeId> {
        self.tail
    }

    /// Variant payload.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Cached geometry.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Outstanding layout work.
    pub fn dirty(&self) -> Dirty {
        self.dirty
    }

    /// Whether the node lies inside the selection.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Side data attached by the embedder.
    pub fn data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}
