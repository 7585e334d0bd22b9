// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry: relayout of a document and cursor placement.
//!
//! Layout is deliberately simple. Containers stack their children vertically, flows fill
//! lines greedily at the break opportunities reported by the painter, and tables divide their
//! width evenly between columns. Right-to-left flows and tables are mirrored.

mod flow;
mod table;

use alloc::vec::Vec;
use core::fmt;

use crate::measure::{MeasureError, Painter};
use crate::style::Direction;
use crate::tree::{ClueKind, Dirty, Document, NodeId, NodeKind};
use crate::util::nearly_eq;

/// Parameters of [`Document::relayout`].
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutOptions {
    /// Width available to the root container.
    pub width: f32,
    /// Height of a horizontal rule, before its own thickness is added.
    pub rule_height: f32,
    /// Size of an image that does not state one.
    pub image_size: (f32, f32),
    /// Horizontal offset per indentation level.
    pub indent_step: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: 600.0,
            rule_height: 8.0,
            image_size: (32.0, 32.0),
            indent_step: 24.0,
        }
    }
}

/// Failure of an operation that needs geometry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// No painter is attached to the document.
    NoPainter,
    /// The document changed since the last relayout.
    Stale,
    /// The painter failed to measure some text.
    Measure(MeasureError),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPainter => f.write_str("no painter is attached"),
            Self::Stale => f.write_str("layout is out of date"),
            Self::Measure(err) => write!(f, "{err}"),
        }
    }
}

impl core::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Measure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MeasureError> for LayoutError {
    fn from(err: MeasureError) -> Self {
        Self::Measure(err)
    }
}

/// Where to draw the cursor.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CursorGeometry {
    /// Horizontal position.
    pub x: f32,
    /// Baseline of the line holding the cursor.
    pub y: f32,
    /// Line ascent.
    pub ascent: f32,
    /// Line descent.
    pub descent: f32,
}

impl CursorGeometry {
    /// Top of the line box.
    pub fn top(&self) -> f32 {
        self.y - self.ascent
    }

    /// Bottom of the line box.
    pub fn bottom(&self) -> f32 {
        self.y + self.descent
    }

    /// Returns `true` if the baseline of `other` lies within this line box.
    pub fn same_line(&self, other: &Self) -> bool {
        (self.top()..=self.bottom()).contains(&other.y) || nearly_eq(self.y, other.y)
    }
}

pub(crate) struct LayoutCx<'a> {
    pub(crate) painter: &'a dyn Painter,
    pub(crate) options: &'a LayoutOptions,
}

impl Document {
    /// Recompute the geometry of every node.
    pub fn relayout(&mut self) -> Result<(), LayoutError> {
        let painter = self.painter.take().ok_or(LayoutError::NoPainter)?;
        let options = self.layout.clone();
        let result = {
            let cx = LayoutCx {
                painter: &*painter,
                options: &options,
            };
            let root = self.root();
            layout_block(self, &cx, root, 0.0, 0.0, options.width, Direction::Inherit)
        };
        self.painter = Some(painter);
        let height = result?;
        let ids: Vec<NodeId> = self.arena.ids().collect();
        for id in ids {
            self.node_mut(id).dirty = Dirty::CLEAN;
        }
        self.layout_clean = true;
        log::trace!("relayout: {} nodes, height {height}", self.len());
        Ok(())
    }

    /// Fail unless geometry is available and current.
    pub(crate) fn require_layout(&self) -> Result<&dyn Painter, LayoutError> {
        let painter = self.painter.as_deref().ok_or(LayoutError::NoPainter)?;
        if self.layout_clean {
            Ok(painter)
        } else {
            Err(LayoutError::Stale)
        }
    }

    /// Geometry of the cursor location `(object, offset)`.
    pub fn cursor_geometry(
        &self,
        object: NodeId,
        offset: usize,
    ) -> Result<CursorGeometry, LayoutError> {
        let painter = self.require_layout()?;
        let node = self.node(object);
        let geometry = *node.geometry();
        match node.kind() {
            NodeKind::Text(run) => {
                let slaves = run.slaves();
                let Some(slave) = slaves
                    .iter()
                    .enumerate()
                    .find(|(i, s)| {
                        s.start <= offset && (offset < s.end() || *i == slaves.len() - 1)
                    })
                    .map(|(_, s)| s)
                else {
                    return Ok(CursorGeometry {
                        x: geometry.x,
                        y: geometry.y,
                        ascent: geometry.ascent,
                        descent: geometry.descent,
                    });
                };
                let prefix = run.copy_range(slave.start..offset.min(slave.end()));
                let advance = painter.measure(prefix.text(), run.style())?.width;
                let x = if slave.rtl {
                    slave.x + slave.width - advance
                } else {
                    slave.x + advance
                };
                Ok(CursorGeometry {
                    x,
                    y: slave.y,
                    ascent: slave.ascent,
                    descent: slave.descent,
                })
            }
            _ => {
                let rtl = self.resolved_direction(object).is_rtl();
                let at_end = (offset > 0) != rtl;
                Ok(CursorGeometry {
                    x: if at_end {
                        geometry.x + geometry.width
                    } else {
                        geometry.x
                    },
                    y: geometry.y,
                    ascent: geometry.ascent,
                    descent: geometry.descent,
                })
            }
        }
    }

    /// The direction in effect at `id`: the nearest explicit direction among `id` and its
    /// ancestors, or the direction of the content of its paragraph.
    pub fn resolved_direction(&self, id: NodeId) -> Direction {
        let explicit = core::iter::once(id)
            .chain(self.ancestors(id))
            .map(|a| self.kind(a).direction())
            .find(|d| *d != Direction::Inherit);
        if let Some(dir) = explicit {
            return dir;
        }
        let flow = self.enclosing_flow(id).unwrap_or(id);
        flow::content_direction(self, flow).or(Direction::Ltr)
    }

    pub(crate) fn translate_subtree(&mut self, id: NodeId, dy: f32) {
        for id in self.descendants(id) {
            let node = self.node_mut(id);
            node.geometry.y += dy;
            if let NodeKind::Text(run) = &mut node.kind {
                for slave in &mut run.slaves {
                    slave.y += dy;
                }
            }
        }
    }
}

/// Stack the children of the container `id` vertically. Returns its height.
pub(crate) fn layout_block(
    doc: &mut Document,
    cx: &LayoutCx<'_>,
    id: NodeId,
    x: f32,
    top: f32,
    width: f32,
    dir: Direction,
) -> Result<f32, LayoutError> {
    let dir = doc.kind(id).direction().or(dir);
    let indent = match doc.kind(id) {
        NodeKind::Clue(clue) if clue.kind == ClueKind::Block => {
            cx.options.indent_step * f32::from(clue.indent.max(1))
        }
        _ => 0.0,
    };
    let (inner_x, inner_width) = if dir.is_rtl() {
        (x, (width - indent).max(0.0))
    } else {
        (x + indent, (width - indent).max(0.0))
    };
    let mut y = top;
    let children: Vec<NodeId> = doc.children(id).collect();
    let mut min_width: f32 = 0.0;
    let mut max_width: f32 = 0.0;
    for child in children {
        let height = match doc.kind(child) {
            NodeKind::Flow(_) => flow::layout_flow(doc, cx, child, inner_x, y, inner_width, dir)?,
            NodeKind::Clue(_) => layout_block(doc, cx, child, inner_x, y, inner_width, dir)?,
            _ => 0.0,
        };
        let g = doc.node(child).geometry();
        min_width = min_width.max(g.min_width + indent);
        max_width = max_width.max(g.max_width + indent);
        y += height;
    }
    let height = y - top;
    let g = &mut doc.node_mut(id).geometry;
    g.x = x;
    g.y = top + height;
    g.ascent = height;
    g.descent = 0.0;
    g.width = width;
    g.min_width = min_width;
    g.max_width = max_width;
    g.pref_width = max_width;
    Ok(height)
}
