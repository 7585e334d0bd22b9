// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use crate::layout::{LayoutCx, LayoutError, layout_block};
use crate::style::Direction;
use crate::tree::{CellSpan, Document, NodeId};

struct PlacedCell {
    id: NodeId,
    span: CellSpan,
    x: f32,
    width: f32,
    height: f32,
}

/// Lay out `table` across `width` at `top`. Columns share the width evenly; a row is as tall
/// as its tallest cell, and cells spanning rows stretch the last row they cover.
///
/// Returns the height of the table.
pub(crate) fn layout_table(
    doc: &mut Document,
    cx: &LayoutCx<'_>,
    table: NodeId,
    x: f32,
    top: f32,
    width: f32,
    dir: Direction,
) -> Result<f32, LayoutError> {
    let Some(grid) = doc.kind(table).as_table() else {
        return Ok(0.0);
    };
    let (rows, cols) = (grid.rows(), grid.cols());
    let border = f32::from(grid.border);
    let spacing = grid.spacing;
    let padding = grid.padding;
    let cells = grid.cells();
    let rtl = dir.is_rtl();

    let col_width = if cols == 0 {
        0.0
    } else {
        ((width - 2.0 * border - spacing * (cols as f32 + 1.0)) / cols as f32).max(0.0)
    };
    let mut placed = Vec::with_capacity(cells.len());
    let mut cell_min: f32 = 0.0;
    let mut cell_max: f32 = 0.0;
    for id in cells {
        let Some(span) = doc.kind(id).as_cell().map(|c| c.span) else {
            continue;
        };
        let offset = border + spacing + span.col as f32 * (col_width + spacing);
        let cell_width = span.cspan as f32 * col_width + span.cspan.saturating_sub(1) as f32 * spacing;
        let cell_x = if rtl {
            x + width - offset - cell_width
        } else {
            x + offset
        };
        let content = layout_block(
            doc,
            cx,
            id,
            cell_x + padding,
            padding,
            (cell_width - 2.0 * padding).max(0.0),
            dir,
        )?;
        let g = doc.node(id).geometry();
        cell_min = cell_min.max((g.min_width + 2.0 * padding) / span.cspan as f32);
        cell_max = cell_max.max((g.max_width + 2.0 * padding) / span.cspan as f32);
        placed.push(PlacedCell {
            id,
            span,
            x: cell_x,
            width: cell_width,
            height: content + 2.0 * padding,
        });
    }

    let mut row_heights = alloc::vec![0.0_f32; rows];
    for cell in placed.iter().filter(|c| c.span.rspan == 1) {
        if let Some(h) = row_heights.get_mut(cell.span.row) {
            *h = h.max(cell.height);
        }
    }
    for cell in placed.iter().filter(|c| c.span.rspan > 1) {
        let end = (cell.span.row + cell.span.rspan).min(rows);
        let covered = &row_heights[cell.span.row..end];
        let available =
            covered.iter().sum::<f32>() + spacing * covered.len().saturating_sub(1) as f32;
        if cell.height > available {
            row_heights[end - 1] += cell.height - available;
        }
    }
    let mut row_tops = Vec::with_capacity(rows);
    let mut y = top + border + spacing;
    for h in &row_heights {
        row_tops.push(y);
        y += h + spacing;
    }
    let height = y + border - top;

    for cell in &placed {
        let end = (cell.span.row + cell.span.rspan).min(rows);
        let spanned = row_heights[cell.span.row..end].iter().sum::<f32>()
            + spacing * (end - cell.span.row).saturating_sub(1) as f32;
        let row_top = row_tops[cell.span.row];
        doc.translate_subtree(cell.id, row_top);
        let g = &mut doc.node_mut(cell.id).geometry;
        g.x = cell.x;
        g.width = cell.width;
        g.y = row_top + spanned;
        g.ascent = spanned;
        g.descent = 0.0;
    }

    let frame = 2.0 * border + spacing * (cols as f32 + 1.0);
    let g = &mut doc.node_mut(table).geometry;
    g.x = x;
    g.y = top + height;
    g.ascent = height;
    g.descent = 0.0;
    g.width = width;
    g.min_width = cell_min * cols as f32 + frame;
    g.max_width = cell_max * cols as f32 + frame;
    g.pref_width = g.max_width.min(width);
    log::trace!("table {table:?}: {rows}x{cols}, height {height}");
    Ok(height)
}

#[cfg(test)]
mod tests {
    use crate::measure::FixedPainter;
    use crate::style::{Direction, FlowStyle};
    use crate::tree::{CellSpan, DocumentBuilder, NodeType, Table};

    #[test]
    fn columns_share_the_width() {
        let mut b = DocumentBuilder::new();
        b.begin_table(Table::new(2, 2));
        b.begin_cell(CellSpan::at(0, 0)).text("a").end_cell();
        b.begin_cell(CellSpan::at(0, 1)).text("b").end_cell();
        b.begin_cell(CellSpan::at(1, 0)).text("c\nd").end_cell();
        b.end_table();
        let mut doc = b.build();
        doc.set_painter(FixedPainter::default());
        doc.relayout().unwrap();
        let leaves = doc.leaves(doc.root());
        let geometry = |i: usize| *doc.node(leaves[i]).geometry();
        assert_eq!(geometry(0).x, 0.0);
        assert_eq!(geometry(1).x, 300.0);
        // The second row starts below the first and holds two lines.
        assert_eq!(geometry(2).top(), 16.0);
        assert_eq!(geometry(3).top(), 32.0);
        let table = doc.enclosing(leaves[0], NodeType::Table).unwrap();
        assert_eq!(doc.node(table).geometry().height(), 48.0);
    }

    #[test]
    fn rtl_tables_mirror_columns() {
        let mut b = DocumentBuilder::new();
        b.set_flow_style(FlowStyle {
            dir: Direction::Rtl,
            ..FlowStyle::default()
        });
        b.begin_table(Table::new(1, 2));
        b.begin_cell(CellSpan::at(0, 0)).text("a").end_cell();
        b.begin_cell(CellSpan::at(0, 1)).text("b").end_cell();
        b.end_table();
        let mut doc = b.build();
        doc.set_painter(FixedPainter::default());
        doc.relayout().unwrap();
        let leaves = doc.leaves(doc.root());
        let first_cell = doc.parent(doc.parent(leaves[0]).unwrap()).unwrap();
        assert_eq!(doc.node(first_cell).geometry().x, 300.0);
    }
}
