// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use crate::tree::NodeId;

/// Placement of a cell in its table's grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellSpan {
    /// First row.
    pub row: usize,
    /// First column.
    pub col: usize,
    /// Number of rows covered, at least one.
    pub rspan: usize,
    /// Number of columns covered, at least one.
    pub cspan: usize,
}

impl CellSpan {
    /// A single-slot cell.
    pub fn at(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            rspan: 1,
            cspan: 1,
        }
    }

    /// Returns `true` if the cell covers slot `(row, col)`.
    pub fn covers(&self, row: usize, col: usize) -> bool {
        (self.row..self.row + self.rspan).contains(&row)
            && (self.col..self.col + self.cspan).contains(&col)
    }
}

/// A table's rectangular grid of cell references.
///
/// Every slot refers to the cell covering it; a cell spanning several slots appears in each
/// of them. The grid does not own the cells, which are children of the table node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    rows: usize,
    cols: usize,
    grid: Vec<Option<NodeId>>,
    /// Border width.
    pub border: u8,
    /// Space between cells.
    pub spacing: f32,
    /// Space between a cell's edge and its content.
    pub padding: f32,
}

impl Table {
    /// Creates an empty grid of `rows` by `cols` slots.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            grid: alloc::vec![None; rows * cols],
            ..Self::default()
        }
    }

    /// Same attributes, empty grid.
    pub(crate) fn duplicate(&self) -> Self {
        Self {
            rows: 0,
            cols: 0,
            grid: Vec::new(),
            ..self.clone()
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The cell covering slot `(row, col)`.
    pub fn cell_at(&self, row: usize, col: usize) -> Option<NodeId> {
        if row < self.rows && col < self.cols {
            self.grid[row * self.cols + col]
        } else {
            None
        }
    }

    /// Returns `true` if every slot refers to a cell.
    pub fn is_filled(&self) -> bool {
        self.grid.iter().all(Option::is_some)
    }

    /// Distinct cells in row-major order of their anchor slot.
    pub fn cells(&self) -> Vec<NodeId> {
        let mut cells: Vec<NodeId> = Vec::new();
        for id in self.grid.iter().flatten() {
            if !cells.contains(id) {
                cells.push(*id);
            }
        }
        cells
    }

    fn grow(&mut self, rows: usize, cols: usize) {
        if rows <= self.rows && cols <= self.cols {
            return;
        }
        let new_rows = rows.max(self.rows);
        let new_cols = cols.max(self.cols);
        let mut grid = alloc::vec![None; new_rows * new_cols];
        for r in 0..self.rows {
            for c in 0..self.cols {
                grid[r * new_cols + c] = self.grid[r * self.cols + c];
            }
        }
        self.rows = new_rows;
        self.cols = new_cols;
        self.grid = grid;
    }

    /// Occupy the slots of `span` with `cell`, growing the grid as needed.
    ///
    /// Panics if a slot is already occupied by another cell.
    pub(crate) fn place(&mut self, cell: NodeId, span: CellSpan) {
        self.grow(span.row + span.rspan, span.col + span.cspan);
        for r in span.row..span.row + span.rspan {
            for c in span.col..span.col + span.cspan {
                let slot = &mut self.grid[r * self.cols + c];
                assert!(
                    slot.is_none_or(|id| id == cell),
                    "grid slot ({r}, {c}) is already occupied"
                );
                *slot = Some(cell);
            }
        }
    }

    /// Insert an empty column before column `at`.
    pub(crate) fn insert_column(&mut self, at: usize) {
        let old_cols = self.cols;
        let new_cols = old_cols + 1;
        let mut grid = alloc::vec![None; self.rows * new_cols];
        for r in 0..self.rows {
            for c in 0..old_cols {
                let to = if c < at { c } else { c + 1 };
                grid[r * new_cols + to] = self.grid[r * old_cols + c];
            }
        }
        self.cols = new_cols;
        self.grid = grid;
    }

    /// Replace every reference according to `map`.
    pub(crate) fn remap(&mut self, mut map: impl FnMut(NodeId) -> Option<NodeId>) {
        for slot in &mut self.grid {
            *slot = slot.and_then(&mut map);
        }
    }
}
