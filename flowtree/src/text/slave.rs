// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// A positioned view over a character range of a text run, one per line the run occupies.
///
/// Slaves are derived data: layout regenerates them and edits of the run discard them.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Slave {
    /// First character of the view.
    pub start: usize,
    /// Number of characters in the view.
    pub len: usize,
    /// Left edge.
    pub x: f32,
    /// Baseline.
    pub y: f32,
    /// Advance width.
    pub width: f32,
    /// Line ascent.
    pub ascent: f32,
    /// Line descent.
    pub descent: f32,
    /// The line runs right to left.
    pub rtl: bool,
}

impl Slave {
    /// One past the last character of the view.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Returns `true` if the cursor offset `offset` lies within this view, ends included.
    pub fn contains_offset(&self, offset: usize) -> bool {
        (self.start..=self.end()).contains(&offset)
    }

    /// Top of the line box.
    pub fn top(&self) -> f32 {
        self.y - self.ascent
    }

    /// Bottom of the line box.
    pub fn bottom(&self) -> f32 {
        self.y + self.descent
    }
}
