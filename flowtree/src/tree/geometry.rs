// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Cached geometry of a node.
///
/// `y` is a baseline. Containers report their whole height as ascent with zero descent, so for
/// them `y` is the bottom edge.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Geometry {
    /// Left edge.
    pub x: f32,
    /// Baseline.
    pub y: f32,
    /// Extent above the baseline.
    pub ascent: f32,
    /// Extent below the baseline.
    pub descent: f32,
    /// Allocated width.
    pub width: f32,
    /// Narrowest width the node can be laid out in without overflow.
    pub min_width: f32,
    /// Width of the node laid out without wrapping.
    pub max_width: f32,
    /// Width the node asks for.
    pub pref_width: f32,
}

impl Geometry {
    /// Total height.
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    /// Top edge.
    pub fn top(&self) -> f32 {
        self.y - self.ascent
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.descent
    }
}

/// Which parts of a node's cached geometry are out of date.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dirty(u8);

impl Dirty {
    /// Position must be recomputed.
    pub const POSITION: Self = Self(1 << 0);
    /// Size must be recomputed.
    pub const SIZE: Self = Self(1 << 1);
    /// Minimum width must be recomputed.
    pub const MIN_WIDTH: Self = Self(1 << 2);
    /// Maximum width must be recomputed.
    pub const MAX_WIDTH: Self = Self(1 << 3);
    /// Preferred width must be recomputed.
    pub const PREF_WIDTH: Self = Self(1 << 4);
    /// Everything.
    pub const ALL: Self = Self(0b1_1111);
    /// Nothing.
    pub const CLEAN: Self = Self(0);

    /// Returns `true` if nothing needs recomputing.
    pub fn is_clean(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every bit of `other` is set.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set the bits of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl Default for Dirty {
    fn default() -> Self {
        Self::ALL
    }
}
