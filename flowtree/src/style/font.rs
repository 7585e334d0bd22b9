// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Set of boolean font properties.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontFlags(u8);

impl FontFlags {
    /// Bold weight.
    pub const BOLD: Self = Self(1 << 0);
    /// Italic slant.
    pub const ITALIC: Self = Self(1 << 1);
    /// Underlined.
    pub const UNDERLINE: Self = Self(1 << 2);
    /// Struck through.
    pub const STRIKEOUT: Self = Self(1 << 3);
    /// Fixed-width face.
    pub const FIXED: Self = Self(1 << 4);

    /// No flags.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Returns `true` if every flag in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Turns the flags in `other` on or off.
    pub fn set(&mut self, other: Self, on: bool) {
        if on {
            self.0 |= other.0;
        } else {
            self.0 &= !other.0;
        }
    }

    /// Returns `self` with the flags in `other` turned on.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Logical font size, from 1 (smallest) to 7 (largest).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontSize(u8);

impl FontSize {
    /// The smallest size.
    pub const MIN: u8 = 1;
    /// The largest size.
    pub const MAX: u8 = 7;

    /// Creates a size, clamping to the supported range.
    pub fn new(size: u8) -> Self {
        Self(size.clamp(Self::MIN, Self::MAX))
    }

    /// Returns the size as a number.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Scale factor relative to the default size.
    pub fn scale(self) -> f32 {
        match self.0 {
            1 => 0.6,
            2 => 0.8,
            3 => 1.0,
            4 => 1.2,
            5 => 1.5,
            6 => 2.0,
            _ => 3.0,
        }
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self(3)
    }
}
