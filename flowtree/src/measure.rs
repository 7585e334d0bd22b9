// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The measurement seam between documents and whatever renders them.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::analysis::{self, LogAttr};
use crate::style::{Direction, FontFlags, TextStyle};

/// Extents of a measured string.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// Advance width.
    pub width: f32,
    /// Distance from the baseline to the top of the line box.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line box.
    pub descent: f32,
}

/// A painter could not measure some text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeasureError {
    reason: String,
}

impl MeasureError {
    /// Creates an error with a human readable reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The reason given by the painter.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for MeasureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "measurement failed: {}", self.reason)
    }
}

impl core::error::Error for MeasureError {}

/// Measures text for layout and answers text analysis queries.
///
/// Only [`measure`](Self::measure) is required; the analysis queries default to the
/// implementations in [`analysis`](crate::analysis).
pub trait Painter {
    /// Measures `text` rendered with `style`.
    ///
    /// The ascent and descent of an empty string are those of the style's line box.
    fn measure(&self, text: &str, style: &TextStyle) -> Result<TextMetrics, MeasureError>;

    /// Boundary attributes for every position of `text`.
    fn cursor_position_attrs(&self, text: &str) -> Vec<LogAttr> {
        analysis::log_attrs(text)
    }

    /// Direction of the first strong character of `text`.
    fn base_direction(&self, text: &str) -> Direction {
        analysis::base_direction(text)
    }
}

/// A headless painter giving every character the same advance.
///
/// Sizes scale the advance and the line box; bold adds a tenth of the advance.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedPainter {
    /// Advance of one character at the default size.
    pub advance: f32,
    /// Ascent at the default size.
    pub ascent: f32,
    /// Descent at the default size.
    pub descent: f32,
}

impl FixedPainter {
    /// Creates a painter with the given advance and line box.
    pub fn new(advance: f32, ascent: f32, descent: f32) -> Self {
        Self {
            advance,
            ascent,
            descent,
        }
    }
}

impl Default for FixedPainter {
    fn default() -> Self {
        Self::new(8.0, 12.0, 4.0)
    }
}

impl Painter for FixedPainter {
    fn measure(&self, text: &str, style: &TextStyle) -> Result<TextMetrics, MeasureError> {
        let scale = style.size.scale();
        let mut advance = self.advance * scale;
        if style.flags.contains(FontFlags::BOLD) {
            advance *= 1.1;
        }
        let count = text.chars().count() as f32;
        Ok(TextMetrics {
            width: advance * count,
            ascent: self.ascent * scale,
            descent: self.descent * scale,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{FixedPainter, Painter};
    use crate::style::{FontSize, StyleAttr, TextStyle};

    #[test]
    fn fixed_painter_counts_characters() {
        let painter = FixedPainter::default();
        let m = painter.measure("héllo", &TextStyle::default()).unwrap();
        assert_eq!(m.width, 40.0);
        assert_eq!((m.ascent, m.descent), (12.0, 4.0));
        let empty = painter.measure("", &TextStyle::default()).unwrap();
        assert_eq!(empty.width, 0.0);
        assert_eq!(empty.ascent, 12.0);
    }

    #[test]
    fn larger_sizes_scale_the_line_box() {
        let painter = FixedPainter::default();
        let style = TextStyle::default().with(&StyleAttr::Size(FontSize::new(6)));
        let m = painter.measure("ab", &style).unwrap();
        assert_eq!(m.width, 32.0);
        assert_eq!(m.ascent, 24.0);
    }
}
