// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Character and paragraph styles.

mod font;

use alloc::sync::Arc;

pub use font::{FontFlags, FontSize};

/// Text direction of a container or paragraph.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Take the direction from the enclosing container, or from the content.
    #[default]
    Inherit,
    /// Left to right.
    Ltr,
    /// Right to left.
    Rtl,
}

impl Direction {
    /// Returns `true` for [`Direction::Rtl`].
    pub fn is_rtl(self) -> bool {
        self == Self::Rtl
    }

    /// Returns `self` unless it is [`Direction::Inherit`], in which case `fallback` is returned.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        match self {
            Self::Inherit => fallback,
            dir => dir,
        }
    }
}

/// An sRGB color with alpha.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// The style identity of a text run.
///
/// Two adjacent runs can only merge when their styles compare equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextStyle {
    /// Bold, italic and the other font flags.
    pub flags: FontFlags,
    /// Logical font size.
    pub size: FontSize,
    /// Foreground color, or `None` for the document default.
    pub color: Option<Color>,
    /// Font face name, or `None` for the document default.
    pub face: Option<Arc<str>>,
}

impl TextStyle {
    /// Applies a single attribute to this style.
    pub fn apply(&mut self, attr: &StyleAttr) {
        match attr {
            StyleAttr::Bold(on) => self.flags.set(FontFlags::BOLD, *on),
            StyleAttr::Italic(on) => self.flags.set(FontFlags::ITALIC, *on),
            StyleAttr::Underline(on) => self.flags.set(FontFlags::UNDERLINE, *on),
            StyleAttr::Strikeout(on) => self.flags.set(FontFlags::STRIKEOUT, *on),
            StyleAttr::Fixed(on) => self.flags.set(FontFlags::FIXED, *on),
            StyleAttr::Size(size) => self.size = *size,
            StyleAttr::Color(color) => self.color = Some(*color),
            StyleAttr::Face(face) => self.face = Some(face.clone()),
        }
    }

    /// Returns a copy of this style with `attr` applied.
    #[must_use]
    pub fn with(mut self, attr: &StyleAttr) -> Self {
        self.apply(attr);
        self
    }
}

/// A style attribute applied over part of a run.
///
/// When several attributes covering the same text set the same property, the one applied last
/// wins.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StyleAttr {
    /// Turns bold on or off.
    Bold(bool),
    /// Turns italic on or off.
    Italic(bool),
    /// Turns underline on or off.
    Underline(bool),
    /// Turns strike-through on or off.
    Strikeout(bool),
    /// Turns fixed-width on or off.
    Fixed(bool),
    /// Sets the logical size.
    Size(FontSize),
    /// Sets the color.
    Color(Color),
    /// Sets the face.
    Face(Arc<str>),
}

/// The kind of paragraph a flow represents.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FlowKind {
    /// An ordinary paragraph.
    #[default]
    Normal,
    /// A heading of level 1 through 6.
    Heading(u8),
    /// Preformatted text; lines never wrap.
    Pre,
    /// An address block.
    Address,
    /// A list item.
    Item(ItemMarker),
}

/// Marker of a list item.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ItemMarker {
    /// A bullet.
    #[default]
    Dotted,
    /// Decimal digits.
    Digit,
    /// Roman numerals.
    Roman,
    /// Latin letters.
    Alpha,
}

/// Horizontal alignment of the lines of a flow.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Aligned to the start edge implied by the direction.
    #[default]
    Start,
    /// Aligned to the left edge.
    Left,
    /// Aligned to the right edge.
    Right,
    /// Centered.
    Center,
}

/// Paragraph-level style of a flow.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FlowStyle {
    /// Paragraph kind.
    pub kind: FlowKind,
    /// Line alignment.
    pub alignment: Alignment,
    /// Indentation level.
    pub indent: u8,
    /// Paragraph direction.
    pub dir: Direction,
}

impl FlowStyle {
    /// Returns `true` if lines of this flow never wrap.
    pub fn is_preformatted(&self) -> bool {
        self.kind == FlowKind::Pre
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, FontFlags, FontSize, StyleAttr, TextStyle};

    #[test]
    fn last_attribute_wins() {
        let style = TextStyle::default()
            .with(&StyleAttr::Bold(true))
            .with(&StyleAttr::Size(FontSize::new(5)))
            .with(&StyleAttr::Bold(false));
        assert!(!style.flags.contains(FontFlags::BOLD));
        assert_eq!(style.size.get(), 5);
    }

    #[test]
    fn direction_fallback() {
        assert_eq!(Direction::Inherit.or(Direction::Rtl), Direction::Rtl);
        assert_eq!(Direction::Ltr.or(Direction::Rtl), Direction::Ltr);
    }
}
