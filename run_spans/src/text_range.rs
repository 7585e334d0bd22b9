// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

use crate::{Endpoint, Error};

/// A validated byte range into a run's UTF-8 text.
///
/// Holds the invariants the range lists rely on:
///
/// - `start <= end`
/// - both ends are within the text
/// - both ends lie on UTF-8 character boundaries
///
/// A `TextRange` does not remember which text it was validated against; only reuse it with the
/// text it came from.
///
/// ## Example
///
/// ```
/// use run_spans::TextRange;
///
/// let range = TextRange::new("hello world", 0..5).unwrap();
/// assert_eq!(range.as_range(), 0..5);
/// assert!(TextRange::new("hello", 3..9).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextRange {
    start: usize,
    end: usize,
}

impl TextRange {
    /// Validates `range` against `text`.
    #[inline]
    pub fn new(text: &str, range: Range<usize>) -> Result<Self, Error> {
        validate_range(text, &range)?;
        Ok(Self {
            start: range.start,
            end: range.end,
        })
    }

    /// Creates a `TextRange` without validation, for callers that already hold the invariants.
    #[must_use]
    #[inline]
    pub const fn new_unchecked(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The start byte offset.
    #[must_use]
    #[inline]
    pub const fn start(self) -> usize {
        self.start
    }

    /// The end byte offset (exclusive).
    #[must_use]
    #[inline]
    pub const fn end(self) -> usize {
        self.end
    }

    /// Returns `true` if the range covers no bytes.
    #[must_use]
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Returns this range as a `Range<usize>`.
    #[must_use]
    #[inline]
    pub fn as_range(self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<TextRange> for Range<usize> {
    #[inline]
    fn from(value: TextRange) -> Self {
        value.as_range()
    }
}

/// A position inside a run expressed in both units the range lists use.
///
/// Style attributes are indexed by byte, spell errors by character, and hyperlinks by both, so
/// edits are described with both coordinates at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextPos {
    /// Byte index into the UTF-8 text.
    pub byte: usize,
    /// Character (code point) offset.
    pub char: usize,
}

impl TextPos {
    /// The start of a run.
    pub const ZERO: Self = Self { byte: 0, char: 0 };

    /// Creates a position from a byte index and a character offset.
    #[inline]
    pub const fn new(byte: usize, char: usize) -> Self {
        Self { byte, char }
    }

    /// Returns the position of character offset `char` within `text`.
    ///
    /// Offsets past the end clamp to the end of the text.
    pub fn from_char(text: &str, char: usize) -> Self {
        match text.char_indices().nth(char) {
            Some((byte, _)) => Self { byte, char },
            None => Self {
                byte: text.len(),
                char: text.chars().count(),
            },
        }
    }

    /// The position just past the end of `text`.
    pub fn end_of(text: &str) -> Self {
        Self {
            byte: text.len(),
            char: text.chars().count(),
        }
    }

    /// Component-wise addition, used to shift positions by a prefix length.
    #[must_use]
    #[inline]
    pub const fn add(self, other: Self) -> Self {
        Self {
            byte: self.byte + other.byte,
            char: self.char + other.char,
        }
    }

    /// Component-wise subtraction; `other` must not exceed `self`.
    #[must_use]
    #[inline]
    pub fn sub(self, other: Self) -> Self {
        debug_assert!(
            other.byte <= self.byte && other.char <= self.char,
            "cannot subtract {other:?} from {self:?}"
        );
        Self {
            byte: self.byte - other.byte,
            char: self.char - other.char,
        }
    }
}

#[inline]
pub(crate) fn validate_range(text: &str, range: &Range<usize>) -> Result<(), Error> {
    let text_len = text.len();
    if range.start > range.end {
        return Err(Error::invalid_range(range.start, range.end, text_len));
    }
    if range.end > text_len {
        return Err(Error::invalid_bounds(range.start, range.end, text_len));
    }
    if !text.is_char_boundary(range.start) {
        return Err(Error::not_on_char_boundary(
            text,
            range.start,
            range.end,
            Endpoint::Start,
            range.start,
        ));
    }
    if !text.is_char_boundary(range.end) {
        return Err(Error::not_on_char_boundary(
            text,
            range.start,
            range.end,
            Endpoint::End,
            range.end,
        ));
    }
    Ok(())
}
