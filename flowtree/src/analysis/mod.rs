// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text analysis backing cursor stops, line breaking and direction detection.
//!
//! These are the default answers of [`Painter`](crate::Painter); a painter with access to a
//! shaping engine may override them.

use alloc::vec;
use alloc::vec::Vec;

use icu_properties::CodePointMapData;
use icu_properties::props::BidiClass;
use icu_segmenter::options::{
    LineBreakOptions, SentenceBreakInvariantOptions, WordBreakInvariantOptions,
};
use icu_segmenter::{GraphemeClusterSegmenter, LineSegmenter, SentenceSegmenter, WordSegmenter};

use crate::style::Direction;

/// Per-position boundary information of a string.
///
/// A string of `n` characters has `n + 1` positions; position `i` sits before character `i`
/// and position `n` after the last character.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LogAttr(u8);

impl LogAttr {
    const CURSOR_POSITION: u8 = 1 << 0;
    const LINE_BREAK: u8 = 1 << 1;
    const WORD_START: u8 = 1 << 2;
    const WORD_END: u8 = 1 << 3;
    const SENTENCE_START: u8 = 1 << 4;
    const SENTENCE_END: u8 = 1 << 5;
    const WHITE: u8 = 1 << 6;

    fn flag(self, bit: u8) -> bool {
        self.0 & bit != 0
    }

    fn set(&mut self, bit: u8) {
        self.0 |= bit;
    }

    /// The cursor may rest here (a grapheme cluster boundary).
    pub fn is_cursor_position(self) -> bool {
        self.flag(Self::CURSOR_POSITION)
    }

    /// A line may be broken before this position.
    pub fn is_line_break(self) -> bool {
        self.flag(Self::LINE_BREAK)
    }

    /// A word starts here.
    pub fn is_word_start(self) -> bool {
        self.flag(Self::WORD_START)
    }

    /// A word ends here.
    pub fn is_word_end(self) -> bool {
        self.flag(Self::WORD_END)
    }

    /// A sentence starts here.
    pub fn is_sentence_start(self) -> bool {
        self.flag(Self::SENTENCE_START)
    }

    /// A sentence ends here.
    pub fn is_sentence_end(self) -> bool {
        self.flag(Self::SENTENCE_END)
    }

    /// The character after this position is whitespace.
    pub fn is_white(self) -> bool {
        self.flag(Self::WHITE)
    }

    /// Builder used by painters that compute their own attributes.
    #[must_use]
    pub fn with_cursor_position(mut self) -> Self {
        self.set(Self::CURSOR_POSITION);
        self
    }

    /// Builder used by painters that compute their own attributes.
    #[must_use]
    pub fn with_line_break(mut self) -> Self {
        self.set(Self::LINE_BREAK);
        self
    }
}

/// Maps byte boundaries reported by the segmenters onto character positions.
struct CharIndex {
    starts: Vec<usize>,
    len: usize,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        Self {
            starts: text.char_indices().map(|(byte, _)| byte).collect(),
            len: text.len(),
        }
    }

    fn char_count(&self) -> usize {
        self.starts.len()
    }

    fn position(&self, byte: usize) -> usize {
        if byte >= self.len {
            return self.starts.len();
        }
        self.starts.partition_point(|&start| start < byte)
    }
}

/// Computes the boundary attributes of every position in `text`.
///
/// The result has one entry per character plus one for the end of the text.
pub fn log_attrs(text: &str) -> Vec<LogAttr> {
    let index = CharIndex::new(text);
    let n = index.char_count();
    let mut attrs = vec![LogAttr::default(); n + 1];
    attrs[0].set(LogAttr::CURSOR_POSITION);
    attrs[n].set(LogAttr::CURSOR_POSITION);
    if n == 0 {
        return attrs;
    }

    let graphemes = GraphemeClusterSegmenter::new();
    for byte in graphemes.segment_str(text) {
        attrs[index.position(byte)].set(LogAttr::CURSOR_POSITION);
    }

    let lines = LineSegmenter::new_auto(LineBreakOptions::default());
    for byte in lines.segment_str(text) {
        // The segmenter reports the two ends of the text as well.
        if byte != 0 && byte < text.len() {
            attrs[index.position(byte)].set(LogAttr::LINE_BREAK);
        }
    }

    let chars: Vec<char> = text.chars().collect();
    let words = WordSegmenter::new_auto(WordBreakInvariantOptions::default());
    for byte in words.segment_str(text) {
        let pos = index.position(byte);
        if chars.get(pos).is_some_and(|c| c.is_alphanumeric()) {
            attrs[pos].set(LogAttr::WORD_START);
        }
        if pos > 0 && chars[pos - 1].is_alphanumeric() {
            attrs[pos].set(LogAttr::WORD_END);
        }
    }

    let sentences = SentenceSegmenter::new(SentenceBreakInvariantOptions::default());
    for byte in sentences.segment_str(text) {
        let pos = index.position(byte);
        if pos < n {
            attrs[pos].set(LogAttr::SENTENCE_START);
        }
        if pos > 0 {
            attrs[pos].set(LogAttr::SENTENCE_END);
        }
    }

    for (pos, c) in chars.iter().enumerate() {
        if c.is_whitespace() {
            attrs[pos].set(LogAttr::WHITE);
        }
    }
    attrs
}

/// Direction of the first strong character of `text`.
///
/// Returns [`Direction::Inherit`] when `text` has no strong character.
pub fn base_direction(text: &str) -> Direction {
    let bidi = CodePointMapData::<BidiClass>::new();
    for c in text.chars() {
        match bidi.get(c) {
            BidiClass::LeftToRight => return Direction::Ltr,
            BidiClass::RightToLeft | BidiClass::ArabicLetter => return Direction::Rtl,
            _ => {}
        }
    }
    Direction::Inherit
}

#[cfg(test)]
mod tests {
    use super::{base_direction, log_attrs};
    use crate::style::Direction;

    #[test]
    fn every_ascii_position_is_a_cursor_stop() {
        let attrs = log_attrs("abc");
        assert_eq!(attrs.len(), 4);
        assert!(attrs.iter().all(|a| a.is_cursor_position()));
    }

    #[test]
    fn combining_marks_are_not_cursor_stops() {
        // "e" followed by a combining acute accent.
        let attrs = log_attrs("e\u{301}x");
        assert!(attrs[0].is_cursor_position());
        assert!(!attrs[1].is_cursor_position());
        assert!(attrs[2].is_cursor_position());
    }

    #[test]
    fn line_breaks_follow_spaces() {
        let attrs = log_attrs("hello world");
        assert!(attrs[6].is_line_break());
        assert!(!attrs[3].is_line_break());
        assert!(!attrs[0].is_line_break());
        assert!(attrs[5].is_white());
    }

    #[test]
    fn word_boundaries() {
        let attrs = log_attrs("one two");
        assert!(attrs[0].is_word_start());
        assert!(attrs[3].is_word_end());
        assert!(attrs[4].is_word_start());
        assert!(attrs[7].is_word_end());
        assert!(!attrs[2].is_word_start());
    }

    #[test]
    fn empty_text_has_one_position() {
        let attrs = log_attrs("");
        assert_eq!(attrs.len(), 1);
        assert!(attrs[0].is_cursor_position());
    }

    #[test]
    fn direction_from_first_strong_character() {
        assert_eq!(base_direction("123 abc"), Direction::Ltr);
        assert_eq!(base_direction("  שלום abc"), Direction::Rtl);
        assert_eq!(base_direction("مرحبا"), Direction::Rtl);
        assert_eq!(base_direction("1 2 3"), Direction::Inherit);
    }
}
