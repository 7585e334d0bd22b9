// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Styled text runs.

mod slave;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::Range;

use run_spans::{AttributeSpans, Error, Link, LinkList, SpellErrors, TextPos, TextRange};

use crate::style::{StyleAttr, TextStyle};

pub use slave::Slave;

/// A string with a base style and three independent range lists.
///
/// Offsets in the public API are character offsets. Style attributes are stored over bytes,
/// spell errors over characters and links over both; every edit keeps them consistent with the
/// text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextRun {
    text: String,
    char_len: usize,
    style: TextStyle,
    attrs: AttributeSpans<StyleAttr>,
    links: LinkList,
    spell: SpellErrors,
    pub(crate) slaves: Vec<Slave>,
}

impl TextRun {
    /// Creates a run of `text` in `style`.
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        let text = text.into();
        Self {
            char_len: text.chars().count(),
            text,
            style,
            ..Self::default()
        }
    }

    /// Creates a zero-length run, used as the placeholder of an otherwise empty paragraph.
    pub fn empty(style: TextStyle) -> Self {
        Self::new(String::new(), style)
    }

    /// The text of the run.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub fn len_chars(&self) -> usize {
        self.char_len
    }

    /// Returns `true` if the run has no text.
    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    /// Base style of the run.
    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Replace the base style.
    pub fn set_style(&mut self, style: TextStyle) {
        self.style = style;
        self.slaves.clear();
    }

    /// Style attribute spans, over bytes.
    pub fn attrs(&self) -> &AttributeSpans<StyleAttr> {
        &self.attrs
    }

    /// Hyperlinks.
    pub fn links(&self) -> &LinkList {
        &self.links
    }

    /// Spell-error marks, over characters.
    pub fn spell_errors(&self) -> &SpellErrors {
        &self.spell
    }

    /// Line views computed by the last layout.
    pub fn slaves(&self) -> &[Slave] {
        &self.slaves
    }

    /// Discard the line views.
    pub fn clear_slaves(&mut self) {
        self.slaves.clear();
    }

    /// Both coordinates of character offset `char`, clamped to the end.
    pub fn pos(&self, char: usize) -> TextPos {
        if char >= self.char_len {
            self.end_pos()
        } else {
            TextPos::from_char(&self.text, char)
        }
    }

    fn end_pos(&self) -> TextPos {
        TextPos::new(self.text.len(), self.char_len)
    }

    /// Two runs may merge when their style identities agree.
    pub fn can_merge(&self, other: &Self) -> bool {
        self.style == other.style
    }

    // --- MARK: Text edits ---

    /// Insert `s` before character `at`.
    ///
    /// Attribute spans and links strictly containing `at` grow over the new text.
    pub fn insert(&mut self, at: usize, s: &str) {
        if s.is_empty() {
            return;
        }
        let at = self.pos(at);
        let added = TextPos::new(s.len(), s.chars().count());
        self.text.insert_str(at.byte, s);
        self.char_len += added.char;
        self.attrs.insert_gap(at.byte, added.byte);
        self.links.insert_gap(at, added);
        self.spell.insert_gap(at.char, added.char);
        self.slaves.clear();
    }

    /// Remove the characters in `range`.
    pub fn remove(&mut self, range: Range<usize>) {
        let start = self.pos(range.start);
        let end = self.pos(range.end);
        if end.char <= start.char {
            return;
        }
        self.text.replace_range(start.byte..end.byte, "");
        self.char_len -= end.char - start.char;
        self.attrs.remove_range(start.byte..end.byte);
        self.links.remove_range(start, end);
        self.spell.remove_range(start.char..end.char);
        self.slaves.clear();
    }

    /// Copy of the characters in `range` with their attributes, links and spell errors.
    #[must_use]
    pub fn copy_range(&self, range: Range<usize>) -> Self {
        let start = self.pos(range.start);
        let end = self.pos(range.end.max(range.start));
        Self {
            text: String::from(&self.text[start.byte..end.byte]),
            char_len: end.char - start.char,
            style: self.style.clone(),
            attrs: self.attrs.slice(start.byte..end.byte),
            links: self.links.slice(start, end),
            spell: self.spell.slice(start.char..end.char),
            slaves: Vec::new(),
        }
    }

    /// Remove the characters in `range` and return them as a run of their own.
    #[must_use]
    pub fn cut_range(&mut self, range: Range<usize>) -> Self {
        let cut = self.copy_range(range.clone());
        self.remove(range);
        cut
    }

    /// Split at character `at`, keeping the left part and returning the right part.
    ///
    /// Straddling links are duplicated into both halves; straddling spell errors are
    /// truncated, and fragments too short to be meaningful are discarded.
    #[must_use]
    pub fn split_off(&mut self, at: usize) -> Self {
        let at = self.pos(at);
        let right_text = self.text.split_off(at.byte);
        let right_len = self.char_len - at.char;
        self.char_len = at.char;
        self.slaves.clear();
        Self {
            text: right_text,
            char_len: right_len,
            style: self.style.clone(),
            attrs: self.attrs.split_off(at.byte),
            links: self.links.split_off(at),
            spell: self.spell.split_off(at.char),
            slaves: Vec::new(),
        }
    }

    /// Append `other` to this run. Both must share a style.
    ///
    /// Ranges meeting at the seam are joined, so appending the result of
    /// [`split_off`](Self::split_off) restores the original lists.
    pub fn append(&mut self, other: Self) {
        debug_assert!(self.can_merge(&other), "merging runs of different styles");
        let shift = self.end_pos();
        self.text.push_str(&other.text);
        self.char_len += other.char_len;
        self.attrs.append(other.attrs, shift.byte);
        self.links.append(other.links, shift);
        self.spell.append(other.spell, shift.char);
        self.slaves.clear();
    }

    // --- MARK: Attributes ---

    /// Apply `attr` over the characters in `range`.
    pub fn apply_attribute(&mut self, range: Range<usize>, attr: StyleAttr) -> Result<(), Error> {
        let start = self.pos(range.start);
        let end = self.pos(range.end);
        let range = TextRange::new(&self.text, start.byte..end.byte)?;
        self.attrs.apply(range, attr);
        self.slaves.clear();
        Ok(())
    }

    /// The style in effect at character `offset`: the base style with every covering
    /// attribute folded in application order.
    pub fn style_at(&self, offset: usize) -> TextStyle {
        let byte = self.pos(offset).byte;
        let mut style = self.style.clone();
        for attr in self.attrs.active_at(byte) {
            style.apply(attr);
        }
        style
    }

    // --- MARK: Links ---

    /// Link the characters in `range` to `url`.
    ///
    /// Fails if the range overlaps an existing link.
    pub fn add_link(&mut self, range: Range<usize>, url: impl Into<Arc<str>>) -> Result<(), Error> {
        let link = Link::new(self.pos(range.start), self.pos(range.end), url);
        self.links.add(link, self.text.len())
    }

    /// Add a fully specified link.
    pub fn add_link_with(&mut self, link: Link) -> Result<(), Error> {
        self.links.add(link, self.text.len())
    }

    /// The link covering character `offset`.
    pub fn link_at(&self, offset: usize) -> Option<&Link> {
        self.links.at_char(offset)
    }

    /// The link covering byte `index`.
    pub fn link_at_byte(&self, index: usize) -> Option<&Link> {
        self.links.at_byte(index)
    }

    /// Mark the link at character `offset` as visited or not. Returns `false` if there is
    /// no link there.
    pub fn set_link_visited(&mut self, offset: usize, visited: bool) -> bool {
        match self.links.at_char_mut(offset) {
            Some(link) => {
                link.visited = visited;
                true
            }
            None => false,
        }
    }

    // --- MARK: Spell checking ---

    /// Mark `len` characters at `offset` as misspelled. Marks reaching past the end are
    /// clamped.
    pub fn spell_errors_add(&mut self, offset: usize, len: usize) {
        let end = (offset + len).min(self.char_len);
        if offset < end {
            self.spell.add(offset, end - offset);
        }
    }

    /// Clear marks intersecting `len` characters at `offset`.
    pub fn spell_errors_clear_range(&mut self, offset: usize, len: usize) {
        self.spell.clear_range(offset, len);
    }

    /// Drop every spell-error mark.
    pub fn spell_errors_clear(&mut self) {
        self.spell.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::TextRun;
    use crate::style::{FontFlags, StyleAttr, TextStyle};
    use alloc::string::String;
    use alloc::vec::Vec;
    use run_spans::Link;

    fn run(text: &str) -> TextRun {
        TextRun::new(text, TextStyle::default())
    }

    #[test]
    fn split_then_append_restores_run() {
        let mut r = run("hello world");
        r.apply_attribute(2..8, StyleAttr::Bold(true)).unwrap();
        r.add_link(4..9, "https://example.com").unwrap();
        r.spell_errors_add(4, 6);
        let original = r.clone();
        let right = r.split_off(7);
        assert_eq!(r.text(), "hello w");
        assert_eq!(right.text(), "orld");
        assert_eq!(right.link_at(0).map(|l| l.chars.clone()), Some(0..2));
        r.append(right);
        assert_eq!(r, original);
    }

    #[test]
    fn split_anywhere_then_append_restores_multibyte_run() {
        let mut r = run("ñandú ☕ 日本語");
        r.apply_attribute(1..5, StyleAttr::Bold(true)).unwrap();
        r.apply_attribute(3..9, StyleAttr::Italic(true)).unwrap();
        r.add_link(0..2, "https://a.example").unwrap();
        r.add_link(6..7, "https://b.example").unwrap();
        let link = Link::new(r.pos(8), r.pos(11), "https://c.example").with_target("_blank");
        r.add_link_with(link).unwrap();
        let original = r;
        for k in 0..=original.len_chars() {
            let mut left = original.clone();
            let right = left.split_off(k);
            assert_eq!(left.len_chars(), k);
            let mut joined = String::from(left.text());
            joined.push_str(right.text());
            assert_eq!(joined, original.text());
            left.append(right);
            assert_eq!(left, original, "split at {k}");
        }
    }

    #[test]
    fn adjacent_links_to_one_destination_coalesce() {
        let linked = |text: &str| {
            let mut r = run(text);
            let link = Link::new(r.pos(0), r.pos(3), "https://example.com").with_target("main");
            r.add_link_with(link).unwrap();
            r
        };
        let mut foo = linked("foo");
        foo.append(linked("bar"));
        assert_eq!(foo.text(), "foobar");
        let links: Vec<_> = foo.links().iter().collect();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].chars, 0..6);
        assert_eq!(links[0].bytes, 0..6);
        assert_eq!(links[0].target.as_deref(), Some("main"));
    }

    #[test]
    fn insert_keeps_lists_aligned() {
        let mut r = run("abcdef");
        r.add_link(2..4, "https://example.com").unwrap();
        r.spell_errors_add(4, 2);
        r.insert(3, "XY");
        assert_eq!(r.text(), "abcXYdef");
        assert_eq!(r.len_chars(), 8);
        assert_eq!(r.link_at(4).map(|l| l.chars.clone()), Some(2..6));
        assert_eq!(r.spell_errors().at(6), Some(6..8));
    }

    #[test]
    fn remove_shifts_lists() {
        let mut r = run("naïve words");
        r.spell_errors_add(6, 5);
        r.remove(0..6);
        assert_eq!(r.text(), "words");
        assert_eq!(r.len_chars(), 5);
        assert_eq!(r.spell_errors().at(0), Some(0..5));
    }

    #[test]
    fn style_at_folds_in_application_order() {
        let mut r = run("abcdef");
        r.apply_attribute(0..4, StyleAttr::Bold(true)).unwrap();
        r.apply_attribute(2..6, StyleAttr::Bold(false)).unwrap();
        assert!(r.style_at(1).flags.contains(FontFlags::BOLD));
        assert!(!r.style_at(3).flags.contains(FontFlags::BOLD));
        assert!(!r.style_at(5).flags.contains(FontFlags::BOLD));
    }

    #[test]
    fn copy_range_carries_links() {
        let mut r = run("click here now");
        r.add_link(6..10, "https://example.com").unwrap();
        let part = r.copy_range(4..12);
        assert_eq!(part.text(), "k here n");
        let links: Vec<_> = part.links().iter().map(|l| l.chars.clone()).collect();
        assert_eq!(links, [2..6]);
        assert_eq!(r.text(), "click here now");
    }

    #[test]
    fn cut_range_removes_and_returns() {
        let mut r = run("abcdef");
        let cut = r.cut_range(1..3);
        assert_eq!(cut.text(), "bc");
        assert_eq!(r.text(), "adef");
    }

    #[test]
    fn visited_flag_toggles() {
        let mut r = run("see docs");
        r.add_link(4..8, "https://docs.example").unwrap();
        assert!(r.set_link_visited(5, true));
        assert!(r.link_at(4).unwrap().visited);
        assert!(!r.set_link_visited(1, true));
    }

    #[test]
    fn spell_marks_are_clamped() {
        let mut r = run("abc");
        r.spell_errors_add(1, 10);
        assert_eq!(r.spell_errors().at(1), Some(1..3));
        r.spell_errors_clear_range(2, 0);
        assert!(r.spell_errors().is_empty());
    }

    #[test]
    fn merge_requires_equal_styles() {
        let plain = run("a");
        let bold = TextRun::new(
            "b",
            TextStyle {
                flags: FontFlags::BOLD,
                ..TextStyle::default()
            },
        );
        assert!(plain.can_merge(&run("c")));
        assert!(!plain.can_merge(&bold));
    }
}
