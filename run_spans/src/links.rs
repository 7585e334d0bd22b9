// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hyperlinks carried by a run.
//!
//! Links never overlap and are kept sorted. Each link records its extent both as a byte range
//! (for the serializer) and a character range (for the cursor).

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::Range;

use crate::{Error, TextPos};

/// A hyperlink over part of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    /// Covered byte range.
    pub bytes: Range<usize>,
    /// Covered character range.
    pub chars: Range<usize>,
    /// Link destination.
    pub url: Arc<str>,
    /// Optional target frame name.
    pub target: Option<Arc<str>>,
    /// Whether the link has been followed.
    pub visited: bool,
}

impl Link {
    /// Creates an unvisited link between two positions.
    pub fn new(start: TextPos, end: TextPos, url: impl Into<Arc<str>>) -> Self {
        Self {
            bytes: start.byte..end.byte,
            chars: start.char..end.char,
            url: url.into(),
            target: None,
            visited: false,
        }
    }

    /// Builder-style target setter.
    #[must_use]
    pub fn with_target(mut self, target: impl Into<Arc<str>>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// The start of the link.
    pub fn start(&self) -> TextPos {
        TextPos::new(self.bytes.start, self.chars.start)
    }

    /// The end of the link.
    pub fn end(&self) -> TextPos {
        TextPos::new(self.bytes.end, self.chars.end)
    }

    /// Returns `true` if both links lead to the same place.
    pub fn same_destination(&self, other: &Self) -> bool {
        self.url == other.url && self.target == other.target
    }

    fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    fn shift(&mut self, by: TextPos) {
        self.bytes = self.bytes.start + by.byte..self.bytes.end + by.byte;
        self.chars = self.chars.start + by.char..self.chars.end + by.char;
    }

    fn clamped(&self, start: TextPos, end: TextPos) -> Self {
        let lo = self.start().max(start);
        let hi = self.end().min(end);
        let mut link = self.clone();
        link.bytes = lo.byte - start.byte..hi.byte - start.byte;
        link.chars = lo.char - start.char..hi.char - start.char;
        link
    }
}

/// Sorted, non-overlapping hyperlinks of one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkList {
    links: Vec<Link>,
}

impl LinkList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if the run has no links.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Iterate over links in text order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Link> {
        self.links.iter()
    }

    /// Add `link`, rejecting it if it overlaps an existing link.
    ///
    /// `len` is the byte length of the run, used for error reporting and bounds checks.
    pub fn add(&mut self, link: Link, len: usize) -> Result<(), Error> {
        if link.bytes.start > link.bytes.end || link.chars.start > link.chars.end {
            return Err(Error::invalid_range(link.bytes.start, link.bytes.end, len));
        }
        if link.bytes.end > len {
            return Err(Error::invalid_bounds(link.bytes.start, link.bytes.end, len));
        }
        if link.is_empty() {
            return Ok(());
        }
        if self
            .links
            .iter()
            .any(|l| l.chars.start < link.chars.end && l.chars.end > link.chars.start)
        {
            return Err(Error::overlapping_link(
                link.bytes.start,
                link.bytes.end,
                len,
            ));
        }
        let ix = self
            .links
            .partition_point(|l| l.chars.start < link.chars.start);
        self.links.insert(ix, link);
        Ok(())
    }

    /// Drop every link.
    pub fn clear(&mut self) {
        self.links.clear();
    }

    /// The link covering character `offset`.
    pub fn at_char(&self, offset: usize) -> Option<&Link> {
        self.links.iter().find(|l| l.chars.contains(&offset))
    }

    /// The link covering byte `index`.
    pub fn at_byte(&self, index: usize) -> Option<&Link> {
        self.links.iter().find(|l| l.bytes.contains(&index))
    }

    /// Mutable access to the link covering character `offset`.
    pub fn at_char_mut(&mut self, offset: usize) -> Option<&mut Link> {
        self.links.iter_mut().find(|l| l.chars.contains(&offset))
    }

    /// Returns `true` if every character of `chars` lies inside some link.
    pub fn covers(&self, chars: Range<usize>) -> bool {
        chars.clone().all(|c| self.at_char(c).is_some()) && !chars.is_empty()
    }

    /// Open a gap of `len` at `at` for inserted text.
    ///
    /// Links strictly containing `at` grow; links at or after `at` move.
    pub fn insert_gap(&mut self, at: TextPos, len: TextPos) {
        if len.char == 0 {
            return;
        }
        for link in &mut self.links {
            if link.chars.start >= at.char {
                link.shift(len);
            } else if link.chars.end > at.char {
                link.bytes.end += len.byte;
                link.chars.end += len.char;
            }
        }
    }

    /// Remove the text between `start` and `end`, truncating straddling links.
    pub fn remove_range(&mut self, start: TextPos, end: TextPos) {
        if end.char <= start.char {
            return;
        }
        let removed = end.sub(start);
        let collapse = |pos: TextPos| {
            if pos.char <= start.char {
                pos
            } else if pos.char >= end.char {
                pos.sub(removed)
            } else {
                start
            }
        };
        self.links.retain_mut(|link| {
            let lo = collapse(link.start());
            let hi = collapse(link.end());
            link.bytes = lo.byte..hi.byte;
            link.chars = lo.char..hi.char;
            !link.is_empty()
        });
    }

    /// Split at `at`, returning the right half rebased to zero.
    ///
    /// A link straddling `at` becomes two independent links, one per half, each keeping the
    /// destination and visited state.
    #[must_use]
    pub fn split_off(&mut self, at: TextPos) -> Self {
        let far = TextPos::new(usize::MAX, usize::MAX);
        let right = self
            .links
            .iter()
            .filter(|l| l.chars.end > at.char)
            .map(|l| l.clamped(at, far))
            .collect();
        self.links.retain_mut(|link| {
            if link.chars.start >= at.char {
                return false;
            }
            if link.chars.end > at.char {
                link.bytes.end = at.byte;
                link.chars.end = at.char;
            }
            true
        });
        Self { links: right }
    }

    /// Append `other` shifted by `shift`.
    ///
    /// When the last link of `self` ends at `shift`, the first link of `other` starts at zero
    /// and both share a destination, the two are coalesced into one link.
    pub fn append(&mut self, other: Self, shift: TextPos) {
        let mut incoming = other.links.into_iter();
        if let Some(mut first) = incoming.next() {
            first.shift(shift);
            match self.links.last_mut() {
                Some(last)
                    if last.chars.end == shift.char
                        && first.chars.start == shift.char
                        && last.same_destination(&first) =>
                {
                    last.bytes.end = first.bytes.end;
                    last.chars.end = first.chars.end;
                    last.visited |= first.visited;
                }
                _ => self.links.push(first),
            }
        }
        for mut link in incoming {
            link.shift(shift);
            self.links.push(link);
        }
    }

    /// Copy of the links between `start` and `end`, clamped and rebased to zero.
    #[must_use]
    pub fn slice(&self, start: TextPos, end: TextPos) -> Self {
        let links = self
            .links
            .iter()
            .filter(|l| l.chars.start < end.char && l.chars.end > start.char)
            .map(|l| l.clamped(start, end))
            .collect();
        Self { links }
    }
}

#[cfg(test)]
mod tests {
    use super::{Link, LinkList};
    use crate::{ErrorKind, TextPos};

    fn pos(c: usize) -> TextPos {
        // ASCII fixtures: bytes and chars agree.
        TextPos::new(c, c)
    }

    #[test]
    fn overlapping_links_are_rejected() {
        let mut links = LinkList::new();
        links
            .add(Link::new(pos(0), pos(4), "https://a.example"), 10)
            .unwrap();
        let err = links
            .add(Link::new(pos(3), pos(6), "https://b.example"), 10)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OverlappingLink);
        assert!(
            links
                .add(Link::new(pos(4), pos(6), "https://b.example"), 10)
                .is_ok()
        );
        assert_eq!(links.iter().map(|l| l.chars.clone()).count(), 2);
    }

    #[test]
    fn split_duplicates_straddling_link() {
        let mut links = LinkList::new();
        links
            .add(
                Link::new(pos(2), pos(8), "https://a.example").with_target("_top"),
                10,
            )
            .unwrap();
        let right = links.split_off(pos(5));
        let left: alloc::vec::Vec<_> = links.iter().collect();
        let right_links: alloc::vec::Vec<_> = right.iter().collect();
        assert_eq!(left[0].chars, 2..5);
        assert_eq!(right_links[0].chars, 0..3);
        assert!(left[0].same_destination(right_links[0]));
    }

    #[test]
    fn append_reunites_split_link() {
        let mut links = LinkList::new();
        links
            .add(Link::new(pos(2), pos(8), "https://a.example"), 10)
            .unwrap();
        let original = links.clone();
        let right = links.split_off(pos(5));
        links.append(right, pos(5));
        assert_eq!(links, original);
    }

    #[test]
    fn adjacent_links_to_different_urls_stay_apart() {
        let mut left = LinkList::new();
        left.add(Link::new(pos(0), pos(3), "https://a.example"), 3)
            .unwrap();
        let mut right = LinkList::new();
        right
            .add(Link::new(pos(0), pos(3), "https://b.example"), 3)
            .unwrap();
        left.append(right, pos(3));
        assert_eq!(left.len(), 2);
    }

    #[test]
    fn insert_and_remove_shift_links() {
        let mut links = LinkList::new();
        links
            .add(Link::new(pos(2), pos(5), "https://a.example"), 10)
            .unwrap();
        links.insert_gap(pos(3), pos(2));
        assert_eq!(links.at_char(6).map(|l| l.chars.clone()), Some(2..7));
        links.insert_gap(pos(0), pos(1));
        assert_eq!(links.at_char(3).map(|l| l.chars.clone()), Some(3..8));
        links.remove_range(pos(0), pos(4));
        assert_eq!(links.at_char(0).map(|l| l.chars.clone()), Some(0..4));
        links.remove_range(pos(0), pos(4));
        assert!(links.is_empty());
    }

    #[test]
    fn links_track_bytes_and_chars_separately() {
        let text = "ça va bien";
        let mut links = LinkList::new();
        let start = TextPos::from_char(text, 0);
        let end = TextPos::from_char(text, 5);
        links
            .add(Link::new(start, end, "https://a.example"), text.len())
            .unwrap();
        let right = links.split_off(TextPos::from_char(text, 2));
        let r = right.iter().next().unwrap();
        assert_eq!(r.chars, 0..3);
        assert_eq!(r.bytes, 0..3);
        let l = links.iter().next().unwrap();
        assert_eq!(l.bytes, 0..3);
        assert_eq!(l.chars, 0..2);
    }
}
