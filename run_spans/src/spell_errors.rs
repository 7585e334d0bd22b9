// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Misspelled-word marks of a run, over character offsets.

use alloc::vec::Vec;
use core::ops::Range;

/// Marks shorter than this many characters are meaningless and are discarded.
pub const MIN_SPELL_ERROR_LEN: usize = 2;

/// Sorted, non-overlapping spell-error ranges, each at least [`MIN_SPELL_ERROR_LEN`] long.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpellErrors {
    ranges: Vec<Range<usize>>,
}

fn long_enough(range: &Range<usize>) -> bool {
    range.len() >= MIN_SPELL_ERROR_LEN
}

impl SpellErrors {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of marks.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Returns `true` if nothing is marked.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Iterate over marks in ascending order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Range<usize>> {
        self.ranges.iter()
    }

    /// Drop every mark.
    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    /// Mark `len` characters starting at `offset`.
    ///
    /// Marks shorter than [`MIN_SPELL_ERROR_LEN`] are ignored. Overlapping marks are coalesced.
    pub fn add(&mut self, offset: usize, len: usize) {
        self.merge(core::iter::once(offset..offset + len));
    }

    /// Remove every mark intersecting `len` characters at `offset`.
    ///
    /// With `len == 0` the marks containing `offset` are removed.
    pub fn clear_range(&mut self, offset: usize, len: usize) {
        let end = offset + len;
        self.ranges.retain(|r| {
            if len == 0 {
                !r.contains(&offset)
            } else {
                !(r.start < end && r.end > offset)
            }
        });
    }

    /// Returns the mark containing character `offset`.
    pub fn at(&self, offset: usize) -> Option<Range<usize>> {
        self.ranges.iter().find(|r| r.contains(&offset)).cloned()
    }

    /// Merge `incoming` marks into the list.
    ///
    /// Performs a stable ascending merge by start offset, keeps exactly one mark per start
    /// offset and coalesces marks that overlap.
    pub fn merge(&mut self, incoming: impl IntoIterator<Item = Range<usize>>) {
        let mut all: Vec<Range<usize>> = core::mem::take(&mut self.ranges);
        all.extend(incoming.into_iter().filter(long_enough));
        all.sort_by_key(|r| r.start);
        all.dedup_by_key(|r| r.start);
        for range in all {
            match self.ranges.last_mut() {
                Some(last) if range.start < last.end => last.end = last.end.max(range.end),
                _ => self.ranges.push(range),
            }
        }
    }

    /// Open a gap of `len` characters at `at`.
    pub fn insert_gap(&mut self, at: usize, len: usize) {
        if len == 0 {
            return;
        }
        for range in &mut self.ranges {
            if range.start >= at {
                range.start += len;
            }
            if range.end > at {
                range.end += len;
            }
        }
    }

    /// Remove the characters in `removed`.
    ///
    /// Following marks shift left; marks cut down below [`MIN_SPELL_ERROR_LEN`] are discarded.
    pub fn remove_range(&mut self, removed: Range<usize>) {
        if removed.is_empty() {
            return;
        }
        let collapse = |index: usize| {
            if index <= removed.start {
                index
            } else if index >= removed.end {
                index - removed.len()
            } else {
                removed.start
            }
        };
        self.ranges.retain_mut(|range| {
            *range = collapse(range.start)..collapse(range.end);
            long_enough(range)
        });
    }

    /// Split at character `at`, returning the right half rebased to zero.
    ///
    /// A straddling mark is truncated into both halves; a fragment shorter than
    /// [`MIN_SPELL_ERROR_LEN`] is discarded.
    #[must_use]
    pub fn split_off(&mut self, at: usize) -> Self {
        let ranges = self
            .ranges
            .iter()
            .filter(|r| r.end > at)
            .map(|r| r.start.max(at) - at..r.end - at)
            .filter(long_enough)
            .collect();
        self.ranges.retain_mut(|range| {
            range.end = range.end.min(at);
            range.start < at && long_enough(range)
        });
        Self { ranges }
    }

    /// Append `other` shifted right by `shift` characters.
    ///
    /// A mark ending exactly at `shift` and one starting at the beginning of `other` are joined.
    pub fn append(&mut self, other: Self, shift: usize) {
        let mut incoming = other.ranges.into_iter();
        if let Some(first) = incoming.next() {
            let first = first.start + shift..first.end + shift;
            match self.ranges.last_mut() {
                Some(last) if last.end == shift && first.start == shift => last.end = first.end,
                _ => self.ranges.push(first),
            }
        }
        self.ranges
            .extend(incoming.map(|r| r.start + shift..r.end + shift));
    }

    /// Copy of the marks intersecting `range`, clamped and rebased to zero.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Self {
        let ranges = self
            .ranges
            .iter()
            .filter(|r| r.start < range.end && r.end > range.start)
            .map(|r| r.start.max(range.start) - range.start..r.end.min(range.end) - range.start)
            .filter(long_enough)
            .collect();
        Self { ranges }
    }
}

#[cfg(test)]
mod tests {
    use super::SpellErrors;
    use alloc::vec::Vec;
    use core::ops::Range;

    fn ranges(list: &SpellErrors) -> Vec<Range<usize>> {
        list.iter().cloned().collect()
    }

    fn assert_well_formed(list: &SpellErrors) {
        let all = ranges(list);
        for pair in all.windows(2) {
            assert!(pair[0].end <= pair[1].start, "overlap in {all:?}");
        }
        assert!(all.iter().all(|r| r.len() >= 2), "short mark in {all:?}");
    }

    #[test]
    fn add_coalesces_and_ignores_short_marks() {
        let mut list = SpellErrors::new();
        list.add(6, 4);
        list.add(0, 3);
        list.add(8, 4);
        list.add(20, 1);
        assert_eq!(ranges(&list), [0..3, 6..12]);
        assert_well_formed(&list);
    }

    #[test]
    fn merge_keeps_one_mark_per_offset() {
        let mut list = SpellErrors::new();
        list.add(0, 3);
        list.merge([0..3, 0..2, 5..7]);
        assert_eq!(ranges(&list), [0..3, 5..7]);
    }

    #[test]
    fn split_discards_short_fragments() {
        let mut list = SpellErrors::new();
        list.add(0, 5);
        list.add(7, 4);
        let right = list.split_off(8);
        assert_eq!(ranges(&list), [0..5]);
        assert_eq!(ranges(&right), [0..3]);
        assert_well_formed(&list);
        assert_well_formed(&right);
    }

    #[test]
    fn split_and_append_restore_long_fragments() {
        let mut list = SpellErrors::new();
        list.add(2, 6);
        let original = list.clone();
        let right = list.split_off(4);
        assert_eq!(ranges(&list), [2..4]);
        assert_eq!(ranges(&right), [0..4]);
        list.append(right, 4);
        assert_eq!(list, original);
    }

    #[test]
    fn remove_range_shifts_and_discards() {
        let mut list = SpellErrors::new();
        list.add(0, 3);
        list.add(5, 4);
        list.remove_range(1..6);
        // 0..3 -> 0..1 (dropped), 5..9 -> 1..4
        assert_eq!(ranges(&list), [1..4]);
        assert_well_formed(&list);
    }

    #[test]
    fn clear_range_removes_intersecting_marks() {
        let mut list = SpellErrors::new();
        list.add(0, 3);
        list.add(5, 4);
        list.clear_range(2, 1);
        assert_eq!(ranges(&list), [5..9]);
        list.clear_range(6, 0);
        assert!(list.is_empty());
    }
}
